//! Input data: compounds, dosing regimens, routes and their bioavailability.
pub mod bioavailability;
pub mod coerce;
pub mod compound;
pub mod regimen;
pub mod route;

pub use bioavailability::Bioavailability;
pub use compound::{CompoundParameters, TimeUnit};
pub use regimen::{parse_schedule, DosingRegimen};
pub use route::Route;
