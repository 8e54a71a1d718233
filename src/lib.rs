//! Multi-dose concentration-time simulation from pharmacokinetic parameters.
//!
//! The crate resolves loosely typed compound and dosing input into a canonical
//! parameter set ([`resolver`]) and superposes per-dose kinetic models over a fixed
//! seven-day grid ([`simulator`]). [`service`] wraps both in the request/response
//! envelopes of the `/calculate` and `/validate` endpoints.
//!
//! ```ignore
//! use pharmsim::prelude::*;
//!
//! let compound = CompoundParameters::new().half_life(6.0).volume_of_distribution(50.0);
//! let regimen = DosingRegimen::new().dose(500.0).interval(24.0).route(Route::Iv);
//! let params = resolve(&compound, &regimen)?;
//! let trace = simulate(&params)?;
//! assert_eq!(trace.len(), 337);
//! ```
pub mod data;
pub mod error;
pub mod resolver;
pub mod service;
pub mod simulator;

pub use error::PharmsimError;

pub mod prelude {
    pub use crate::data::{
        Bioavailability, CompoundParameters, DosingRegimen, Route, TimeUnit,
    };
    pub use crate::error::PharmsimError;
    pub use crate::resolver::{resolve, CanonicalParameters, Resolver, ResolverDefaults};
    pub use crate::service::{CalculateRequest, Response, ResponseBody, Service};
    pub use crate::simulator::{
        simulate, simulate_batch, simulate_with, ConcentrationTrace, ExtravascularSolver,
        KineticModel, SimulationSettings, TracePoint, TraceSummary,
    };
}
