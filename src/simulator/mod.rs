pub mod analytical;
pub mod grid;
pub mod model;
pub mod ode;
pub mod trace;

use ndarray::Array1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::PharmsimError;
use crate::resolver::CanonicalParameters;

pub use grid::{DosingEvents, TimeGrid, GRID_POINTS, TIME_STEP, TOTAL_TIME};
pub use model::{ExtravascularModel, ExtravascularSolver, IVBolusModel, KineticModel, Kinetics};
pub use ode::{OdeSettings, OdeSolver, StepBudget};
pub use trace::{ConcentrationTrace, TracePoint, TraceSummary};

pub type T = f64;
pub type V = nalgebra::DVector<T>;
pub type M = nalgebra::DMatrix<T>;

/// This closure represents the differential equation of a model:
/// Params:
/// - x: The state vector at time t
/// - p: The parameters of the model
/// - t: The time at which the differential equation is evaluated
/// - dx: A mutable reference to the derivative of the state vector at time t
/// Example:
/// ```ignore
/// let diff_eq = |x, p, t, dx| {
///  dx[0] = -p[0] * x[0];
///  dx[1] = p[0] * x[0] - p[1] * x[1];
/// };
/// ```
pub type DiffEq = fn(&V, &V, T, &mut V);


/// Solver settings and computation limits for a simulation.
///
/// The grid itself is fixed (see [`TimeGrid::standard`]); these settings only
/// control how each dose contribution is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Solver for extravascular routes (default: ODE)
    pub solver: ExtravascularSolver,
    /// BDF tolerances
    pub ode: OdeSettings,
    /// Maximum number of dosing events (default: 10 000)
    pub max_doses: usize,
    /// Maximum number of ODE solver steps over the whole simulation (default: 20 000 000)
    pub max_steps: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            solver: ExtravascularSolver::Ode,
            ode: OdeSettings::default(),
            max_doses: 10_000,
            max_steps: 20_000_000,
        }
    }
}

impl SimulationSettings {
    pub fn analytical() -> Self {
        Self {
            solver: ExtravascularSolver::Analytical,
            ..Default::default()
        }
    }
}

/// Simulate with [`SimulationSettings::default`].
pub fn simulate(params: &CanonicalParameters) -> Result<ConcentrationTrace, PharmsimError> {
    simulate_with(params, &SimulationSettings::default())
}

/// Build the concentration trace for one parameter set.
///
/// Every dosing event contributes only at grid times at or after its administration.
/// Central-compartment amounts are summed across doses and divided by the volume of
/// distribution once.
pub fn simulate_with(
    params: &CanonicalParameters,
    settings: &SimulationSettings,
) -> Result<ConcentrationTrace, PharmsimError> {
    let grid = TimeGrid::standard();
    let events = DosingEvents::new(params.interval, TOTAL_TIME, settings.max_doses)?;
    let model = Kinetics::for_parameters(params, settings.solver, settings.ode);
    tracing::debug!(
        route = %params.route,
        model = model.name(),
        doses = events.len(),
        "simulating concentration trace"
    );

    let amount = params.actual_dose();
    let mut budget = StepBudget::new(settings.max_steps);
    let mut central = Array1::<f64>::zeros(grid.len());

    for &t_dose in events.times() {
        let start = grid.first_index_at_or_after(t_dose);
        if start == grid.len() {
            continue;
        }
        let elapsed = grid.elapsed_since(start, t_dose);
        let contribution = model.central_amounts(amount, &elapsed, &mut budget)?;
        for (total, added) in central.iter_mut().skip(start).zip(contribution) {
            *total += added;
        }
    }

    let concentrations = central / params.volume_of_distribution;
    if let Some(bad) = concentrations.iter().find(|c| !c.is_finite()) {
        return Err(PharmsimError::ComputationFailure(format!(
            "simulation produced a non-finite concentration ({bad})"
        )));
    }
    // Round-off in the absorption model can dip a hair below zero.
    let concentrations = concentrations.mapv(|c| c.max(0.0));

    Ok(ConcentrationTrace::from_parts(
        grid.times().iter().copied(),
        concentrations,
    ))
}

/// Simulate independent parameter sets in parallel, preserving input order.
pub fn simulate_batch(
    params: &[CanonicalParameters],
    settings: &SimulationSettings,
) -> Vec<Result<ConcentrationTrace, PharmsimError>> {
    params
        .par_iter()
        .map(|p| simulate_with(p, settings))
        .collect()
}
