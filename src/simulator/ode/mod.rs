//! Stiff-stable integration of small linear ODE systems.
//!
//! Problems are solved with diffsol's BDF method. The solver is stopped exactly on
//! every requested output time, so the same inputs always produce the same outputs
//! regardless of how far apart the rate constants are.

mod closure;

use diffsol::{
    error::{DiffsolError, OdeSolverError},
    ode_solver::method::OdeSolverMethod,
    NalgebraLU, OdeBuilder, OdeSolverStopReason,
};
use serde::{Deserialize, Serialize};

use crate::error::PharmsimError;
use crate::simulator::{DiffEq, M, T, V};

pub use closure::LinearProblem;

/// Tolerances and initial step for the BDF solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OdeSettings {
    /// Relative tolerance (default: 1e-8)
    pub rtol: f64,
    /// Absolute tolerance on every state (default: 1e-8)
    pub atol: f64,
    /// First trial step in hours (default: 1e-3)
    pub h0: f64,
}

impl Default for OdeSettings {
    fn default() -> Self {
        Self {
            rtol: 1e-8,
            atol: 1e-8,
            h0: 1e-3,
        }
    }
}

/// Upper bound on the total number of solver steps for one simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepBudget {
    remaining: usize,
}

impl StepBudget {
    pub fn new(max_steps: usize) -> Self {
        Self {
            remaining: max_steps,
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Reserve `steps` solver steps, failing when the budget would be exceeded.
    pub fn consume(&mut self, steps: usize) -> Result<(), PharmsimError> {
        match self.remaining.checked_sub(steps) {
            Some(left) => {
                self.remaining = left;
                Ok(())
            }
            None => Err(PharmsimError::ComputationFailure(
                "the ODE solver exceeded its step budget".to_string(),
            )),
        }
    }
}

/// BDF solver for `dx/dt = f(x, p, t)` with a linear, homogeneous `f`.
#[derive(Debug, Clone)]
pub struct OdeSolver {
    diffeq: DiffEq,
    params: V,
    settings: OdeSettings,
}

impl OdeSolver {
    pub fn new(diffeq: DiffEq, params: V, settings: OdeSettings) -> Self {
        Self {
            diffeq,
            params,
            settings,
        }
    }

    /// Integrate from `x0` at `t0` and return the state at every time in `times`.
    ///
    /// `times` must be non-decreasing and start at or after `t0`.
    pub fn solve(
        &self,
        x0: &V,
        t0: T,
        times: &[T],
        budget: &mut StepBudget,
    ) -> Result<Vec<V>, PharmsimError> {
        let mut previous = t0;
        for &target in times {
            // Also rejects NaN targets.
            if !(target >= previous) || !target.is_finite() {
                return Err(PharmsimError::ComputationFailure(format!(
                    "ODE output times must be non-decreasing, got {target} after {previous}"
                )));
            }
            previous = target;
        }

        let problem = OdeBuilder::<M>::new()
            .atol(vec![self.settings.atol; x0.len()])
            .rtol(self.settings.rtol)
            .t0(t0)
            .h0(self.settings.h0)
            .p(self.params.iter().copied().collect::<Vec<_>>())
            .build_from_eqn(LinearProblem::new(
                self.diffeq,
                self.params.clone(),
                x0.clone(),
            ))?;
        let mut solver = problem.bdf::<NalgebraLU<T>>()?;

        let mut t = t0;
        let mut states = Vec::with_capacity(times.len());
        for &target in times {
            if target > t {
                solver.set_stop_time(target)?;
                loop {
                    budget.consume(1)?;
                    match solver.step() {
                        Ok(OdeSolverStopReason::InternalTimestep) => continue,
                        Ok(OdeSolverStopReason::TstopReached) => break,
                        Ok(reason) => {
                            return Err(PharmsimError::ComputationFailure(format!(
                                "unexpected ODE solver stop: {reason:?}"
                            )))
                        }
                        Err(DiffsolError::OdeSolverError(OdeSolverError::StepSizeTooSmall {
                            ..
                        })) => {
                            return Err(PharmsimError::ComputationFailure(
                                "the step size of the ODE solver went to zero".to_string(),
                            ))
                        }
                        Err(err) => return Err(err.into()),
                    }
                }
                t = target;
            }
            states.push(solver.state().y.clone());
        }

        Ok(states)
    }
}
