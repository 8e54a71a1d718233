//! Per-dose kinetic models.
//!
//! A model answers one question: given a single dose administered at elapsed time
//! zero, how much drug is in the central compartment at each requested elapsed time?
//! The simulator superposes those amounts across doses and converts the sum to a
//! concentration once.

use serde::{Deserialize, Serialize};

use crate::error::PharmsimError;
use crate::resolver::CanonicalParameters;
use crate::simulator::analytical::{one_compartment, one_compartment_with_absorption};
use crate::simulator::ode::{OdeSettings, OdeSolver, StepBudget};
use crate::simulator::{T, V};

/// How the extravascular model computes its central-compartment amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtravascularSolver {
    /// Numerically integrate the two-state ODE system
    #[default]
    Ode,
    /// Evaluate the closed-form Bateman function
    Analytical,
}

/// A linear, time-invariant single-dose kinetic model.
pub trait KineticModel {
    /// Short, stable model name used in logs.
    fn name(&self) -> &'static str;

    /// Central-compartment amount at each elapsed time after a dose of `amount`.
    ///
    /// `elapsed` is non-negative and non-decreasing.
    fn central_amounts(
        &self,
        amount: f64,
        elapsed: &[T],
        budget: &mut StepBudget,
    ) -> Result<Vec<f64>, PharmsimError>;
}

/// One-state instantaneous-absorption model for intravenous bolus doses.
///
/// `dC/dτ = −k·C`, with the whole dose in the central compartment at `τ = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct IVBolusModel {
    k_elim: f64,
}

impl IVBolusModel {
    pub fn new(k_elim: f64) -> Self {
        Self { k_elim }
    }
}

impl KineticModel for IVBolusModel {
    fn name(&self) -> &'static str {
        "iv_bolus"
    }

    fn central_amounts(
        &self,
        amount: f64,
        elapsed: &[T],
        _budget: &mut StepBudget,
    ) -> Result<Vec<f64>, PharmsimError> {
        let x = V::from_vec(vec![amount]);
        let p = V::from_vec(vec![self.k_elim]);
        Ok(elapsed
            .iter()
            .map(|&tau| one_compartment(&x, &p, tau)[0])
            .collect())
    }
}

/// Two-state first-order absorption model for every non-intravenous route.
///
/// States are the absorption-site amount `A` and the central amount `X`:
/// `dA/dτ = −ka·A`, `dX/dτ = ka·A − k·X`, with `A(0) = dose` and `X(0) = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtravascularModel {
    ka: f64,
    k_elim: f64,
    solver: ExtravascularSolver,
    ode: OdeSettings,
}

fn absorption_diffeq(x: &V, p: &V, _t: T, dx: &mut V) {
    let ka = p[0];
    let ke = p[1];
    dx[0] = -ka * x[0];
    dx[1] = ka * x[0] - ke * x[1];
}

impl ExtravascularModel {
    pub fn new(ka: f64, k_elim: f64, solver: ExtravascularSolver, ode: OdeSettings) -> Self {
        Self {
            ka,
            k_elim,
            solver,
            ode,
        }
    }

    fn params(&self) -> V {
        V::from_vec(vec![self.ka, self.k_elim])
    }
}

impl KineticModel for ExtravascularModel {
    fn name(&self) -> &'static str {
        match self.solver {
            ExtravascularSolver::Ode => "extravascular_ode",
            ExtravascularSolver::Analytical => "extravascular_analytical",
        }
    }

    fn central_amounts(
        &self,
        amount: f64,
        elapsed: &[T],
        budget: &mut StepBudget,
    ) -> Result<Vec<f64>, PharmsimError> {
        let x0 = V::from_vec(vec![amount, 0.0]);
        match self.solver {
            ExtravascularSolver::Ode => {
                let states = OdeSolver::new(absorption_diffeq, self.params(), self.ode)
                    .solve(&x0, 0.0, elapsed, budget)?;
                Ok(states.iter().map(|x| x[1]).collect())
            }
            ExtravascularSolver::Analytical => {
                let p = self.params();
                Ok(elapsed
                    .iter()
                    .map(|&tau| one_compartment_with_absorption(&x0, &p, tau)[1])
                    .collect())
            }
        }
    }
}

/// Route-selected kinetic model for a parameter set.
#[derive(Debug, Clone, PartialEq)]
pub enum Kinetics {
    IVBolus(IVBolusModel),
    Extravascular(ExtravascularModel),
}

impl Kinetics {
    /// `iv` selects the bolus model; every other route is extravascular.
    pub fn for_parameters(
        params: &CanonicalParameters,
        solver: ExtravascularSolver,
        ode: OdeSettings,
    ) -> Self {
        if params.route.is_intravenous() {
            Kinetics::IVBolus(IVBolusModel::new(params.k_elim))
        } else {
            Kinetics::Extravascular(ExtravascularModel::new(params.ka, params.k_elim, solver, ode))
        }
    }
}

impl KineticModel for Kinetics {
    fn name(&self) -> &'static str {
        match self {
            Kinetics::IVBolus(model) => model.name(),
            Kinetics::Extravascular(model) => model.name(),
        }
    }

    fn central_amounts(
        &self,
        amount: f64,
        elapsed: &[T],
        budget: &mut StepBudget,
    ) -> Result<Vec<f64>, PharmsimError> {
        match self {
            Kinetics::IVBolus(model) => model.central_amounts(amount, elapsed, budget),
            Kinetics::Extravascular(model) => model.central_amounts(amount, elapsed, budget),
        }
    }
}
