use diffsol::{
    ConstantOp, LinearOp, NonLinearOp, NonLinearOpJacobian, OdeEquations, OdeEquationsRef, Op,
};

use crate::simulator::{DiffEq, M, T, V};

/// Right-hand side of a [`LinearProblem`].
pub struct LinearRhs<'a> {
    nstates: usize,
    params: &'a V,
    diffeq: DiffEq,
}

impl Op for LinearRhs<'_> {
    type T = T;
    type V = V;
    type M = M;
    fn nstates(&self) -> usize {
        self.nstates
    }
    fn nout(&self) -> usize {
        self.nstates
    }
    fn nparams(&self) -> usize {
        self.params.len()
    }
}

impl NonLinearOp for LinearRhs<'_> {
    fn call_inplace(&self, x: &Self::V, t: Self::T, y: &mut Self::V) {
        (self.diffeq)(x, self.params, t, y)
    }
}

impl NonLinearOpJacobian for LinearRhs<'_> {
    // J·v == f(v) for a linear, homogeneous right-hand side
    fn jac_mul_inplace(&self, _x: &Self::V, t: Self::T, v: &Self::V, y: &mut Self::V) {
        (self.diffeq)(v, self.params, t, y)
    }
}

pub struct NoMass {
    nstates: usize,
    nparams: usize,
}

impl Op for NoMass {
    type T = T;
    type V = V;
    type M = M;
    fn nstates(&self) -> usize {
        self.nstates
    }
    fn nout(&self) -> usize {
        self.nstates
    }
    fn nparams(&self) -> usize {
        self.nparams
    }
}

impl LinearOp for NoMass {
    fn gemv_inplace(&self, _x: &Self::V, _t: Self::T, _beta: Self::T, _y: &mut Self::V) {}
}

pub struct InitialState {
    nparams: usize,
    init: V,
}

impl Op for InitialState {
    type T = T;
    type V = V;
    type M = M;
    fn nstates(&self) -> usize {
        self.init.len()
    }
    fn nout(&self) -> usize {
        self.init.len()
    }
    fn nparams(&self) -> usize {
        self.nparams
    }
}

impl ConstantOp for InitialState {
    fn call_inplace(&self, _t: Self::T, y: &mut Self::V) {
        y.copy_from(&self.init);
    }
}

pub struct NoOutput {
    nstates: usize,
    nparams: usize,
}

impl Op for NoOutput {
    type T = T;
    type V = V;
    type M = M;
    fn nstates(&self) -> usize {
        self.nstates
    }
    fn nout(&self) -> usize {
        0
    }
    fn nparams(&self) -> usize {
        self.nparams
    }
}

impl NonLinearOp for NoOutput {
    fn call_inplace(&self, _x: &Self::V, _t: Self::T, _y: &mut Self::V) {}
}

/// Initial value problem `dx/dt = f(x, p, t)`, `x(t0) = init`.
///
/// `f` must be linear and homogeneous in `x`: the Jacobian-vector product handed to
/// the implicit solver is `f` evaluated at the direction vector.
pub struct LinearProblem {
    diffeq: DiffEq,
    params: V,
    init: V,
}

impl LinearProblem {
    pub fn new(diffeq: DiffEq, params: V, init: V) -> Self {
        Self {
            diffeq,
            params,
            init,
        }
    }
}

impl Op for LinearProblem {
    type T = T;
    type V = V;
    type M = M;
    fn nstates(&self) -> usize {
        self.init.len()
    }
    fn nout(&self) -> usize {
        self.init.len()
    }
    fn nparams(&self) -> usize {
        self.params.len()
    }
}

impl<'b> OdeEquationsRef<'b> for LinearProblem {
    type Rhs = LinearRhs<'b>;
    type Mass = NoMass;
    type Init = InitialState;
    type Root = NoOutput;
    type Out = NoOutput;
}

impl OdeEquations for LinearProblem {
    fn rhs(&self) -> LinearRhs<'_> {
        LinearRhs {
            nstates: self.init.len(),
            params: &self.params,
            diffeq: self.diffeq,
        }
    }

    fn mass(&self) -> Option<NoMass> {
        None
    }

    fn init(&self) -> InitialState {
        InitialState {
            nparams: self.params.len(),
            init: self.init.clone(),
        }
    }

    fn get_params(&self, p: &mut V) {
        p.copy_from(&self.params);
    }

    fn root(&self) -> Option<NoOutput> {
        None
    }

    fn out(&self) -> Option<NoOutput> {
        None
    }

    fn set_params(&mut self, p: &V) {
        self.params.copy_from(p);
    }
}
