//! Adapter from a limit state to the `argmin` inner problem of the
//! augmented-Lagrangian MPP search.
//!
//! For fixed multiplier `λ` and penalty `μ` the inner objective is
//!
//! `L(u) = ½‖u‖² + λ G(u) + ½ μ G(u)²`
//!
//! with gradient `∇L(u) = u + (λ + μ G(u)) ∇G(u)`. `∇G` comes from
//! `finitediff` central differences, falling back to forward differences
//! when the central stencil hits a non-finite value.
use crate::{
    differentiation::validation::validate_gradient,
    errors::ReliabilityError,
    limit_state::{LimitState, Point},
    mpp::types::{Cost, Grad},
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Inner problem for one outer iteration.
#[derive(Clone, Copy)]
pub struct AugmentedLagrangian<'a> {
    pub g: &'a dyn LimitState,
    pub lambda: f64,
    pub mu: f64,
}

impl<'a> AugmentedLagrangian<'a> {
    pub fn new(g: &'a dyn LimitState, lambda: f64, mu: f64) -> Self {
        Self { g, lambda, mu }
    }

    /// `G(u)`, rejecting non-finite values.
    pub fn constraint(&self, u: &Point) -> Result<f64, Error> {
        let value = self.g.value(u);
        if !value.is_finite() {
            return Err(ReliabilityError::NonFiniteCost { value }.into());
        }
        Ok(value)
    }

    /// Finite-difference `∇G(u)`.
    pub fn constraint_gradient(&self, u: &Point) -> Result<Grad, Error> {
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let func = |v: &Point| -> f64 {
            match self.constraint(v) {
                Ok(val) => val,
                Err(e) => {
                    let mut slot = closure_err.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                    f64::NAN
                }
            }
        };
        let fd_grad = u.central_diff(&func);
        if closure_err.borrow().is_some() || validate_gradient(&fd_grad, u.len()).is_err() {
            return run_forward_diff(u, &func, &closure_err);
        }
        Ok(fd_grad)
    }
}

impl CostFunction for AugmentedLagrangian<'_> {
    type Param = Point;
    type Output = Cost;

    fn cost(&self, u: &Self::Param) -> Result<Self::Output, Error> {
        let g = self.constraint(u)?;
        Ok(0.5 * u.dot(u) + self.lambda * g + 0.5 * self.mu * g * g)
    }
}

impl Gradient for AugmentedLagrangian<'_> {
    type Param = Point;
    type Gradient = Grad;

    fn gradient(&self, u: &Self::Param) -> Result<Self::Gradient, Error> {
        let g = self.constraint(u)?;
        let grad_g = self.constraint_gradient(u)?;
        Ok(u + &(grad_g * (self.lambda + self.mu * g)))
    }
}

fn run_forward_diff<F: Fn(&Point) -> f64>(
    u: &Point, func: &F, closure_err: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    closure_err.replace(None);
    let fd_grad = u.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_gradient(&fd_grad, u.len())?;
    Ok(fd_grad)
}
