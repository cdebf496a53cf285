//! differentiation::supplier — interchangeable sources of the Hessian.
//!
//! Purpose
//! -------
//! Decouple *where* the curvature at the MPP comes from from *how* it is
//! consumed. The saddlepoint pipeline asks a [`HessianSupplier`] for a
//! validated `n × n` matrix and never needs to know whether it was built by
//! finite differences, passed in by the caller, or derived in closed form.
//!
//! Key behaviors
//! -------------
//! - [`FiniteDifferenceHessian`]: the fixed-stencil Hessian of
//!   [`finite_diff::hessian`](crate::differentiation::finite_diff::hessian).
//! - [`FixedHessian`]: a caller-supplied matrix, reused as-is.
//! - [`AnalyticHessian`]: a closure returning closed-form second
//!   derivatives at the evaluation point.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every supplier validates the returned matrix with
//!   [`validate_hessian`] against `u.len()`, so downstream code may assume
//!   a finite, square matrix of the right size.
use crate::{
    differentiation::{
        finite_diff::hessian,
        types::{DEFAULT_FD_STEP, Hessian},
        validation::{validate_hessian, verify_step},
    },
    errors::ReliabilityResult,
    limit_state::{LimitState, Point},
};

/// Source of the Hessian of a limit state at a point.
pub trait HessianSupplier {
    /// Return a validated `u.len() × u.len()` Hessian of `g` at `u`.
    fn hessian(&self, g: &dyn LimitState, u: &Point) -> ReliabilityResult<Hessian>;

    /// Short label used in logs and reports.
    fn label(&self) -> &'static str;
}

/// Finite-difference Hessian with a configurable step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiniteDifferenceHessian {
    eps: f64,
}

impl FiniteDifferenceHessian {
    /// # Errors
    /// [`ReliabilityError::InvalidStep`](crate::errors::ReliabilityError::InvalidStep)
    /// if `eps` is not finite and positive.
    pub fn new(eps: f64) -> ReliabilityResult<Self> {
        verify_step(eps)?;
        Ok(Self { eps })
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }
}

impl Default for FiniteDifferenceHessian {
    fn default() -> Self {
        Self { eps: DEFAULT_FD_STEP }
    }
}

impl HessianSupplier for FiniteDifferenceHessian {
    fn hessian(&self, g: &dyn LimitState, u: &Point) -> ReliabilityResult<Hessian> {
        let h = hessian(g, u, self.eps)?;
        validate_hessian(&h, u.len())?;
        Ok(h)
    }

    fn label(&self) -> &'static str {
        "finite-difference"
    }
}

/// Externally supplied Hessian, independent of the evaluation point.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedHessian(pub Hessian);

impl HessianSupplier for FixedHessian {
    fn hessian(&self, _g: &dyn LimitState, u: &Point) -> ReliabilityResult<Hessian> {
        validate_hessian(&self.0, u.len())?;
        Ok(self.0.clone())
    }

    fn label(&self) -> &'static str {
        "supplied"
    }
}

/// Closed-form Hessian evaluated at the point.
pub struct AnalyticHessian<F>
where
    F: Fn(&Point) -> Hessian,
{
    f: F,
}

impl<F> AnalyticHessian<F>
where
    F: Fn(&Point) -> Hessian,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> HessianSupplier for AnalyticHessian<F>
where
    F: Fn(&Point) -> Hessian,
{
    fn hessian(&self, _g: &dyn LimitState, u: &Point) -> ReliabilityResult<Hessian> {
        let h = (self.f)(u);
        validate_hessian(&h, u.len())?;
        Ok(h)
    }

    fn label(&self) -> &'static str {
        "analytic"
    }
}
