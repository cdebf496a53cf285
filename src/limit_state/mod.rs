//! limit_state — performance-function adapter and benchmark limit states.
//!
//! Purpose
//! -------
//! Wrap user-supplied scalar functions of a standard-normal input vector so
//! every other module can evaluate them through one trait, and ship the
//! benchmark limit states used throughout the tests and the CLI.
//!
//! Key behaviors
//! -------------
//! - [`LimitState`] is the only physical model in the crate: `G(u) < 0`
//!   means failure, `G(u) = 0` is the limit-state surface.
//! - Any `Fn(&Point) -> f64` is a [`LimitState`] through a blanket impl.
//! - [`validate_point`] rejects empty or non-finite evaluation points before
//!   they enter the pipeline; [`validate_dimension`] rejects points whose
//!   length differs from the dimension a limit state declares.
//!
//! Invariants & assumptions
//! ------------------------
//! - Limit states are pure: repeated evaluation at the same point returns
//!   the same value and has no side effects.
//! - Limit states may return `NaN`/`±∞` outside their domain; such values
//!   are not intercepted here and surface as validation errors downstream.

pub mod benchmarks;

use ndarray::Array1;

use crate::errors::{ReliabilityError, ReliabilityResult};

pub use self::benchmarks::EllipticalG2;

/// Point in standard-normal space (`U`), typically the MPP `U*`.
pub type Point = Array1<f64>;

/// Scalar performance function `G(u)`.
pub trait LimitState {
    /// Evaluate `G(u)`.
    fn value(&self, u: &Point) -> f64;

    /// Input dimension, when the limit state is defined for one only.
    /// `None` accepts points of any length.
    fn dim(&self) -> Option<usize> {
        None
    }
}

impl<F> LimitState for F
where
    F: Fn(&Point) -> f64,
{
    fn value(&self, u: &Point) -> f64 {
        self(u)
    }
}

/// Check that `u` is non-empty and finite.
///
/// # Errors
/// - [`ReliabilityError::EmptyPoint`] if `u` has no coordinates.
/// - [`ReliabilityError::InvalidPoint`] with the first non-finite coordinate.
pub fn validate_point(u: &Point) -> ReliabilityResult<()> {
    if u.is_empty() {
        return Err(ReliabilityError::EmptyPoint);
    }
    for (index, &value) in u.iter().enumerate() {
        if !value.is_finite() {
            return Err(ReliabilityError::InvalidPoint { index, value });
        }
    }
    Ok(())
}

/// Check that a point of length `found` fits the dimension of `g`.
///
/// # Errors
/// [`ReliabilityError::DimensionMismatch`] if `g` declares a dimension other
/// than `found`.
pub fn validate_dimension(g: &dyn LimitState, found: usize) -> ReliabilityResult<()> {
    match g.dim() {
        Some(expected) if expected != found => {
            Err(ReliabilityError::DimensionMismatch { expected, found })
        }
        _ => Ok(()),
    }
}
