//! Validation helpers for finite-difference derivatives.
//!
//! - **Step checks**: [`verify_step`] ensures the finite-difference step is
//!   finite and strictly positive.
//! - **Gradient validation**: [`validate_gradient`] enforces correct
//!   dimension and finite entries.
//! - **Hessian validation**: [`validate_hessian`] enforces a square
//!   `dim × dim` shape and finite entries.
//!
//! The finite-difference routines themselves never validate their output;
//! callers run these checks where a non-finite derivative must stop the
//! pipeline.
use crate::{
    differentiation::types::{Gradient, Hessian},
    errors::{ReliabilityError, ReliabilityResult},
};

/// Validate a finite-difference step.
///
/// # Errors
/// Returns [`ReliabilityError::InvalidStep`] if `eps` is non-finite or ≤ 0.0.
pub fn verify_step(eps: f64) -> ReliabilityResult<()> {
    if !eps.is_finite() {
        return Err(ReliabilityError::InvalidStep { eps, reason: "Step must be finite." });
    }
    if eps <= 0.0 {
        return Err(ReliabilityError::InvalidStep { eps, reason: "Step must be positive." });
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`ReliabilityError::GradientDimMismatch`] if length does not match `dim`.
/// - [`ReliabilityError::InvalidGradient`] with the index/value of the first
///   offending element.
pub fn validate_gradient(grad: &Gradient, dim: usize) -> ReliabilityResult<()> {
    if grad.len() != dim {
        return Err(ReliabilityError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(ReliabilityError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate the shape and entries of a Hessian matrix.
///
/// # Errors
/// - [`ReliabilityError::HessianDimMismatch`] if dimensions do not match `dim`.
/// - [`ReliabilityError::InvalidHessian`] if any entry is non-finite, with
///   offending row/col indices and value.
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> ReliabilityResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(ReliabilityError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    for ((i, j), &value) in hessian.indexed_iter() {
        if !value.is_finite() {
            return Err(ReliabilityError::InvalidHessian { row: i, col: j, value });
        }
    }
    Ok(())
}
