//! differentiation::types — shared numeric aliases for derivative work.
//!
//! Centralize the vector and matrix aliases used by the finite-difference
//! routines, the Hessian suppliers and the saddlepoint engine, so the rest
//! of the crate never names `ndarray` containers directly for derivatives.
use ndarray::{Array1, Array2};

/// First partial derivatives `∇G(u)`, same length as the point.
pub type Gradient = Array1<f64>;

/// Dense `n × n` matrix of second partial derivatives of `G` at `u`.
pub type Hessian = Array2<f64>;

/// Default finite-difference step.
pub const DEFAULT_FD_STEP: f64 = 1e-6;
