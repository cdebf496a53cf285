//! differentiation — finite-difference derivatives and Hessian suppliers.
//!
//! Purpose
//! -------
//! Provide the gradient and Hessian of a limit state at the MPP, either
//! through fixed finite-difference stencils or through a pluggable
//! [`HessianSupplier`], together with shape/finiteness validation.
//!
//! Key behaviors
//! -------------
//! - [`finite_diff::gradient`] and [`finite_diff::hessian`] implement the
//!   forward gradient, the `2ε` diagonal stencil and the mixed-partial
//!   stencil, then symmetrize.
//! - [`supplier`] offers finite-difference, fixed and analytic Hessian
//!   sources behind one trait.
//! - [`validation`] centralizes step, gradient and Hessian checks.
//!
//! Conventions
//! -----------
//! - Vectors and matrices use the aliases in [`types`].
//! - No caching: every call re-evaluates the limit state.

pub mod finite_diff;
pub mod supplier;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::finite_diff::{gradient, hessian};
pub use self::supplier::{AnalyticHessian, FiniteDifferenceHessian, FixedHessian, HessianSupplier};
pub use self::types::{DEFAULT_FD_STEP, Gradient, Hessian};
