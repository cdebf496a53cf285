//! mpp — most probable point search on `G(u) = 0`.
//!
//! Purpose
//! -------
//! Locate the point of the limit-state surface closest to the origin of
//! standard-normal space, `u* = argmin ½‖u‖² s.t. G(u) = 0`, which anchors
//! both the FORM estimate `Φ(−β)` and the saddlepoint SORM pipeline.
//!
//! Key behaviors
//! -------------
//! - [`adapter::AugmentedLagrangian`] turns the constrained problem into a
//!   sequence of smooth unconstrained `argmin` problems with
//!   finite-difference gradients.
//! - [`builders`] construct L-BFGS with More–Thuente or Hager–Zhang line
//!   search; [`run::run_lbfgs`] executes one inner solve.
//! - [`search::find_mpp`] drives the outer multiplier loop over several
//!   starting points and keeps the converged start with the smallest `β`.
//!
//! Invariants & assumptions
//! ------------------------
//! - A returned `u*` satisfies `|G(u*)| < constraint_tol`; an unconverged
//!   point is never returned.
//! - Options are validated at construction ([`options`], [`validation`]).
pub mod adapter;
pub mod builders;
pub mod options;
pub mod run;
pub mod search;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::options::{LineSearcher, MppOptions, MppOutcome, PenaltySchedule, Tolerances};
pub use self::search::{find_mpp, form_probability};
