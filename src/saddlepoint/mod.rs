//! saddlepoint — curvature-based SORM with a saddlepoint tail approximation.
//!
//! Purpose
//! -------
//! Estimate `p_f = P[G(U) < 0]` from the curvature of the limit state at
//! the most probable point. The curvature terms define the cumulant
//! generating function `K(t)` of a weighted sum of non-central chi-square
//! variables; the root of `K(t) − t = 0` is converted into a corrected tail
//! probability.
//!
//! Key behaviors
//! -------------
//! - [`cgf`]: curvature terms (diagonal or eigen) and `K`, `K′`, `K″`.
//! - [`domain`]: piecewise scan of `K(t) − t` between the poles of `K`.
//! - [`solver`]: Brent root finding on every bracket and root selection.
//! - [`tail`]: `Φ(w) + φ(w)/w · (1/w − 1/t)` with a singular fallback.
//! - [`api`]: [`saddlepoint_probability`] and [`analyse`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Every stage is a pure function of its inputs; nothing is cached.
//! - A returned `p_f` lies in `[0, 1]` up to [`api::PROBABILITY_SLACK`].
pub mod api;
pub mod cgf;
pub mod domain;
pub mod options;
pub mod solver;
pub mod tail;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::{Analysis, SaddlepointReport, analyse, saddlepoint_probability};
pub use self::cgf::{Cgf, CurvatureMode};
pub use self::options::{SaddlepointOptions, ScanOptions};
pub use self::solver::{Saddlepoint, solve_saddlepoint};
pub use self::tail::{TailStatistics, TailVariant, tail_probability};
