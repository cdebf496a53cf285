//! differentiation::finite_diff — fixed-stencil gradients and Hessians.
//!
//! Purpose
//! -------
//! Approximate the gradient and the full Hessian of a [`LimitState`] at a
//! point with explicit finite-difference stencils and a caller-chosen step,
//! so the curvature fed into the saddlepoint engine is reproducible to the
//! last bit for a given `(G, u, eps)`.
//!
//! Key behaviors
//! -------------
//! - [`gradient`]: forward differences `(G(u + ε·e_i) − G(u)) / ε`.
//! - [`hessian`]: a three-point diagonal stencil with an effective step of
//!   `2ε` and a four-point forward mixed-partial stencil off the diagonal,
//!   followed by [`symmetrize_hess`].
//!
//! Invariants & assumptions
//! ------------------------
//! - The diagonal stencil is
//!   `(G(u + 2ε·e_i) − 2 G(u) + G(u − 2ε·e_i)) / ε²`, i.e. four times the
//!   textbook second derivative for a quadratic `G`. Downstream constants
//!   (curvature terms, poles of the CGF) are calibrated against exactly this
//!   stencil; do not replace it with the `ε`-step version.
//! - Evaluation failures inside `G` (NaN/±∞) are not intercepted; they
//!   propagate into the returned arrays and are caught by
//!   [`validate_hessian`](crate::differentiation::validation::validate_hessian)
//!   in the caller.
//!
//! Conventions
//! -----------
//! - All routines evaluate `G` on a single scratch copy of `u`; the input
//!   point itself is never mutated.
//! - The step must be finite and strictly positive; see
//!   [`verify_step`](crate::differentiation::validation::verify_step).
//!
//! Testing notes
//! -------------
//! - Unit tests cover agreement with closed-form derivatives of linear and
//!   quadratic limit states, the `2ε` diagonal scaling, symmetry, and NaN
//!   propagation.
use crate::{
    differentiation::{
        types::{Gradient, Hessian},
        validation::verify_step,
    },
    errors::{ReliabilityError, ReliabilityResult},
    limit_state::{LimitState, Point},
};

/// gradient — forward-difference gradient of a limit state.
///
/// Parameters
/// ----------
/// - `g`: `&G`
///   Limit state to differentiate.
/// - `u`: `&Point`
///   Evaluation point; its length `n` defines the gradient dimension.
/// - `eps`: `f64`
///   Forward step, finite and `> 0` (typically
///   [`DEFAULT_FD_STEP`](crate::differentiation::types::DEFAULT_FD_STEP)).
///
/// Returns
/// -------
/// `ReliabilityResult<Gradient>`
///   Length-`n` vector with `∂G/∂u_i ≈ (G(u + ε·e_i) − G(u)) / ε`.
///
/// Errors
/// ------
/// - `ReliabilityError::EmptyPoint` when `u` is empty.
/// - `ReliabilityError::InvalidStep` when `eps` is not finite and positive.
///
/// Notes
/// -----
/// - `n + 1` evaluations of `G`.
pub fn gradient<G: LimitState + ?Sized>(
    g: &G, u: &Point, eps: f64,
) -> ReliabilityResult<Gradient> {
    check_inputs(u, eps)?;
    let n = u.len();
    let f0 = g.value(u);
    let mut probe = u.clone();
    let mut grad = Gradient::zeros(n);
    for i in 0..n {
        probe[i] = u[i] + eps;
        grad[i] = (g.value(&probe) - f0) / eps;
        probe[i] = u[i];
    }
    Ok(grad)
}

/// hessian — fixed-stencil finite-difference Hessian of a limit state.
///
/// Purpose
/// -------
/// Build the full `n × n` matrix of second partial derivatives at `u`
/// using the stencils documented at module level, then enforce symmetry.
///
/// Parameters
/// ----------
/// - `g`: `&G`
///   Limit state to differentiate.
/// - `u`: `&Point`
///   Evaluation point (typically the MPP).
/// - `eps`: `f64`
///   Finite-difference step, finite and `> 0`.
///
/// Returns
/// -------
/// `ReliabilityResult<Hessian>`
///   Symmetric `n × n` matrix. Entries may be non-finite if `G` is
///   undefined at a perturbed point.
///
/// Errors
/// ------
/// - `ReliabilityError::EmptyPoint` when `u` is empty.
/// - `ReliabilityError::InvalidStep` when `eps` is not finite and positive.
///
/// Notes
/// -----
/// - Diagonal entries use `u ± 2ε·e_i`; off-diagonal entries use the
///   forward corner points `u + ε·e_i + ε·e_j`, `u + ε·e_i`, `u + ε·e_j`.
/// - Off-diagonal pairs are averaged by [`symmetrize_hess`]; the diagonal
///   is left untouched.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_reliability::differentiation::finite_diff::hessian;
/// # use rust_reliability::limit_state::EllipticalG2;
/// let g = EllipticalG2::reference();
/// let h = hessian(&g, &array![1.27, 1.59], 1e-6).unwrap();
/// // Analytic diag(0.5, 2) scaled by 4 through the 2ε diagonal stencil.
/// assert!((h[[0, 0]] - 2.0).abs() < 1e-2);
/// assert!((h[[1, 1]] - 8.0).abs() < 1e-2);
/// ```
pub fn hessian<G: LimitState + ?Sized>(g: &G, u: &Point, eps: f64) -> ReliabilityResult<Hessian> {
    check_inputs(u, eps)?;
    let n = u.len();
    let f0 = g.value(u);
    let eps_sq = eps * eps;
    let mut hess = Hessian::zeros((n, n));
    let mut probe = u.clone();
    for i in 0..n {
        for j in 0..n {
            if i == j {
                probe[i] = u[i] + eps * 2.0;
                let f_plus = g.value(&probe);
                probe[i] = u[i] - eps * 2.0;
                let f_minus = g.value(&probe);
                probe[i] = u[i];
                hess[[i, i]] = (f_plus - 2.0 * f0 + f_minus) / eps_sq;
            } else {
                probe[i] = u[i] + eps;
                probe[j] = u[j] + eps;
                let f_ij = g.value(&probe);
                probe[j] = u[j];
                let f_i = g.value(&probe);
                probe[i] = u[i];
                probe[j] = u[j] + eps;
                let f_j = g.value(&probe);
                probe[j] = u[j];
                hess[[i, j]] = (f_ij - f_i - f_j + f0) / eps_sq;
            }
        }
    }
    symmetrize_hess(&mut hess);
    Ok(hess)
}

// ---- Helper methods ----

fn check_inputs(u: &Point, eps: f64) -> ReliabilityResult<()> {
    if u.is_empty() {
        return Err(ReliabilityError::EmptyPoint);
    }
    verify_step(eps)
}

/// symmetrize_hess — enforce symmetry of a Hessian matrix in-place.
///
/// Replace each off-diagonal pair `(i, j)` / `(j, i)` with their average;
/// the diagonal is left unchanged. Assumes a square matrix.
pub fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
