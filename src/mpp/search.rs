//! High-level entry point for locating the most probable point (MPP).
//!
//! For every initial guess an augmented-Lagrangian outer loop repeatedly
//! solves the inner problem of [`AugmentedLagrangian`] with L-BFGS
//! (More–Thuente or Hager–Zhang, per [`MppOptions::line_searcher`]) and
//! updates `λ ← λ + μ G(u)`, `μ ← min(μ·growth, μ_max)` until
//! `|G(u)| < constraint_tol`. The converged start with the smallest `‖u‖`
//! wins; starts that fail are logged and skipped.
use crate::{
    errors::{ReliabilityError, ReliabilityResult},
    limit_state::{LimitState, Point, validate_dimension},
    mpp::{
        adapter::AugmentedLagrangian,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        options::{LineSearcher, MppOptions, MppOutcome},
        run::{InnerOutcome, run_lbfgs},
        validation::validate_guesses,
    },
};
use statrs::distribution::{ContinuousCDF, Normal};

/// find_mpp — most probable point of `g` from several starting points.
///
/// Parameters
/// ----------
/// - `g`: `&dyn LimitState`
///   Limit-state function in standard-normal space.
/// - `guesses`: `&[Point]`
///   Initial guesses, all of the same dimension.
/// - `opts`: `&MppOptions`
///   Inner solver and outer loop settings.
///
/// Returns
/// -------
/// `ReliabilityResult<MppOutcome>`
///   The converged point with the smallest reliability index `β = ‖u*‖`.
///
/// Errors
/// ------
/// - Input errors from [`validate_guesses`].
/// - [`ReliabilityError::DimensionMismatch`] if the guesses do not match
///   the dimension declared by `g`.
/// - [`ReliabilityError::MppNotConverged`] if no start reaches
///   `|G(u)| < constraint_tol`; `reason` describes the last failure.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_reliability::limit_state::EllipticalG2;
/// # use rust_reliability::mpp::{find_mpp, MppOptions};
/// let g2 = EllipticalG2::reference();
/// let out = find_mpp(&g2, &[array![0.0, 0.0]], &MppOptions::default()).unwrap();
/// assert!((out.beta - 1.9640).abs() < 1e-3);
/// ```
pub fn find_mpp(
    g: &dyn LimitState, guesses: &[Point], opts: &MppOptions,
) -> ReliabilityResult<MppOutcome> {
    let dim = validate_guesses(guesses)?;
    validate_dimension(g, dim)?;

    let mut best: Option<MppOutcome> = None;
    let mut last_failure: Option<ReliabilityError> = None;
    for (start_index, u0) in guesses.iter().enumerate() {
        match search_from(g, start_index, u0, opts) {
            Ok(outcome) => {
                log::debug!(
                    "MPP start {start_index} converged: beta = {:.6}, G = {:.3e}",
                    outcome.beta,
                    outcome.constraint_residual
                );
                if best.as_ref().map_or(true, |b| outcome.beta < b.beta) {
                    best = Some(outcome);
                }
            }
            Err(err) => {
                log::warn!("MPP start {start_index} failed: {err}");
                last_failure = Some(err);
            }
        }
    }

    match (best, last_failure) {
        (Some(outcome), _) => {
            log::info!(
                "MPP found at {} with beta = {:.6} (start {})",
                outcome.u_star,
                outcome.beta,
                outcome.start_index
            );
            Ok(outcome)
        }
        (None, Some(err @ ReliabilityError::MppNotConverged { .. })) => Err(err),
        (None, Some(other)) => {
            Err(ReliabilityError::MppNotConverged { residual: f64::NAN, reason: other.to_string() })
        }
        (None, None) => Err(ReliabilityError::NoInitialGuesses),
    }
}

/// First-order (FORM) estimate `Φ(−β)`.
pub fn form_probability(beta: f64) -> f64 {
    Normal::standard().cdf(-beta)
}

// Augmented-Lagrangian outer loop for one starting point.
fn search_from(
    g: &dyn LimitState, start_index: usize, u0: &Point, opts: &MppOptions,
) -> ReliabilityResult<MppOutcome> {
    let mut u = u0.clone();
    let mut lambda = 0.0;
    let mut mu = opts.penalty.initial;
    let mut inner_iterations = 0;
    let mut residual = f64::NAN;

    for outer in 1..=opts.max_outer {
        let problem = AugmentedLagrangian::new(g, lambda, mu);
        let inner = minimize_inner(u, opts, problem)?;
        inner_iterations += inner.iterations;
        u = inner.u;

        residual = g.value(&u);
        if !residual.is_finite() {
            return Err(ReliabilityError::NonFiniteCost { value: residual });
        }
        log::debug!(
            "start {start_index}, outer {outer}: G(u) = {residual:.3e}, lambda = {lambda:.4e}, \
             mu = {mu:.1e}, inner {} ({} iterations)",
            inner.status,
            inner.iterations
        );
        if residual.abs() < opts.constraint_tol {
            let beta = u.dot(&u).sqrt();
            return Ok(MppOutcome {
                u_star: u,
                beta,
                constraint_residual: residual,
                outer_iterations: outer,
                inner_iterations,
                start_index,
            });
        }
        lambda += mu * residual;
        mu = opts.penalty.next(mu);
    }

    Err(ReliabilityError::MppNotConverged {
        residual,
        reason: format!(
            "start {start_index}: |G(u)| stayed above {:e} after {} outer iterations",
            opts.constraint_tol, opts.max_outer
        ),
    })
}

fn minimize_inner(
    u: Point, opts: &MppOptions, problem: AugmentedLagrangian<'_>,
) -> ReliabilityResult<InnerOutcome> {
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(u, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(u, opts, problem, solver)
        }
    }
}
