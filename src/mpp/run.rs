//! Execution helper that runs an `argmin` L-BFGS solver on one inner
//! augmented-Lagrangian problem.
use crate::{
    errors::{ReliabilityError, ReliabilityResult},
    limit_state::{Point, validate_point},
    mpp::{adapter::AugmentedLagrangian, options::MppOptions, types::Grad},
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, State, TerminationStatus};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Minimizer of one inner problem.
///
/// - `u`: best point found by L-BFGS.
/// - `cost`: inner objective at `u`.
/// - `iterations`: L-BFGS iterations spent.
/// - `status`: argmin termination status, formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct InnerOutcome {
    pub u: Point,
    pub cost: f64,
    pub iterations: u64,
    pub status: String,
}

/// Run L-BFGS on an [`AugmentedLagrangian`] starting from `u0`.
///
/// # Feature flags
/// With `obs_slog` enabled and `opts.verbose == true`, a terminal slog
/// observer is attached with `ObserverMode::Always` and the starting cost
/// and gradient norm are logged before the first iteration.
///
/// # Errors
/// - Propagates `argmin` runtime errors (line-search failures, non-finite
///   costs raised by the adapter) through `From<argmin::core::Error>`.
/// - [`ReliabilityError::NotInitialized`] if the solver reports no best
///   point; [`ReliabilityError::InvalidPoint`] if that point is not finite.
pub fn run_lbfgs<'a, S>(
    u0: Point, opts: &MppOptions, problem: AugmentedLagrangian<'a>, solver: S,
) -> ReliabilityResult<InnerOutcome>
where
    S: argmin::core::Solver<
            AugmentedLagrangian<'a>,
            argmin::core::IterState<Point, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&u0, &problem)?;
    }
    let max_iter = opts.tols.max_iter as u64;
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(u0).max_iters(max_iter));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let cost = result.get_best_cost();
    let status = match result.get_termination_status() {
        TerminationStatus::NotTerminated => "Not terminated".to_string(),
        TerminationStatus::Terminated(reason) => format!("{reason:?}"),
    };
    let u = result.take_best_param().ok_or_else(|| ReliabilityError::NotInitialized {
        text: "L-BFGS returned no parameter.".to_string(),
    })?;
    validate_point(&u)?;
    Ok(InnerOutcome { u, cost, iterations, status })
}

// ---- Helper Methods ----

#[cfg(feature = "obs_slog")]
fn log_initial_state(u0: &Point, problem: &AugmentedLagrangian<'_>) -> ReliabilityResult<()> {
    let l0 = problem.cost(u0)?;
    let g0n = problem.gradient(u0).ok().map(|g| g.l2_norm());
    log::info!(
        "inner init: L(u0) = {:.6}{} (lambda = {:.4e}, mu = {:.4e})",
        l0,
        g0n.map(|n| format!(", ||grad|| = {n:.6}")).unwrap_or_default(),
        problem.lambda,
        problem.mu
    );
    Ok(())
}
