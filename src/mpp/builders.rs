//! Builders for the L-BFGS solvers used by the inner MPP problem.
//!
//! Both builders take their memory and tolerances from [`MppOptions`] so the
//! outer loop can pick a line search with a single `match`.
use crate::{
    errors::ReliabilityResult,
    limit_state::Point,
    mpp::{
        options::MppOptions,
        types::{Cost, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente, MoreThuenteLS},
    },
};
use argmin::solver::quasinewton::LBFGS;

/// L-BFGS with a Hager–Zhang line search.
///
/// # Errors
/// Propagates `argmin` errors raised while applying the tolerances.
pub fn build_optimizer_hager_zhang(opts: &MppOptions) -> ReliabilityResult<LbfgsHagerZhang> {
    let lbfgs = LbfgsHagerZhang::new(HagerZhangLS::new(), opts.memory());
    configure_lbfgs(lbfgs, opts)
}

/// L-BFGS with a More–Thuente line search.
///
/// # Errors
/// Propagates `argmin` errors raised while applying the tolerances.
pub fn build_optimizer_more_thuente(opts: &MppOptions) -> ReliabilityResult<LbfgsMoreThuente> {
    let lbfgs = LbfgsMoreThuente::new(MoreThuenteLS::new(), opts.memory());
    configure_lbfgs(lbfgs, opts)
}

/// Apply gradient and cost tolerances to an L-BFGS solver.
pub fn configure_lbfgs<L>(
    solver: LBFGS<L, Point, Grad, Cost>, opts: &MppOptions,
) -> ReliabilityResult<LBFGS<L, Point, Grad, Cost>> {
    let solver =
        solver.with_tolerance_grad(opts.tols.tol_grad)?.with_tolerance_cost(opts.tols.tol_cost)?;
    Ok(solver)
}
