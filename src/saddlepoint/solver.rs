//! saddlepoint::solver — root of `K(t) − t = 0`.
//!
//! Purpose
//! -------
//! Solve the saddlepoint equation on every bracket produced by the
//! piecewise domain scan with `argmin`'s Brent root finder, keep the roots
//! that satisfy the residual check, and select the saddlepoint.
//!
//! Key behaviors
//! -------------
//! - Brackets come from [`scan_brackets`]; when none exist, the raw scan
//!   range is tried as a last resort.
//! - Roots are accepted only if `|K(t) − t| < root_tol`.
//! - `t = 0` solves the equation for every CGF and carries no tail
//!   information. Among accepted roots the non-trivial one with the
//!   smallest `|t|` is selected.
//!
//! Errors
//! ------
//! - [`ReliabilityError::NoSignChange`] if neither the scan nor the raw
//!   range yields a sign change away from `t = 0`.
//! - [`ReliabilityError::RootNotConverged`] if no bracket yields a root that
//!   passes the residual check.
use crate::{
    errors::{ReliabilityError, ReliabilityResult},
    saddlepoint::{
        cgf::Cgf,
        domain::{Bracket, saddlepoint_equation, scan_brackets},
        options::ScanOptions,
    },
};
use argmin::{
    core::{CostFunction, Error, Executor, State},
    solver::brent::BrentRoot,
};

/// Roots with `|t|` at most this are the trivial root `t = 0`.
pub const TRIVIAL_ROOT_TOL: f64 = 1e-9;
/// Interval tolerance handed to the Brent root finder.
pub const BRENT_TOL: f64 = 1e-12;
/// Iteration cap for one Brent solve.
pub const BRENT_MAX_ITERS: u64 = 100;

/// Selected saddlepoint together with every accepted root.
///
/// `slope` is `K′(t_s) − 1`, the derivative of the saddlepoint equation at
/// the root; values near zero flag a nearly double root.
#[derive(Debug, Clone, PartialEq)]
pub struct Saddlepoint {
    pub t_s: f64,
    pub residual: f64,
    pub slope: f64,
    pub bracket: Bracket,
    pub candidates: Vec<f64>,
}

/// `argmin` problem wrapper for `g(t) = K(t) − t`.
struct SaddlepointEquation<'a> {
    cgf: &'a Cgf,
}

impl CostFunction for SaddlepointEquation<'_> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, t: &f64) -> Result<f64, Error> {
        Ok(saddlepoint_equation(self.cgf, *t))
    }
}

/// solve_saddlepoint — find the saddlepoint of `cgf`.
///
/// Parameters
/// ----------
/// - `cgf`: `&Cgf`
///   Cumulant generating function.
/// - `scan`: `&ScanOptions`
///   Range and grid of the domain scan.
/// - `root_tol`: `f64`
///   Acceptance threshold on `|K(t_s) − t_s|`.
///
/// Returns
/// -------
/// `ReliabilityResult<Saddlepoint>`
///   The selected root, its residual and bracket, and all accepted roots in
///   scan order.
///
/// Errors
/// ------
/// - `NoSignChange { lower, upper }` with the raw scan range when no
///   bracket exists or the only accepted root is the trivial `t = 0`.
/// - `RootNotConverged { root, residual }` for the last rejected root when
///   no non-trivial root passes the residual check.
/// - Backend errors from `argmin` are propagated.
pub fn solve_saddlepoint(
    cgf: &Cgf, scan: &ScanOptions, root_tol: f64,
) -> ReliabilityResult<Saddlepoint> {
    let mut brackets = scan_brackets(cgf, scan);
    if brackets.is_empty() {
        brackets.push(fallback_bracket(cgf, scan)?);
    }

    let mut accepted: Vec<(f64, f64, Bracket)> = Vec::with_capacity(brackets.len());
    let mut rejected = None;
    for bracket in brackets {
        let root = if bracket.is_degenerate() { bracket.lower } else { brent_root(cgf, &bracket)? };
        let residual = saddlepoint_equation(cgf, root);
        if residual.abs() < root_tol {
            accepted.push((root, residual, bracket));
        } else {
            log::debug!("rejected root {root} on {bracket:?} with residual {residual:e}");
            rejected = Some(ReliabilityError::RootNotConverged { root, residual });
        }
    }

    let candidates: Vec<f64> = accepted.iter().map(|&(root, _, _)| root).collect();
    let selected = accepted
        .iter()
        .filter(|(root, _, _)| root.abs() > TRIVIAL_ROOT_TOL)
        .min_by(|a, b| a.0.abs().total_cmp(&b.0.abs()))
        .copied();

    match selected {
        Some((t_s, residual, bracket)) => {
            let slope = cgf.first_derivative(t_s) - 1.0;
            Ok(Saddlepoint { t_s, residual, slope, bracket, candidates })
        }
        None => {
            log::debug!("no non-trivial saddlepoint; accepted roots {candidates:?}");
            Err(rejected.unwrap_or(ReliabilityError::NoSignChange {
                lower: scan.lower,
                upper: scan.upper,
            }))
        }
    }
}

// Raw scan range, used only when the piecewise scan found nothing.
fn fallback_bracket(cgf: &Cgf, scan: &ScanOptions) -> ReliabilityResult<Bracket> {
    let g_lo = saddlepoint_equation(cgf, scan.lower);
    let g_hi = saddlepoint_equation(cgf, scan.upper);
    if g_lo.is_finite() && g_hi.is_finite() && g_lo * g_hi < 0.0 {
        log::debug!("domain scan found no bracket; using raw range [{}, {}]", scan.lower, scan.upper);
        Ok(Bracket { lower: scan.lower, upper: scan.upper })
    } else {
        Err(ReliabilityError::NoSignChange { lower: scan.lower, upper: scan.upper })
    }
}

fn brent_root(cgf: &Cgf, bracket: &Bracket) -> ReliabilityResult<f64> {
    let solver = BrentRoot::new(bracket.lower, bracket.upper, BRENT_TOL);
    let res = Executor::new(SaddlepointEquation { cgf }, solver)
        .configure(|state| state.max_iters(BRENT_MAX_ITERS))
        .run()?;
    res.state().get_param().copied().ok_or_else(|| ReliabilityError::NotInitialized {
        text: "Brent root finder returned no parameter.".to_string(),
    })
}
