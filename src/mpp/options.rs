//! Configuration and result types for the MPP search.
//!
//! - [`MppOptions`], [`Tolerances`] and [`PenaltySchedule`]: inner L-BFGS
//!   settings and the augmented-Lagrangian outer loop.
//! - [`LineSearcher`]: choice of line search used by L-BFGS.
//! - [`MppOutcome`]: the selected most probable point and its diagnostics.
use crate::{
    errors::{ReliabilityError, ReliabilityResult},
    limit_state::Point,
    mpp::{
        types::DEFAULT_LBFGS_MEM,
        validation::{verify_constraint_tol, verify_penalty, verify_tol_cost, verify_tol_grad},
    },
};
use std::str::FromStr;

/// Choice of line search used inside the L-BFGS solver.
///
/// Parsing accepts case-insensitive `"MoreThuente"` and `"HagerZhang"`;
/// any other value returns [`ReliabilityError::InvalidLineSearch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = ReliabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(ReliabilityError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Stopping rules of one inner L-BFGS solve.
///
/// - `tol_grad`: stop when the gradient norm falls below this threshold.
/// - `tol_cost`: stop when the change in cost falls below this threshold.
/// - `max_iter`: hard cap on inner iterations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: f64,
    pub tol_cost: f64,
    pub max_iter: usize,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`ReliabilityError::InvalidTolGrad`] / [`ReliabilityError::InvalidTolCost`]
    ///   for non-finite or non-positive tolerances.
    /// - [`ReliabilityError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(tol_grad: f64, tol_cost: f64, max_iter: usize) -> ReliabilityResult<Self> {
        verify_tol_grad(tol_grad)?;
        verify_tol_cost(tol_cost)?;
        if max_iter == 0 {
            return Err(ReliabilityError::InvalidMaxIter {
                max_iter,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { tol_grad: 1e-8, tol_cost: 1e-14, max_iter: 500 }
    }
}

/// Penalty weight `μ` of the augmented Lagrangian and its growth.
///
/// After every outer iteration that misses the constraint tolerance,
/// `μ ← min(μ · growth, max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenaltySchedule {
    pub initial: f64,
    pub growth: f64,
    pub max: f64,
}

impl PenaltySchedule {
    /// # Errors
    /// [`ReliabilityError::InvalidPenalty`] per [`verify_penalty`].
    pub fn new(initial: f64, growth: f64, max: f64) -> ReliabilityResult<Self> {
        verify_penalty(initial, growth, max)?;
        Ok(Self { initial, growth, max })
    }

    pub fn next(&self, mu: f64) -> f64 {
        (mu * self.growth).min(self.max)
    }
}

impl Default for PenaltySchedule {
    fn default() -> Self {
        Self { initial: 10.0, growth: 10.0, max: 1e6 }
    }
}

/// MPP search configuration.
///
/// Fields:
/// - `tols: Tolerances` — inner L-BFGS stopping rules.
/// - `line_searcher: LineSearcher` — line search used by L-BFGS.
/// - `lbfgs_mem: Option<usize>` — history length, `None` uses 7.
/// - `penalty: PenaltySchedule` — augmented-Lagrangian penalty weights.
/// - `constraint_tol: f64` — outer loop stops once `|G(u)|` is below this.
/// - `max_outer: usize` — cap on multiplier updates per start.
/// - `verbose: bool` — attaches the argmin slog observer (feature
///   `obs_slog`).
///
/// Default:
/// - `tol_grad = 1e-8`, `tol_cost = 1e-14`, `max_iter = 500`,
///   `MoreThuente`, memory 7, penalty `10 → ×10 → 1e6`,
///   `constraint_tol = 1e-6`, `max_outer = 50`, not verbose.
#[derive(Debug, Clone, PartialEq)]
pub struct MppOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub lbfgs_mem: Option<usize>,
    pub penalty: PenaltySchedule,
    pub constraint_tol: f64,
    pub max_outer: usize,
    pub verbose: bool,
}

impl MppOptions {
    /// Create validated MPP search options.
    ///
    /// # Errors
    /// - [`ReliabilityError::InvalidLBFGSMem`] if `lbfgs_mem == Some(0)`.
    /// - [`ReliabilityError::InvalidConstraintTol`] for a bad constraint
    ///   tolerance.
    /// - [`ReliabilityError::InvalidMaxIter`] if `max_outer == 0`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, lbfgs_mem: Option<usize>,
        penalty: PenaltySchedule, constraint_tol: f64, max_outer: usize, verbose: bool,
    ) -> ReliabilityResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(ReliabilityError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        verify_constraint_tol(constraint_tol)?;
        if max_outer == 0 {
            return Err(ReliabilityError::InvalidMaxIter {
                max_iter: max_outer,
                reason: "Outer iterations must be greater than zero.",
            });
        }
        Ok(Self { tols, line_searcher, lbfgs_mem, penalty, constraint_tol, max_outer, verbose })
    }

    pub fn memory(&self) -> usize {
        self.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM)
    }
}

impl Default for MppOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances::default(),
            line_searcher: LineSearcher::MoreThuente,
            lbfgs_mem: None,
            penalty: PenaltySchedule::default(),
            constraint_tol: 1e-6,
            max_outer: 50,
            verbose: false,
        }
    }
}

/// Result of a successful MPP search.
///
/// - `u_star`: point on `G(u) ≈ 0` closest to the origin among all starts.
/// - `beta`: reliability index `‖u_star‖`.
/// - `constraint_residual`: `G(u_star)`.
/// - `outer_iterations`, `inner_iterations`: work spent on the winning start.
/// - `start_index`: index of the winning initial guess.
#[derive(Debug, Clone, PartialEq)]
pub struct MppOutcome {
    pub u_star: Point,
    pub beta: f64,
    pub constraint_residual: f64,
    pub outer_iterations: usize,
    pub inner_iterations: u64,
    pub start_index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Line searcher names parse case-insensitively.
    //
    // Given
    // -----
    // - "morethuente", "HAGERZHANG" and "backtracking".
    //
    // Expect
    // ------
    // - The first two parse; the last is `InvalidLineSearch` carrying the
    //   rejected name.
    fn line_searcher_from_str() {
        assert_eq!("morethuente".parse::<LineSearcher>(), Ok(LineSearcher::MoreThuente));
        assert_eq!("HAGERZHANG".parse::<LineSearcher>(), Ok(LineSearcher::HagerZhang));
        match "backtracking".parse::<LineSearcher>() {
            Err(ReliabilityError::InvalidLineSearch { name, .. }) => assert_eq!(name, "backtracking"),
            other => panic!("Expected InvalidLineSearch, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Option constructors reject zero memory, zero outer iterations and
    // zero inner iterations.
    //
    // Given
    // -----
    // - `lbfgs_mem = Some(0)`, `max_outer = 0`, `max_iter = 0`.
    //
    // Expect
    // ------
    // - `InvalidLBFGSMem`, `InvalidMaxIter`, `InvalidMaxIter`.
    fn options_reject_zero_counts() {
        let tols = Tolerances::default();
        let penalty = PenaltySchedule::default();
        assert!(matches!(
            MppOptions::new(tols, LineSearcher::MoreThuente, Some(0), penalty, 1e-6, 50, false),
            Err(ReliabilityError::InvalidLBFGSMem { mem: 0, .. })
        ));
        assert!(matches!(
            MppOptions::new(tols, LineSearcher::MoreThuente, None, penalty, 1e-6, 0, false),
            Err(ReliabilityError::InvalidMaxIter { max_iter: 0, .. })
        ));
        assert!(matches!(
            Tolerances::new(1e-8, 1e-12, 0),
            Err(ReliabilityError::InvalidMaxIter { max_iter: 0, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // The penalty schedule grows geometrically up to its cap.
    //
    // Given
    // -----
    // - Schedule (10, 10, 1e3).
    //
    // Expect
    // ------
    // - 10 → 100 → 1000 → 1000.
    fn penalty_schedule_saturates() {
        let schedule = PenaltySchedule::new(10.0, 10.0, 1e3).expect("valid schedule");
        let mut mu = schedule.initial;
        let mut seen = vec![mu];
        for _ in 0..3 {
            mu = schedule.next(mu);
            seen.push(mu);
        }
        assert_eq!(seen, vec![10.0, 100.0, 1000.0, 1000.0]);
        assert_eq!(MppOptions::default().memory(), DEFAULT_LBFGS_MEM);
    }
}
