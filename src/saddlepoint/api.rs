//! High-level entry points of the saddlepoint SORM pipeline.
//!
//! [`saddlepoint_probability`] runs gradient → Hessian → CGF → saddlepoint →
//! tail probability at a given MPP; [`analyse`] first locates the MPP with
//! [`find_mpp`] and then runs the pipeline on it.
use crate::{
    differentiation::{
        finite_diff::gradient,
        supplier::HessianSupplier,
        types::{Gradient, Hessian},
        validation::validate_gradient,
    },
    errors::{ReliabilityError, ReliabilityResult},
    limit_state::{LimitState, Point, validate_dimension, validate_point},
    mpp::{MppOptions, MppOutcome, find_mpp, form_probability},
    saddlepoint::{
        cgf::Cgf,
        options::SaddlepointOptions,
        solver::{Saddlepoint, solve_saddlepoint},
        tail::{TailStatistics, tail_probability},
    },
};
use ndarray::Array1;

/// Tolerance outside `[0, 1]` still accepted as a probability.
pub const PROBABILITY_SLACK: f64 = 1e-9;

/// Everything computed on the way to `p_f`.
///
/// - `u_star`: evaluation point.
/// - `gradient`, `hessian`: derivatives of `G` at `u_star`.
/// - `hessian_source`: label of the [`HessianSupplier`] used.
/// - `curvature`: `r_i = sqrt(h_i)`.
/// - `saddlepoint`: selected root and all accepted roots.
/// - `tail`: `w`, `t`, `K(t_s)`, `K″(t_s)`, `p_f`.
#[derive(Debug, Clone, PartialEq)]
pub struct SaddlepointReport {
    pub u_star: Point,
    pub gradient: Gradient,
    pub hessian: Hessian,
    pub hessian_source: &'static str,
    pub curvature: Array1<f64>,
    pub saddlepoint: Saddlepoint,
    pub tail: TailStatistics,
}

impl SaddlepointReport {
    /// Probability of failure.
    pub fn p_f(&self) -> f64 {
        self.tail.p_f
    }
}

/// MPP search followed by the saddlepoint pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub mpp: MppOutcome,
    pub form_pf: f64,
    pub report: SaddlepointReport,
}

/// saddlepoint_probability — SORM probability of failure at a given MPP.
///
/// Purpose
/// -------
/// Characterise the curvature of `g` at `u_star`, build the CGF of the
/// shifted quadratic form, solve `K(t) − t = 0` and evaluate the corrected
/// tail probability.
///
/// Parameters
/// ----------
/// - `g`: `&dyn LimitState`
///   Limit-state function; failure is `G(u) < 0`.
/// - `u_star`: `&Point`
///   Most probable point. Must be non-empty and finite.
/// - `supplier`: `&dyn HessianSupplier`
///   Source of the Hessian at `u_star`.
/// - `opts`: `&SaddlepointOptions`
///   Gradient step, curvature mode, tail variant, root tolerance, scan.
///
/// Returns
/// -------
/// `ReliabilityResult<SaddlepointReport>`
///   All intermediate quantities and `p_f`.
///
/// Errors
/// ------
/// - `EmptyPoint` / `InvalidPoint` for a bad `u_star`.
/// - `DimensionMismatch` if `g` declares a dimension other than
///   `u_star.len()`.
/// - `InvalidStep`, `InvalidGradient`, `HessianDimMismatch`,
///   `InvalidHessian` from differentiation.
/// - `NegativeCurvature` from the curvature transform.
/// - `NoSignChange` / `RootNotConverged` from the saddlepoint solver.
/// - `ProbabilityOutOfRange` if `p_f ∉ [−1e-9, 1 + 1e-9]` or is not finite.
///
/// Notes
/// -----
/// - Inputs are never mutated and nothing is cached; identical inputs give
///   bit-identical reports.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_reliability::differentiation::FixedHessian;
/// # use rust_reliability::limit_state::EllipticalG2;
/// # use rust_reliability::saddlepoint::{saddlepoint_probability, SaddlepointOptions};
/// let g2 = EllipticalG2::reference();
/// let u_star = array![1.27, 1.59];
/// let supplier = FixedHessian(array![[4.0, 0.0], [0.0, 1.0]]);
/// let report =
///     saddlepoint_probability(&g2, &u_star, &supplier, &SaddlepointOptions::default()).unwrap();
/// assert!((0.0..=1.0).contains(&report.p_f()));
/// ```
pub fn saddlepoint_probability(
    g: &dyn LimitState, u_star: &Point, supplier: &dyn HessianSupplier, opts: &SaddlepointOptions,
) -> ReliabilityResult<SaddlepointReport> {
    validate_point(u_star)?;
    let n = u_star.len();
    validate_dimension(g, n)?;

    let grad = gradient(g, u_star, opts.fd_step)?;
    validate_gradient(&grad, n)?;
    let hessian = supplier.hessian(g, u_star)?;
    log::debug!("{} Hessian at {u_star}: {hessian}", supplier.label());

    let cgf = Cgf::from_hessian(&hessian, opts.curvature_mode)?;
    let saddlepoint = solve_saddlepoint(&cgf, &opts.scan, opts.root_tol)?;
    log::debug!(
        "saddlepoint t_s = {:.10} (residual {:.2e}, slope {:.4}, {} accepted roots)",
        saddlepoint.t_s,
        saddlepoint.residual,
        saddlepoint.slope,
        saddlepoint.candidates.len()
    );

    let tail = tail_probability(&cgf, saddlepoint.t_s, opts.tail_variant);
    check_probability(tail.p_f)?;
    log::info!(
        "p_f = {:.6e} (w = {:.6}, t = {:.6}, {:?} tail, {:?} curvature{})",
        tail.p_f,
        tail.w,
        tail.t,
        opts.tail_variant,
        opts.curvature_mode,
        if tail.singular { ", singular" } else { "" }
    );

    Ok(SaddlepointReport {
        u_star: u_star.clone(),
        gradient: grad,
        hessian,
        hessian_source: supplier.label(),
        curvature: cgf.curvature(),
        saddlepoint,
        tail,
    })
}

/// analyse — locate the MPP, then run the saddlepoint pipeline on it.
///
/// # Errors
/// - Input errors from the MPP search (no or inconsistent guesses).
/// - [`ReliabilityError::MppNotConverged`] if no start converges; the
///   pipeline is not run in that case.
/// - Any error of [`saddlepoint_probability`].
pub fn analyse(
    g: &dyn LimitState, initial_guesses: &[Point], mpp_opts: &MppOptions,
    supplier: &dyn HessianSupplier, opts: &SaddlepointOptions,
) -> ReliabilityResult<Analysis> {
    let mpp = find_mpp(g, initial_guesses, mpp_opts)?;
    let form_pf = form_probability(mpp.beta);
    let report = saddlepoint_probability(g, &mpp.u_star, supplier, opts)?;
    Ok(Analysis { mpp, form_pf, report })
}

fn check_probability(p_f: f64) -> ReliabilityResult<()> {
    if !p_f.is_finite() || p_f < -PROBABILITY_SLACK || p_f > 1.0 + PROBABILITY_SLACK {
        return Err(ReliabilityError::ProbabilityOutOfRange { value: p_f });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The full pipeline on the reference G2 with finite-difference,
    //   fixed and analytic Hessians.
    // - Error propagation from each stage (input, curvature, tail range).
    // - Determinism of repeated runs.
    //
    // Cross-checks against Monte Carlo live in the integration tests.
    // -------------------------------------------------------------------------
    use super::*;
    use crate::{
        differentiation::{AnalyticHessian, FiniteDifferenceHessian, FixedHessian},
        limit_state::EllipticalG2,
        saddlepoint::tail::TailVariant,
    };
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Finite-difference pipeline at the reference point.
    //
    // Given
    // -----
    // - Reference G2 at u* = (1.27, 1.59), default options.
    //
    // Expect
    // ------
    // - Gradient ≈ (-0.865, -0.82), Hessian diagonal ≈ (2, 8),
    //   t_s ≈ -4.6080, w ≈ -3.0358, p_f ≈ 0.0014988.
    fn finite_difference_pipeline_reference_values() {
        // Arrange
        let g2 = EllipticalG2::reference();
        let u = array![1.27, 1.59];

        // Act
        let report = saddlepoint_probability(
            &g2,
            &u,
            &FiniteDifferenceHessian::default(),
            &SaddlepointOptions::default(),
        )
        .expect("pipeline succeeds");

        // Assert
        assert_abs_diff_eq!(report.gradient[0], -0.865, epsilon = 1e-5);
        assert_abs_diff_eq!(report.gradient[1], -0.82, epsilon = 1e-5);
        assert_abs_diff_eq!(report.hessian[[0, 0]], 2.0, epsilon = 1e-2);
        assert_abs_diff_eq!(report.hessian[[1, 1]], 8.0, epsilon = 1e-2);
        assert_abs_diff_eq!(report.saddlepoint.t_s, -4.6080, epsilon = 5e-3);
        assert_abs_diff_eq!(report.tail.w, -3.0358, epsilon = 5e-3);
        assert_abs_diff_eq!(report.p_f(), 0.0014988, epsilon = 5e-5);
        assert_eq!(report.hessian_source, "finite-difference");
    }

    #[test]
    // Purpose
    // -------
    // Fixed and analytic suppliers give the same report.
    //
    // Given
    // -----
    // - `FixedHessian(diag(0.5, 2))` and the analytic G2 Hessian.
    //
    // Expect
    // ------
    // - Identical t_s and p_f ≈ 0.0122057.
    fn fixed_and_analytic_suppliers_agree() {
        let g2 = EllipticalG2::reference();
        let u = array![1.27, 1.59];
        let opts = SaddlepointOptions::default();
        let fixed = FixedHessian(array![[0.5, 0.0], [0.0, 2.0]]);
        let analytic = AnalyticHessian::new(|p: &Point| g2.analytic_hessian(p));

        let a = saddlepoint_probability(&g2, &u, &fixed, &opts).expect("fixed");
        let b = saddlepoint_probability(&g2, &u, &analytic, &opts).expect("analytic");

        assert_eq!(a.saddlepoint.t_s, b.saddlepoint.t_s);
        assert_eq!(a.p_f(), b.p_f());
        assert_abs_diff_eq!(a.p_f(), 0.0122057, epsilon = 1e-6);
        assert_eq!(b.hessian_source, "analytic");
    }

    #[test]
    // Purpose
    // -------
    // Curvature diag(4, 1) stays inside [0, 1] with the default variant.
    //
    // Given
    // -----
    // - Fixed Hessian diag(4, 1) at (1.27, 1.59).
    //
    // Expect
    // ------
    // - p_f ≈ 0.0040924 ∈ [0, 1].
    fn diag_four_one_probability_in_range() {
        let g2 = EllipticalG2::reference();
        let report = saddlepoint_probability(
            &g2,
            &array![1.27, 1.59],
            &FixedHessian(array![[4.0, 0.0], [0.0, 1.0]]),
            &SaddlepointOptions::default(),
        )
        .expect("pipeline succeeds");
        assert!((0.0..=1.0).contains(&report.p_f()));
        assert_abs_diff_eq!(report.p_f(), 0.0040924, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // A tail value outside [0, 1] is reported as an error, not a probability.
    //
    // Given
    // -----
    // - Fixed Hessian diag(4, 1) with `TailVariant::Curvature`, whose raw
    //   value is ≈ -0.000509.
    //
    // Expect
    // ------
    // - `ProbabilityOutOfRange` with a negative value.
    fn out_of_range_probability_is_an_error() {
        let g2 = EllipticalG2::reference();
        let opts =
            SaddlepointOptions { tail_variant: TailVariant::Curvature, ..SaddlepointOptions::default() };
        match saddlepoint_probability(
            &g2,
            &array![1.27, 1.59],
            &FixedHessian(array![[4.0, 0.0], [0.0, 1.0]]),
            &opts,
        ) {
            Err(ReliabilityError::ProbabilityOutOfRange { value }) => assert!(value < 0.0),
            other => panic!("Expected ProbabilityOutOfRange, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Input and curvature errors stop the pipeline.
    //
    // Given
    // -----
    // - An empty point; a 1-D point for the 2-D G2; a Hessian with a
    //   negative diagonal entry.
    //
    // Expect
    // ------
    // - `EmptyPoint`; `DimensionMismatch` before any evaluation of G;
    //   `NegativeCurvature { index: 0, .. }`.
    fn stage_errors_propagate() {
        let g2 = EllipticalG2::reference();
        let opts = SaddlepointOptions::default();
        assert_eq!(
            saddlepoint_probability(&g2, &Array1::zeros(0), &FixedHessian(Hessian::zeros((0, 0))), &opts),
            Err(ReliabilityError::EmptyPoint)
        );
        assert_eq!(
            saddlepoint_probability(
                &g2,
                &array![1.0],
                &FiniteDifferenceHessian::default(),
                &opts
            ),
            Err(ReliabilityError::DimensionMismatch { expected: 2, found: 1 })
        );
        match saddlepoint_probability(
            &g2,
            &array![1.27, 1.59],
            &FixedHessian(array![[-1.0, 0.0], [0.0, 1.0]]),
            &opts,
        ) {
            Err(err @ ReliabilityError::NegativeCurvature { index: 0, .. }) => {
                assert_eq!(err.stage(), crate::errors::Stage::Curvature)
            }
            other => panic!("Expected NegativeCurvature, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Repeated runs on identical inputs are bit-identical.
    //
    // Given
    // -----
    // - The finite-difference pipeline run twice.
    //
    // Expect
    // ------
    // - Equal reports.
    fn repeated_runs_are_identical() {
        let g2 = EllipticalG2::reference();
        let u = array![1.27, 1.59];
        let supplier = FiniteDifferenceHessian::default();
        let opts = SaddlepointOptions::default();
        let first = saddlepoint_probability(&g2, &u, &supplier, &opts).expect("first run");
        let second = saddlepoint_probability(&g2, &u, &supplier, &opts).expect("second run");
        assert_eq!(first, second);
    }

    #[test]
    // Purpose
    // -------
    // `analyse` chains the MPP search and the pipeline.
    //
    // Given
    // -----
    // - Reference G2, start (0, 0), analytic Hessian.
    //
    // Expect
    // ------
    // - β ≈ 1.96405, FORM ≈ 0.024762, report evaluated at the MPP.
    fn analyse_chains_mpp_and_pipeline() {
        let g2 = EllipticalG2::reference();
        let analytic = AnalyticHessian::new(|p: &Point| g2.analytic_hessian(p));
        let analysis = analyse(
            &g2,
            &[array![0.0, 0.0]],
            &MppOptions::default(),
            &analytic,
            &SaddlepointOptions::default(),
        )
        .expect("analysis succeeds");
        assert_abs_diff_eq!(analysis.mpp.beta, 1.9640493, epsilon = 1e-4);
        assert_abs_diff_eq!(analysis.form_pf, 0.024762, epsilon = 1e-5);
        assert_eq!(analysis.report.u_star, analysis.mpp.u_star);
        assert!((0.0..=1.0).contains(&analysis.report.p_f()));
    }
}
