//! Integration tests for the saddlepoint SORM pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path from a limit state and its MPP, through
//!   differentiation, the CGF and the saddlepoint solve, to the tail
//!   probability, using only the public API.
//! - Cross-check the saddlepoint estimate against the Monte Carlo oracle on
//!   the elliptical benchmark surface.
//!
//! Coverage
//! --------
//! - `saddlepoint::saddlepoint_probability` with finite-difference, fixed and
//!   analytic Hessian suppliers.
//! - `mpp::find_mpp` feeding the pipeline, and `saddlepoint::analyse`.
//! - `simulation::monte_carlo_seeded` as the reference estimate.
//! - Error surfaces that cross module boundaries (curvature, bracketing).
//!
//! Exclusions
//! ----------
//! - Low-level building blocks (CGF derivatives, domain scan, option
//!   validation) are covered by unit tests.
//! - Python bindings and the `sorm` binary.
use approx::assert_abs_diff_eq;
use ndarray::{Array1, array};
use rust_reliability::{
    differentiation::{AnalyticHessian, FiniteDifferenceHessian, FixedHessian},
    errors::{ReliabilityError, Stage},
    limit_state::{EllipticalG2, Point},
    mpp::{MppOptions, find_mpp, form_probability},
    saddlepoint::{
        CurvatureMode, SaddlepointOptions, ScanOptions, TailVariant, analyse,
        saddlepoint_probability,
    },
    simulation::monte_carlo_seeded,
};

/// Purpose
/// -------
/// Starting points used for the benchmark MPP search.
fn benchmark_guesses() -> Vec<Point> {
    vec![array![3.0, 2.0], array![0.0, 0.0], array![2.0, 1.0], array![1.5, 1.5]]
}

/// Purpose
/// -------
/// Reference evaluation point near the G2 MPP.
fn reference_u_star() -> Point {
    array![1.27, 1.59]
}

#[test]
// Purpose
// -------
// The saddlepoint estimate with the closed-form Hessian agrees with Monte
// Carlo at the MPP found by the search.
//
// Given
// -----
// - Reference G2; MPP from the four standard starts.
// - 100 000 Monte Carlo samples with seed 42.
//
// Expect
// ------
// - |p_f(saddlepoint) − p_f(MC)| < 0.01, both positive.
// - FORM at the same β is within the same band.
fn analytic_hessian_agrees_with_monte_carlo() {
    // Arrange
    let g2 = EllipticalG2::reference();
    let mpp = find_mpp(&g2, &benchmark_guesses(), &MppOptions::default()).expect("MPP found");
    let analytic = AnalyticHessian::new(|u: &Point| g2.analytic_hessian(u));

    // Act
    let report = saddlepoint_probability(&g2, &mpp.u_star, &analytic, &SaddlepointOptions::default())
        .expect("pipeline succeeds");
    let mc = monte_carlo_seeded(&g2, 2, 100_000, 42).expect("simulation succeeds");

    // Assert
    assert!(report.p_f() > 0.0);
    assert!(mc.p_f > 0.0);
    assert!(
        (report.p_f() - mc.p_f).abs() < 0.01,
        "saddlepoint {} vs Monte Carlo {}",
        report.p_f(),
        mc.p_f
    );
    assert!((form_probability(mpp.beta) - mc.p_f).abs() < 0.02);
}

#[test]
// Purpose
// -------
// The finite-difference path stays close to Monte Carlo even though its
// Hessian stencil over-weights the curvature.
//
// Given
// -----
// - Reference G2 at u* = (1.27, 1.59), finite-difference Hessian.
// - 100 000 Monte Carlo samples with seed 42.
//
// Expect
// ------
// - |p_f(saddlepoint) − p_f(MC)| < 0.015.
fn finite_difference_path_within_tolerance_of_monte_carlo() {
    let g2 = EllipticalG2::reference();
    let report = saddlepoint_probability(
        &g2,
        &reference_u_star(),
        &FiniteDifferenceHessian::default(),
        &SaddlepointOptions::default(),
    )
    .expect("pipeline succeeds");
    let mc = monte_carlo_seeded(&g2, 2, 100_000, 42).expect("simulation succeeds");

    assert!((report.p_f() - mc.p_f).abs() < 0.015);
    assert_abs_diff_eq!(report.p_f(), 0.0014988, epsilon = 5e-5);
}

#[test]
// Purpose
// -------
// `analyse` gives the same answer as calling the search and the pipeline
// separately, and repeated runs are bit-identical.
//
// Given
// -----
// - Reference G2, standard starts, analytic Hessian.
//
// Expect
// ------
// - Same u*, β and p_f from both paths; two `analyse` runs compare equal.
fn analyse_matches_manual_chain_and_is_deterministic() {
    let g2 = EllipticalG2::reference();
    let analytic = AnalyticHessian::new(|u: &Point| g2.analytic_hessian(u));
    let mpp_opts = MppOptions::default();
    let opts = SaddlepointOptions::default();

    let first = analyse(&g2, &benchmark_guesses(), &mpp_opts, &analytic, &opts).expect("analysis");
    let second = analyse(&g2, &benchmark_guesses(), &mpp_opts, &analytic, &opts).expect("analysis");
    let mpp = find_mpp(&g2, &benchmark_guesses(), &mpp_opts).expect("MPP found");
    let manual = saddlepoint_probability(&g2, &mpp.u_star, &analytic, &opts).expect("pipeline");

    assert_eq!(first, second);
    assert_eq!(first.mpp, mpp);
    assert_eq!(first.report, manual);
    assert_abs_diff_eq!(first.mpp.beta, 1.9640493, epsilon = 1e-4);
    assert_abs_diff_eq!(first.report.p_f(), 0.0122057, epsilon = 1e-6);
}

#[test]
// Purpose
// -------
// A sharply curved surface whose saddlepoint lies outside the scan range
// is a bracket error, not a probability of one half.
//
// Given
// -----
// - G2 with center (3, 3) and semi-axes (0.1, 0.1) at its MPP
//   (3 − 0.1/√2, 3 − 0.1/√2); finite-difference Hessian ≈ diag(800, 800).
// - Default options, so the scan grid hits the trivial root t = 0.
//
// Expect
// ------
// - `NoSignChange { lower: -10, upper: 10 }` in the Saddlepoint stage.
fn trivial_root_only_is_a_bracket_error() {
    let tight = EllipticalG2::new((3.0, 3.0), (0.1, 0.1));
    let offset = 0.1 / 2.0_f64.sqrt();
    let u_star = array![3.0 - offset, 3.0 - offset];

    match saddlepoint_probability(
        &tight,
        &u_star,
        &FiniteDifferenceHessian::default(),
        &SaddlepointOptions::default(),
    ) {
        Err(err @ ReliabilityError::NoSignChange { lower, upper }) => {
            assert_eq!((lower, upper), (-10.0, 10.0));
            assert_eq!(err.stage(), Stage::Saddlepoint);
        }
        other => panic!("Expected NoSignChange, got {other:?}"),
    }
}

#[test]
// Purpose
// -------
// A point whose length differs from the benchmark's dimension is an input
// error at every public entry point instead of an out-of-bounds index.
//
// Given
// -----
// - Reference G2 (two-dimensional) with a 1-D point, a 1-D Monte Carlo
//   run and a 3-D starting guess.
//
// Expect
// ------
// - `DimensionMismatch` in the Input stage from the pipeline, the
//   simulation and the MPP search.
fn wrong_dimension_is_an_input_error_everywhere() {
    let g2 = EllipticalG2::reference();
    let errors = [
        saddlepoint_probability(
            &g2,
            &array![1.0],
            &FiniteDifferenceHessian::default(),
            &SaddlepointOptions::default(),
        )
        .err(),
        monte_carlo_seeded(&g2, 1, 1_000, 42).err(),
        find_mpp(&g2, &[array![0.0, 0.0, 0.0]], &MppOptions::default()).err(),
    ];

    for err in errors {
        match err {
            Some(err @ ReliabilityError::DimensionMismatch { expected: 2, .. }) => {
                assert_eq!(err.stage(), Stage::Input)
            }
            other => panic!("Expected DimensionMismatch, got {other:?}"),
        }
    }
}

#[test]
// Purpose
// -------
// Both curvature modes and both tail variants agree with each other where
// they should, and the default variant keeps diag(4, 1) in range.
//
// Given
// -----
// - Fixed diag(4, 1) Hessian; eigen vs diagonal curvature.
// - Fixed diag(0.5, 2) Hessian with both tail variants.
//
// Expect
// ------
// - Diagonal and eigen modes give the same p_f on a diagonal Hessian.
// - p_f(diag(4, 1)) ∈ [0, 1].
// - Both variants on diag(0.5, 2) land in [0, 1].
fn curvature_modes_and_variants() {
    let g2 = EllipticalG2::reference();
    let u = reference_u_star();
    let fixed = FixedHessian(array![[4.0, 0.0], [0.0, 1.0]]);
    let diagonal =
        saddlepoint_probability(&g2, &u, &fixed, &SaddlepointOptions::default()).expect("diagonal");
    let eigen_opts =
        SaddlepointOptions { curvature_mode: CurvatureMode::Eigen, ..SaddlepointOptions::default() };
    let eigen = saddlepoint_probability(&g2, &u, &fixed, &eigen_opts).expect("eigen");

    assert!((0.0..=1.0).contains(&diagonal.p_f()));
    assert_abs_diff_eq!(diagonal.p_f(), eigen.p_f(), epsilon = 1e-10);

    let mild = FixedHessian(array![[0.5, 0.0], [0.0, 2.0]]);
    for variant in [TailVariant::Magnitude, TailVariant::Curvature] {
        let opts = SaddlepointOptions { tail_variant: variant, ..SaddlepointOptions::default() };
        let report = saddlepoint_probability(&g2, &u, &mild, &opts).expect("pipeline succeeds");
        assert!((0.0..=1.0).contains(&report.p_f()), "{variant:?}: {}", report.p_f());
    }
}

#[test]
// Purpose
// -------
// Errors raised deep inside the pipeline reach the caller with their stage.
//
// Given
// -----
// - A Hessian with a negative diagonal entry.
// - Fixed diag(2, 8) scanned on [1, 10], where K(t) − t has no sign change.
// - A 3-D point against a 2-D Hessian.
//
// Expect
// ------
// - `NegativeCurvature` (Curvature stage), `NoSignChange` (Saddlepoint
//   stage), `HessianDimMismatch` (Differentiation stage).
fn stage_errors_cross_module_boundaries() {
    let g2 = EllipticalG2::reference();
    let u = reference_u_star();

    match saddlepoint_probability(
        &g2,
        &u,
        &FixedHessian(array![[1.0, 0.0], [0.0, -2.0]]),
        &SaddlepointOptions::default(),
    ) {
        Err(err @ ReliabilityError::NegativeCurvature { index: 1, .. }) => {
            assert_eq!(err.stage(), Stage::Curvature)
        }
        other => panic!("Expected NegativeCurvature, got {other:?}"),
    }

    let opts = SaddlepointOptions {
        scan: ScanOptions::new(1.0, 10.0, 0.1).expect("valid scan"),
        ..SaddlepointOptions::default()
    };
    match saddlepoint_probability(&g2, &u, &FixedHessian(array![[2.0, 0.0], [0.0, 8.0]]), &opts) {
        Err(err @ ReliabilityError::NoSignChange { .. }) => {
            assert_eq!(err.stage(), Stage::Saddlepoint)
        }
        other => panic!("Expected NoSignChange, got {other:?}"),
    }

    let three_d: Point = Array1::from(vec![1.0, 1.0, 1.0]);
    let planar = |v: &Point| 3.0 - v.sum();
    match saddlepoint_probability(
        &planar,
        &three_d,
        &FixedHessian(array![[1.0, 0.0], [0.0, 1.0]]),
        &SaddlepointOptions::default(),
    ) {
        Err(err @ ReliabilityError::HessianDimMismatch { .. }) => {
            assert_eq!(err.stage(), Stage::Differentiation)
        }
        other => panic!("Expected HessianDimMismatch, got {other:?}"),
    }
}

#[test]
// Purpose
// -------
// The narrow benchmark is handled end to end and its failure probability
// is much smaller than the reference one.
//
// Given
// -----
// - Narrow G2 from (0, 0); finite-difference Hessian at the found MPP.
//
// Expect
// ------
// - β ≈ 3.98883; p_f ∈ [0, 1] and below the FORM estimate of the reference.
fn narrow_benchmark_end_to_end() {
    let narrow = EllipticalG2::narrow();
    let analysis = analyse(
        &narrow,
        &[array![0.0, 0.0]],
        &MppOptions::default(),
        &FiniteDifferenceHessian::default(),
        &SaddlepointOptions::default(),
    )
    .expect("analysis succeeds");

    assert_abs_diff_eq!(analysis.mpp.beta, 3.9888324, epsilon = 1e-4);
    assert!((0.0..=1.0).contains(&analysis.report.p_f()));
    assert!(analysis.form_pf < form_probability(1.9640493));
}
