//! Configuration for the saddlepoint pipeline.
//!
//! - [`SaddlepointOptions`]: finite-difference step, curvature mode, tail
//!   variant, root tolerance and scan settings.
//! - [`ScanOptions`]: range and grid step of the piecewise domain scan.
//!
//! Both types validate their numeric fields in `new` and provide `Default`
//! values that reproduce the reference configuration.
use crate::{
    differentiation::{types::DEFAULT_FD_STEP, validation::verify_step},
    errors::{ReliabilityError, ReliabilityResult},
    saddlepoint::{cgf::CurvatureMode, tail::TailVariant},
};

/// Default lower end of the scan range.
pub const DEFAULT_SCAN_LOWER: f64 = -10.0;
/// Default upper end of the scan range.
pub const DEFAULT_SCAN_UPPER: f64 = 10.0;
/// Default grid step of the scan.
pub const DEFAULT_SCAN_STEP: f64 = 0.1;
/// Default acceptance threshold for `|K(t_s) − t_s|`.
pub const DEFAULT_ROOT_TOL: f64 = 1e-8;

// Absorbs round-off in `(upper − lower)/step` so the last grid point is kept.
const GRID_SLACK: f64 = 1e-9;

/// Range and grid of the piecewise domain scan.
///
/// Fields:
/// - `lower`, `upper`: closed scan range, `lower < upper`, both finite.
/// - `step`: spacing of the global grid `lower + k·step`, finite and
///   positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanOptions {
    pub lower: f64,
    pub upper: f64,
    pub step: f64,
}

impl ScanOptions {
    /// Construct a validated scan configuration.
    ///
    /// # Errors
    /// [`ReliabilityError::InvalidScanRange`] if any value is non-finite,
    /// `lower >= upper` or `step <= 0`.
    pub fn new(lower: f64, upper: f64, step: f64) -> ReliabilityResult<Self> {
        let finite = lower.is_finite() && upper.is_finite() && step.is_finite();
        if !finite || lower >= upper || step <= 0.0 {
            return Err(ReliabilityError::InvalidScanRange { lower, upper, step });
        }
        Ok(Self { lower, upper, step })
    }

    /// Number of grid points `lower + k·step` that fall inside `[lower, upper]`.
    pub fn grid_len(&self) -> usize {
        ((self.upper - self.lower) / self.step + GRID_SLACK).floor() as usize + 1
    }

    /// The `k`-th grid point.
    pub fn grid_point(&self, k: usize) -> f64 {
        (self.lower + k as f64 * self.step).min(self.upper)
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { lower: DEFAULT_SCAN_LOWER, upper: DEFAULT_SCAN_UPPER, step: DEFAULT_SCAN_STEP }
    }
}

/// Pipeline-level configuration.
///
/// Fields:
/// - `fd_step: f64` — step of the finite-difference gradient (and of the
///   default Hessian supplier when the caller builds one from these options).
/// - `curvature_mode: CurvatureMode` — diagonal or eigen curvature terms.
/// - `tail_variant: TailVariant` — definition of `t` in the tail formula.
/// - `root_tol: f64` — residual threshold for accepting a saddlepoint.
/// - `scan: ScanOptions` — domain scan settings.
///
/// Default:
/// - `fd_step = 1e-6`, `Diagonal`, `Magnitude`, `root_tol = 1e-8`,
///   scan `[-10, 10]` with step `0.1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaddlepointOptions {
    pub fd_step: f64,
    pub curvature_mode: CurvatureMode,
    pub tail_variant: TailVariant,
    pub root_tol: f64,
    pub scan: ScanOptions,
}

impl SaddlepointOptions {
    /// Construct validated pipeline options.
    ///
    /// # Errors
    /// - [`ReliabilityError::InvalidStep`] for a bad `fd_step`.
    /// - [`ReliabilityError::InvalidRootTol`] if `root_tol` is not finite and
    ///   positive.
    pub fn new(
        fd_step: f64, curvature_mode: CurvatureMode, tail_variant: TailVariant, root_tol: f64,
        scan: ScanOptions,
    ) -> ReliabilityResult<Self> {
        verify_step(fd_step)?;
        if !root_tol.is_finite() || root_tol <= 0.0 {
            return Err(ReliabilityError::InvalidRootTol { tol: root_tol });
        }
        Ok(Self { fd_step, curvature_mode, tail_variant, root_tol, scan })
    }
}

impl Default for SaddlepointOptions {
    fn default() -> Self {
        Self {
            fd_step: DEFAULT_FD_STEP,
            curvature_mode: CurvatureMode::default(),
            tail_variant: TailVariant::default(),
            root_tol: DEFAULT_ROOT_TOL,
            scan: ScanOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Scan options reject empty, reversed and non-finite ranges.
    //
    // Given
    // -----
    // - (1, 1, 0.1), (2, -2, 0.1), (-1, 1, 0) and (-inf, 1, 0.1).
    //
    // Expect
    // ------
    // - `InvalidScanRange` for each.
    fn scan_options_reject_bad_ranges() {
        for (lo, hi, step) in [(1.0, 1.0, 0.1), (2.0, -2.0, 0.1), (-1.0, 1.0, 0.0), (f64::NEG_INFINITY, 1.0, 0.1)]
        {
            match ScanOptions::new(lo, hi, step) {
                Err(ReliabilityError::InvalidScanRange { .. }) => {}
                other => panic!("Expected InvalidScanRange, got {other:?}"),
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // The default grid covers `[-10, 10]` with 201 points and hits 0
    // exactly.
    //
    // Given
    // -----
    // - `ScanOptions::default()`.
    //
    // Expect
    // ------
    // - `grid_len() == 201`, first point -10, point 100 is exactly 0.
    fn default_grid_layout() {
        let scan = ScanOptions::default();
        assert_eq!(scan.grid_len(), 201);
        assert_eq!(scan.grid_point(0), -10.0);
        assert_eq!(scan.grid_point(100), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Pipeline options validate the step and the root tolerance.
    //
    // Given
    // -----
    // - A zero step, then a negative root tolerance.
    //
    // Expect
    // ------
    // - `InvalidStep`, then `InvalidRootTol`.
    fn pipeline_options_validate_numbers() {
        let scan = ScanOptions::default();
        match SaddlepointOptions::new(0.0, CurvatureMode::Diagonal, TailVariant::Magnitude, 1e-8, scan) {
            Err(ReliabilityError::InvalidStep { .. }) => {}
            other => panic!("Expected InvalidStep, got {other:?}"),
        }
        assert_eq!(
            SaddlepointOptions::new(1e-6, CurvatureMode::Diagonal, TailVariant::Magnitude, -1.0, scan),
            Err(ReliabilityError::InvalidRootTol { tol: -1.0 })
        );
        assert!(
            SaddlepointOptions::new(1e-5, CurvatureMode::Eigen, TailVariant::Curvature, 1e-9, scan)
                .is_ok()
        );
    }
}
