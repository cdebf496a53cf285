//! Benchmark limit states with closed-form derivatives.
//!
//! `EllipticalG2` is the elliptical safe-region benchmark used to validate
//! the saddlepoint engine against Monte Carlo:
//!
//! `G2(U) = (U0 − a)² / sx² + (U1 − b)² / sy² − 1`
//!
//! Failure (`G2 < 0`) is the interior of the ellipse centred at `(a, b)`.
use ndarray::Array2;

use crate::limit_state::{LimitState, Point};

/// Elliptical two-dimensional limit state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipticalG2 {
    pub center: (f64, f64),
    pub semi_axes: (f64, f64),
}

impl EllipticalG2 {
    pub fn new(center: (f64, f64), semi_axes: (f64, f64)) -> Self {
        Self { center, semi_axes }
    }

    /// `(U0 − 3)²/2² + (U1 − 2)²/1² − 1`.
    pub fn reference() -> Self {
        Self::new((3.0, 2.0), (2.0, 1.0))
    }

    /// `(U1 − 3)²/0.3² + (U2 − 3)²/0.2² − 1`, a small ellipse far in the tail.
    pub fn narrow() -> Self {
        Self::new((3.0, 3.0), (0.3, 0.2))
    }

    /// Closed-form Hessian `diag(2/sx², 2/sy²)`; constant in `u`.
    pub fn analytic_hessian(&self, _u: &Point) -> Array2<f64> {
        let (sx, sy) = self.semi_axes;
        let mut h = Array2::zeros((2, 2));
        h[[0, 0]] = 2.0 / (sx * sx);
        h[[1, 1]] = 2.0 / (sy * sy);
        h
    }
}

impl LimitState for EllipticalG2 {
    /// `NaN` for points that are not two-dimensional.
    fn value(&self, u: &Point) -> f64 {
        if u.len() != 2 {
            return f64::NAN;
        }
        let (a, b) = self.center;
        let (sx, sy) = self.semi_axes;
        (u[0] - a).powi(2) / (sx * sx) + (u[1] - b).powi(2) / (sy * sy) - 1.0
    }

    fn dim(&self) -> Option<usize> {
        Some(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The reference benchmark matches its defining formula at the point used
    // in the reference scripts.
    //
    // Given
    // -----
    // - `U = (1.27, 1.59)`.
    //
    // Expect
    // ------
    // - `G2 = 1.73²/4 + 0.41² − 1`.
    fn reference_g2_matches_formula() {
        let g = EllipticalG2::reference();
        let expected = 1.73_f64.powi(2) / 4.0 + 0.41_f64.powi(2) - 1.0;
        assert_abs_diff_eq!(g.value(&array![1.27, 1.59]), expected, epsilon = 1e-14);
    }

    #[test]
    // Purpose
    // -------
    // Analytic Hessians equal `diag(2/sx², 2/sy²)`.
    //
    // Given
    // -----
    // - The reference and narrow benchmarks.
    //
    // Expect
    // ------
    // - `diag(0.5, 2)` and `diag(22.2…, 50)` with zero off-diagonals.
    fn analytic_hessian_is_diagonal() {
        let u = array![0.0, 0.0];
        let h = EllipticalG2::reference().analytic_hessian(&u);
        assert_eq!(h, array![[0.5, 0.0], [0.0, 2.0]]);

        let h = EllipticalG2::narrow().analytic_hessian(&u);
        assert_abs_diff_eq!(h[[0, 0]], 2.0 / 0.09, epsilon = 1e-12);
        assert_abs_diff_eq!(h[[1, 1]], 50.0, epsilon = 1e-12);
        assert_eq!(h[[0, 1]], 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Points of the wrong length never index out of bounds.
    //
    // Given
    // -----
    // - One- and three-dimensional points.
    //
    // Expect
    // ------
    // - `dim() == Some(2)` and `value` is `NaN` for both points.
    fn wrong_length_point_is_nan() {
        let g = EllipticalG2::reference();
        assert_eq!(g.dim(), Some(2));
        assert!(g.value(&array![1.0]).is_nan());
        assert!(g.value(&array![1.0, 2.0, 3.0]).is_nan());
    }
}
