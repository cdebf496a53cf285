//! saddlepoint::cgf — curvature terms and the cumulant generating function.
//!
//! Purpose
//! -------
//! Turn the Hessian at the MPP into the curvature vector `r` and expose the
//! cumulant generating function of the shifted quadratic form
//! `Σ_i r_i² (Z_i + …)²` as a small value type, [`Cgf`], together with its
//! first and second derivatives and the location of its poles.
//!
//! Key behaviors
//! -------------
//! - [`curvature_terms`] extracts `h_i` from the Hessian either from the
//!   diagonal ([`CurvatureMode::Diagonal`]) or from the eigenvalues of the
//!   symmetric matrix ([`CurvatureMode::Eigen`]).
//! - [`Cgf::value`] evaluates
//!   `K(t) = Σ_i [ r_i² t / (1 − 2 r_i² t) − ½ ln(1 − 2 r_i² t) ]`,
//!   [`Cgf::second_derivative`] evaluates `K″(t) = Σ_i 2 r_i² / (1 − 2 r_i² t)²`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every stored `r_i²` is finite and non-negative.
//! - A term contributes at `t` only when `1 − 2 r_i² t > 0`; other terms are
//!   dropped without error. `K` is therefore piecewise continuous with a
//!   jump at each pole `t = 1/(2 r_i²)`.
//! - `K(0) = 0` for every valid curvature vector.
use crate::{
    differentiation::types::Hessian,
    errors::{ReliabilityError, ReliabilityResult},
};
use nalgebra::DMatrix;
use ndarray::Array1;
use std::str::FromStr;

/// Eigenvalues of magnitude at most this are treated as exact zeros in
/// [`CurvatureMode::Eigen`], so round-off on singular Hessians does not
/// surface as negative curvature.
pub const EIGEN_EPS: f64 = 1e-10;

/// How curvature terms are read off the Hessian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurvatureMode {
    /// Diagonal entries only; off-diagonal curvature is ignored.
    #[default]
    Diagonal,
    /// Eigenvalues of the symmetric Hessian.
    Eigen,
}

impl FromStr for CurvatureMode {
    type Err = ReliabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "diagonal" | "diag" => Ok(CurvatureMode::Diagonal),
            "eigen" | "eig" => Ok(CurvatureMode::Eigen),
            _ => Err(ReliabilityError::InvalidOption {
                name: "curvature_mode".to_string(),
                reason: "Curvature mode must be 'diagonal' or 'eigen'.",
            }),
        }
    }
}

/// curvature_terms — curvature terms `h_i` of a validated Hessian.
///
/// Parameters
/// ----------
/// - `hessian`: `&Hessian`
///   Square, finite matrix (see
///   [`validate_hessian`](crate::differentiation::validation::validate_hessian)).
/// - `mode`: [`CurvatureMode`]
///   Diagonal entries or eigenvalues.
///
/// Returns
/// -------
/// `ReliabilityResult<Array1<f64>>`
///   One non-negative term per dimension.
///
/// Errors
/// ------
/// - [`ReliabilityError::InvalidHessian`] if a diagonal entry (or an
///   eigenvalue, reported at `(k, k)`) is not finite.
/// - [`ReliabilityError::NegativeCurvature`] if any term is negative.
///
/// Notes
/// -----
/// - In eigen mode the matrix is symmetrized before decomposition and
///   eigenvalues within [`EIGEN_EPS`] of zero are clamped to `0.0`.
pub fn curvature_terms(hessian: &Hessian, mode: CurvatureMode) -> ReliabilityResult<Array1<f64>> {
    let terms = match mode {
        CurvatureMode::Diagonal => hessian.diag().to_owned(),
        CurvatureMode::Eigen => eigen_terms(hessian),
    };
    for (index, &value) in terms.iter().enumerate() {
        if !value.is_finite() {
            return Err(ReliabilityError::InvalidHessian { row: index, col: index, value });
        }
        if value < 0.0 {
            return Err(ReliabilityError::NegativeCurvature { index, value });
        }
    }
    Ok(terms)
}

fn eigen_terms(hessian: &Hessian) -> Array1<f64> {
    let n = hessian.nrows();
    let mut mat = DMatrix::<f64>::zeros(n, n);
    for j in 0..n {
        for i in j..n {
            if i == j {
                mat[(i, i)] = hessian[[i, i]];
            } else {
                let avg = 0.5 * (hessian[[i, j]] + hessian[[j, i]]);
                mat[(i, j)] = avg;
                mat[(j, i)] = avg;
            }
        }
    }
    if mat.iter().any(|v| !v.is_finite()) {
        return Array1::from_elem(n, f64::NAN);
    }
    let eigen = mat.symmetric_eigen();
    eigen.eigenvalues.iter().map(|&l| if l.abs() <= EIGEN_EPS { 0.0 } else { l }).collect()
}

/// Cumulant generating function of the curvature-weighted quadratic form.
#[derive(Debug, Clone, PartialEq)]
pub struct Cgf {
    r_sq: Array1<f64>,
}

impl Cgf {
    /// Build the CGF from curvature terms `h_i = r_i²`.
    ///
    /// # Errors
    /// - [`ReliabilityError::EmptyPoint`] if `terms` is empty.
    /// - [`ReliabilityError::InvalidHessian`] / [`ReliabilityError::NegativeCurvature`]
    ///   on a non-finite or negative term.
    pub fn from_terms(terms: &[f64]) -> ReliabilityResult<Self> {
        if terms.is_empty() {
            return Err(ReliabilityError::EmptyPoint);
        }
        for (index, &value) in terms.iter().enumerate() {
            if !value.is_finite() {
                return Err(ReliabilityError::InvalidHessian { row: index, col: index, value });
            }
            if value < 0.0 {
                return Err(ReliabilityError::NegativeCurvature { index, value });
            }
        }
        Ok(Self { r_sq: Array1::from(terms.to_vec()) })
    }

    /// Build the CGF straight from a Hessian via [`curvature_terms`].
    pub fn from_hessian(hessian: &Hessian, mode: CurvatureMode) -> ReliabilityResult<Self> {
        let terms = curvature_terms(hessian, mode)?;
        Self::from_terms(&terms.to_vec())
    }

    /// Curvature vector `r_i = sqrt(h_i)`.
    pub fn curvature(&self) -> Array1<f64> {
        self.r_sq.mapv(f64::sqrt)
    }

    /// Whether term `i` participates at `t`.
    pub fn is_active(&self, i: usize, t: f64) -> bool {
        1.0 - 2.0 * self.r_sq[i] * t > 0.0
    }

    /// `K(t)` over the active terms.
    pub fn value(&self, t: f64) -> f64 {
        self.active(t).map(|(r2, a)| r2 * t / a - 0.5 * a.ln()).sum()
    }

    /// `K′(t)` over the active terms.
    pub fn first_derivative(&self, t: f64) -> f64 {
        self.active(t).map(|(r2, a)| r2 / (a * a) + r2 / a).sum()
    }

    /// `K″(t)` over the active terms.
    pub fn second_derivative(&self, t: f64) -> f64 {
        self.active(t).map(|(r2, a)| 2.0 * r2 / (a * a)).sum()
    }

    /// Sorted, de-duplicated poles `1/(2 r_i²)` of the positive terms.
    pub fn poles(&self) -> Vec<f64> {
        let mut poles: Vec<f64> =
            self.r_sq.iter().filter(|&&r2| r2 > 0.0).map(|&r2| 1.0 / (2.0 * r2)).collect();
        poles.sort_by(|a, b| a.total_cmp(b));
        poles.dedup();
        poles
    }

    // (r_i², 1 − 2 r_i² t) for every active term.
    fn active(&self, t: f64) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.r_sq.iter().map(move |&r2| (r2, 1.0 - 2.0 * r2 * t)).filter(|&(_, a)| a > 0.0)
    }
}
