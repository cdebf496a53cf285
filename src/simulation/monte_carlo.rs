//! simulation::monte_carlo — crude Monte Carlo reference estimate.
//!
//! Draw independent standard-normal points, count the failures `G(u) < 0`
//! and report the estimate with its binomial standard error. The random
//! source is always passed in by the caller; nothing here touches a global
//! seed.
use crate::{
    errors::{ReliabilityError, ReliabilityResult},
    limit_state::{LimitState, Point, validate_dimension},
};
use ndarray::Array1;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::StandardNormal;

/// Monte Carlo estimate of `P[G(U) < 0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonteCarloEstimate {
    pub p_f: f64,
    pub failures: usize,
    pub n_samples: usize,
    pub std_error: f64,
}

impl MonteCarloEstimate {
    /// Symmetric normal-approximation interval `p_f ± z · std_error`,
    /// clipped to `[0, 1]`.
    pub fn confidence_interval(&self, z: f64) -> (f64, f64) {
        let half = z * self.std_error;
        ((self.p_f - half).max(0.0), (self.p_f + half).min(1.0))
    }
}

/// monte_carlo — estimate `p_f` from `n_samples` draws of `U ~ N(0, I_dim)`.
///
/// Parameters
/// ----------
/// - `g`: `&dyn LimitState`
///   Limit-state function; a draw fails when `G(u) < 0`. Non-finite values
///   never count as failures.
/// - `dim`: `usize`
///   Dimension of `U`.
/// - `n_samples`: `usize`
///   Number of draws.
/// - `rng`: `&mut R`
///   Random source; identical RNG states give identical estimates.
///
/// Returns
/// -------
/// `ReliabilityResult<MonteCarloEstimate>`
///   `p_f = failures / n_samples` and `std_error = sqrt(p_f (1 − p_f) / n)`.
///
/// Errors
/// ------
/// - [`ReliabilityError::InvalidDimension`] if `dim == 0`.
/// - [`ReliabilityError::InvalidSampleCount`] if `n_samples == 0`.
/// - [`ReliabilityError::DimensionMismatch`] if `g` declares a dimension
///   other than `dim`.
pub fn monte_carlo<R: Rng + ?Sized>(
    g: &dyn LimitState, dim: usize, n_samples: usize, rng: &mut R,
) -> ReliabilityResult<MonteCarloEstimate> {
    if dim == 0 {
        return Err(ReliabilityError::InvalidDimension { dim });
    }
    validate_dimension(g, dim)?;
    if n_samples == 0 {
        return Err(ReliabilityError::InvalidSampleCount { n_samples });
    }

    let mut u: Point = Array1::zeros(dim);
    let mut failures = 0usize;
    for _ in 0..n_samples {
        for x in u.iter_mut() {
            *x = rng.sample(StandardNormal);
        }
        if g.value(&u) < 0.0 {
            failures += 1;
        }
    }

    let n = n_samples as f64;
    let p_f = failures as f64 / n;
    let std_error = (p_f * (1.0 - p_f) / n).sqrt();
    log::debug!("Monte Carlo: {failures}/{n_samples} failures, p_f = {p_f:.6e} ± {std_error:.2e}");
    Ok(MonteCarloEstimate { p_f, failures, n_samples, std_error })
}

/// [`monte_carlo`] with a fresh `StdRng` seeded from `seed`.
pub fn monte_carlo_seeded(
    g: &dyn LimitState, dim: usize, n_samples: usize, seed: u64,
) -> ReliabilityResult<MonteCarloEstimate> {
    let mut rng = StdRng::seed_from_u64(seed);
    monte_carlo(g, dim, n_samples, &mut rng)
}

#[cfg(test)]
mod tests {
    // Scope
    // -----
    // - Configuration errors.
    // - Reproducibility under a fixed seed and independence of the caller's
    //   RNG stream.
    // - Accuracy on a limit state with a closed-form probability.
    use super::*;
    use crate::limit_state::EllipticalG2;
    use approx::assert_abs_diff_eq;

    #[test]
    // Purpose
    // -------
    // Zero samples, zero dimension or a dimension the limit state does not
    // accept are configuration errors.
    //
    // Given
    // -----
    // - `n_samples = 0`, then `dim = 0`, then `dim = 1` for the 2-D G2.
    //
    // Expect
    // ------
    // - `InvalidSampleCount`, `InvalidDimension`, `DimensionMismatch`.
    fn rejects_empty_configuration() {
        let g2 = EllipticalG2::reference();
        assert_eq!(
            monte_carlo_seeded(&g2, 2, 0, 1),
            Err(ReliabilityError::InvalidSampleCount { n_samples: 0 })
        );
        assert_eq!(monte_carlo_seeded(&g2, 0, 10, 1), Err(ReliabilityError::InvalidDimension { dim: 0 }));
        assert_eq!(
            monte_carlo_seeded(&g2, 1, 10, 1),
            Err(ReliabilityError::DimensionMismatch { expected: 2, found: 1 })
        );
    }

    #[test]
    // Purpose
    // -------
    // The same seed gives the same estimate; a shared RNG advances.
    //
    // Given
    // -----
    // - Two seeded runs with seed 7, and two consecutive runs on one RNG.
    //
    // Expect
    // ------
    // - Seeded runs are equal and match a run on an explicitly seeded RNG;
    //   a second run on the same RNG still reports the requested count.
    fn seeded_runs_are_reproducible() {
        let g2 = EllipticalG2::reference();
        let a = monte_carlo_seeded(&g2, 2, 5_000, 7).expect("valid run");
        let b = monte_carlo_seeded(&g2, 2, 5_000, 7).expect("valid run");
        assert_eq!(a, b);

        let mut rng = StdRng::seed_from_u64(7);
        let first = monte_carlo(&g2, 2, 5_000, &mut rng).expect("valid run");
        assert_eq!(first, a);
        let second = monte_carlo(&g2, 2, 5_000, &mut rng).expect("valid run");
        assert_eq!(second.n_samples, 5_000);
    }

    #[test]
    // Purpose
    // -------
    // The estimate matches a closed-form probability.
    //
    // Given
    // -----
    // - G(u) = u0 + 1, so p_f = Φ(−1) ≈ 0.158655; 50 000 draws.
    //
    // Expect
    // ------
    // - |p̂ − 0.158655| < 5 standard errors, and the interval at z = 5
    //   contains the truth.
    fn matches_linear_limit_state() {
        let linear = |u: &Point| u[0] + 1.0;
        let est = monte_carlo_seeded(&linear, 3, 50_000, 2024).expect("valid run");
        assert_abs_diff_eq!(est.p_f, 0.158655, epsilon = 5.0 * est.std_error);
        let (lo, hi) = est.confidence_interval(5.0);
        assert!(lo <= 0.158655 && 0.158655 <= hi);
        assert_eq!(est.failures as f64 / est.n_samples as f64, est.p_f);
    }
}
