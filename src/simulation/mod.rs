//! simulation — Monte Carlo oracle for the probability of failure.
//!
//! Provides an independent reference estimate against which the FORM and
//! saddlepoint approximations are checked. Sampling is driven by an
//! explicit `rand` RNG passed by the caller, or by a seed.
pub mod monte_carlo;

pub use self::monte_carlo::{MonteCarloEstimate, monte_carlo, monte_carlo_seeded};
