//! Validation helpers for the MPP search.
//!
//! - **Tolerance checks**: [`verify_tol_grad`], [`verify_tol_cost`] and
//!   [`verify_constraint_tol`] ensure tolerances are finite and strictly
//!   positive.
//! - **Penalty schedule**: [`verify_penalty`] checks the initial penalty,
//!   its growth factor and its cap.
//! - **Starting points**: [`validate_guesses`] requires at least one finite,
//!   non-empty guess and a common dimension.
use crate::{
    errors::{ReliabilityError, ReliabilityResult},
    limit_state::{Point, validate_point},
};

pub fn verify_tol_grad(tol: f64) -> ReliabilityResult<()> {
    if !tol.is_finite() {
        return Err(ReliabilityError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(ReliabilityError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

pub fn verify_tol_cost(tol: f64) -> ReliabilityResult<()> {
    if !tol.is_finite() {
        return Err(ReliabilityError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(ReliabilityError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

pub fn verify_constraint_tol(tol: f64) -> ReliabilityResult<()> {
    if !tol.is_finite() || tol <= 0.0 {
        return Err(ReliabilityError::InvalidConstraintTol { tol });
    }
    Ok(())
}

/// Validate an augmented-Lagrangian penalty schedule.
///
/// # Errors
/// [`ReliabilityError::InvalidPenalty`] if `initial` is not finite and
/// positive, `growth` is not finite or below 1, or `max` is below `initial`.
pub fn verify_penalty(initial: f64, growth: f64, max: f64) -> ReliabilityResult<()> {
    if !initial.is_finite() || initial <= 0.0 {
        return Err(ReliabilityError::InvalidPenalty {
            value: initial,
            reason: "Initial penalty must be finite and positive.",
        });
    }
    if !growth.is_finite() || growth < 1.0 {
        return Err(ReliabilityError::InvalidPenalty {
            value: growth,
            reason: "Penalty growth must be finite and at least 1.",
        });
    }
    if !max.is_finite() || max < initial {
        return Err(ReliabilityError::InvalidPenalty {
            value: max,
            reason: "Penalty cap must be finite and not below the initial penalty.",
        });
    }
    Ok(())
}

/// Validate the starting points and return their common dimension.
///
/// # Errors
/// - [`ReliabilityError::NoInitialGuesses`] for an empty slice.
/// - [`ReliabilityError::EmptyPoint`] / [`ReliabilityError::InvalidPoint`]
///   from [`validate_point`].
/// - [`ReliabilityError::DimensionMismatch`] if guesses differ in length.
pub fn validate_guesses(guesses: &[Point]) -> ReliabilityResult<usize> {
    let first = guesses.first().ok_or(ReliabilityError::NoInitialGuesses)?;
    let dim = first.len();
    for guess in guesses {
        validate_point(guess)?;
        if guess.len() != dim {
            return Err(ReliabilityError::DimensionMismatch { expected: dim, found: guess.len() });
        }
    }
    Ok(dim)
}
