//! errors — unified error surface for the reliability pipeline.
//!
//! Purpose
//! -------
//! Provide a single error enum and result alias shared by differentiation,
//! the saddlepoint engine, the MPP search and the Monte Carlo oracle, so
//! that every fatal condition reaches callers as a typed value tagged with
//! the pipeline stage that produced it.
//!
//! Key behaviors
//! -------------
//! - Define [`ReliabilityError`] and [`ReliabilityResult`] as the canonical
//!   error and result types for the crate.
//! - Map each variant to a [`Stage`] via [`ReliabilityError::stage`] so
//!   reports can name the failing step as well as the cause.
//! - Convert backend `argmin` errors into crate errors, unwrapping any
//!   [`ReliabilityError`] that was boxed into an argmin error inside a cost
//!   function.
//! - When `python-bindings` is enabled, convert errors into `ValueError`.
//!
//! Conventions
//! -----------
//! - Library code never panics on invalid input; it returns one of these
//!   variants instead.
//! - The near-singular tail case (`w ≈ 0`) is not an error; it is handled
//!   inside the tail formula and flagged on the returned statistics.

use argmin::core::{ArgminError, Error};

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Crate-wide result alias.
pub type ReliabilityResult<T> = Result<T, ReliabilityError>;

/// Pipeline stage in which an error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Input,
    Differentiation,
    Curvature,
    Saddlepoint,
    TailProbability,
    MppSearch,
    Simulation,
    Backend,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Input => "input",
            Stage::Differentiation => "differentiation",
            Stage::Curvature => "curvature transform",
            Stage::Saddlepoint => "saddlepoint solver",
            Stage::TailProbability => "tail probability",
            Stage::MppSearch => "MPP search",
            Stage::Simulation => "Monte Carlo",
            Stage::Backend => "optimizer backend",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReliabilityError {
    // ---- Input ----
    /// Evaluation point has no coordinates.
    EmptyPoint,

    /// Evaluation point coordinates must be finite.
    InvalidPoint {
        index: usize,
        value: f64,
    },

    /// Point dimension does not match the expected dimension.
    DimensionMismatch {
        expected: usize,
        found: usize,
    },

    // ---- Differentiation ----
    /// Finite-difference step must be finite and positive.
    InvalidStep {
        eps: f64,
        reason: &'static str,
    },

    /// Gradient dimensions do not match the point dimension.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient elements need to be finite.
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Hessian matrix dimensions do not match the point dimension.
    HessianDimMismatch {
        expected: usize,
        found: (usize, usize),
    },

    /// Hessian values need to be finite.
    InvalidHessian {
        row: usize,
        col: usize,
        value: f64,
    },

    // ---- Curvature ----
    /// Curvature term is negative, so its square root is not real.
    NegativeCurvature {
        index: usize,
        value: f64,
    },

    // ---- Saddlepoint ----
    /// Scan range must be finite, ordered and use a positive step.
    InvalidScanRange {
        lower: f64,
        upper: f64,
        step: f64,
    },

    /// Root tolerance needs to be positive and finite.
    InvalidRootTol {
        tol: f64,
    },

    /// No bracket with a sign change exists for `K(t) - t`.
    NoSignChange {
        lower: f64,
        upper: f64,
    },

    /// Root finder stopped at a point that does not solve the equation.
    RootNotConverged {
        root: f64,
        residual: f64,
    },

    // ---- Tail probability ----
    /// The corrected tail probability fell outside `[0, 1]`.
    ProbabilityOutOfRange {
        value: f64,
    },

    // ---- MPP search ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// lbfgs_mem needs to be at least 1.
    InvalidLBFGSMem {
        mem: usize,
        reason: &'static str,
    },
    /// Invalid line searcher name.
    InvalidLineSearch {
        name: String,
        reason: &'static str,
    },
    /// Penalty schedule must be positive, finite and non-decreasing.
    InvalidPenalty {
        value: f64,
        reason: &'static str,
    },
    /// Constraint tolerance needs to be positive and finite.
    InvalidConstraintTol {
        tol: f64,
    },
    /// MPP search needs at least one starting point.
    NoInitialGuesses,
    /// Cost function returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },
    /// No starting point produced a point on the limit-state surface.
    MppNotConverged {
        residual: f64,
        reason: String,
    },

    // ---- Options parsing ----
    /// Unknown option name for a string-selectable setting.
    InvalidOption {
        name: String,
        reason: &'static str,
    },

    // ---- Monte Carlo ----
    /// Sample count must be positive.
    InvalidSampleCount {
        n_samples: usize,
    },
    /// Input dimension must be positive.
    InvalidDimension {
        dim: usize,
    },

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl ReliabilityError {
    /// Pipeline stage that raised this error.
    pub fn stage(&self) -> Stage {
        match self {
            ReliabilityError::EmptyPoint
            | ReliabilityError::InvalidPoint { .. }
            | ReliabilityError::DimensionMismatch { .. }
            | ReliabilityError::InvalidOption { .. } => Stage::Input,

            ReliabilityError::InvalidStep { .. }
            | ReliabilityError::GradientDimMismatch { .. }
            | ReliabilityError::InvalidGradient { .. }
            | ReliabilityError::HessianDimMismatch { .. }
            | ReliabilityError::InvalidHessian { .. } => Stage::Differentiation,

            ReliabilityError::NegativeCurvature { .. } => Stage::Curvature,

            ReliabilityError::InvalidScanRange { .. }
            | ReliabilityError::InvalidRootTol { .. }
            | ReliabilityError::NoSignChange { .. }
            | ReliabilityError::RootNotConverged { .. } => Stage::Saddlepoint,

            ReliabilityError::ProbabilityOutOfRange { .. } => Stage::TailProbability,

            ReliabilityError::InvalidTolGrad { .. }
            | ReliabilityError::InvalidTolCost { .. }
            | ReliabilityError::InvalidMaxIter { .. }
            | ReliabilityError::InvalidLBFGSMem { .. }
            | ReliabilityError::InvalidLineSearch { .. }
            | ReliabilityError::InvalidPenalty { .. }
            | ReliabilityError::InvalidConstraintTol { .. }
            | ReliabilityError::NoInitialGuesses
            | ReliabilityError::NonFiniteCost { .. }
            | ReliabilityError::MppNotConverged { .. } => Stage::MppSearch,

            ReliabilityError::InvalidSampleCount { .. }
            | ReliabilityError::InvalidDimension { .. } => Stage::Simulation,

            ReliabilityError::InvalidParameter { .. }
            | ReliabilityError::NotImplemented { .. }
            | ReliabilityError::NotInitialized { .. }
            | ReliabilityError::ConditionViolated { .. }
            | ReliabilityError::CheckPointNotFound { .. }
            | ReliabilityError::PotentialBug { .. }
            | ReliabilityError::ImpossibleError { .. }
            | ReliabilityError::BackendError { .. }
            | ReliabilityError::UnknownError => Stage::Backend,
        }
    }
}

impl std::error::Error for ReliabilityError {}

impl std::fmt::Display for ReliabilityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input ----
            ReliabilityError::EmptyPoint => {
                write!(f, "Evaluation point must have at least one coordinate")
            }
            ReliabilityError::InvalidPoint { index, value } => {
                write!(f, "Invalid point coordinate at index {index}: {value}, must be finite")
            }
            ReliabilityError::DimensionMismatch { expected, found } => {
                write!(f, "Dimension mismatch: expected {expected}, found {found}")
            }

            // ---- Differentiation ----
            ReliabilityError::InvalidStep { eps, reason } => {
                write!(f, "Invalid finite-difference step {eps}: {reason}")
            }
            ReliabilityError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            ReliabilityError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }
            ReliabilityError::HessianDimMismatch { expected, found } => {
                write!(
                    f,
                    "Hessian dimension mismatch: expected ({expected}, {expected}), found {found:?}"
                )
            }
            ReliabilityError::InvalidHessian { row, col, value } => {
                write!(f, "Invalid Hessian at ({row}, {col}): {value}, must be finite")
            }

            // ---- Curvature ----
            ReliabilityError::NegativeCurvature { index, value } => {
                write!(
                    f,
                    "Negative curvature term at index {index}: {value}, the limit state is not \
                     convex at this point"
                )
            }

            // ---- Saddlepoint ----
            ReliabilityError::InvalidScanRange { lower, upper, step } => {
                write!(
                    f,
                    "Invalid saddlepoint scan range [{lower}, {upper}] with step {step}: bounds \
                     must be finite and ordered, step positive"
                )
            }
            ReliabilityError::InvalidRootTol { tol } => {
                write!(f, "Invalid root tolerance {tol}: must be finite and > 0")
            }
            ReliabilityError::NoSignChange { lower, upper } => {
                write!(f, "No sign change of K(t) - t found in [{lower}, {upper}]")
            }
            ReliabilityError::RootNotConverged { root, residual } => {
                write!(f, "Root finder stopped at t = {root} with residual {residual}")
            }

            // ---- Tail probability ----
            ReliabilityError::ProbabilityOutOfRange { value } => {
                write!(f, "Tail approximation broke down: p_f = {value} is outside [0, 1]")
            }

            // ---- MPP search ----
            ReliabilityError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            ReliabilityError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost function change tolerance {tol}: {reason}")
            }
            ReliabilityError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            ReliabilityError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }
            ReliabilityError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            ReliabilityError::InvalidPenalty { value, reason } => {
                write!(f, "Invalid penalty setting {value}: {reason}")
            }
            ReliabilityError::InvalidConstraintTol { tol } => {
                write!(f, "Invalid constraint tolerance {tol}: must be finite and > 0")
            }
            ReliabilityError::NoInitialGuesses => {
                write!(f, "No initial guesses provided for the MPP search")
            }
            ReliabilityError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }
            ReliabilityError::MppNotConverged { residual, reason } => {
                write!(f, "MPP search did not converge (|G(u)| = {residual}): {reason}")
            }

            // ---- Options parsing ----
            ReliabilityError::InvalidOption { name, reason } => {
                write!(f, "Invalid option '{name}': {reason}")
            }

            // ---- Monte Carlo ----
            ReliabilityError::InvalidSampleCount { n_samples } => {
                write!(f, "Invalid sample count {n_samples}: must be greater than zero")
            }
            ReliabilityError::InvalidDimension { dim } => {
                write!(f, "Invalid input dimension {dim}: must be greater than zero")
            }

            // ---- Argmin ----
            ReliabilityError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            ReliabilityError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            ReliabilityError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            ReliabilityError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            ReliabilityError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            ReliabilityError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            ReliabilityError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            ReliabilityError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            ReliabilityError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for ReliabilityError {
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<ReliabilityError>() {
            Ok(err) => return err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => {
                    ReliabilityError::InvalidParameter { text }
                }
                ArgminError::NotImplemented { text } => ReliabilityError::NotImplemented { text },
                ArgminError::NotInitialized { text } => ReliabilityError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => {
                    ReliabilityError::ConditionViolated { text }
                }
                ArgminError::CheckpointNotFound { text } => {
                    ReliabilityError::CheckPointNotFound { text }
                }
                ArgminError::PotentialBug { text } => ReliabilityError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => ReliabilityError::ImpossibleError { text },
                _ => ReliabilityError::UnknownError,
            },
            Err(err) => ReliabilityError::BackendError { text: err.to_string() },
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ReliabilityError> for PyErr {
    fn from(err: ReliabilityError) -> PyErr {
        PyValueError::new_err(format!("{} failed: {err}", err.stage()))
    }
}
