//! saddlepoint::tail — Lugannani–Rice style tail probability.
//!
//! Purpose
//! -------
//! Convert a saddlepoint `t_s` and the CGF values `K(t_s)`, `K″(t_s)` into
//! the probability of failure
//! `p_f = Φ(w) + φ(w)/w · (1/w − 1/t)`, with `w = sign(t_s)·sqrt(2|K(t_s)|)`.
//!
//! Key behaviors
//! -------------
//! - The sign of `w` always follows `t_s`; the radicand always uses
//!   `|K(t_s)|`.
//! - `t` is selected by [`TailVariant`].
//! - For `|w| ≤ SINGULARITY_TOL` the correction is dropped and
//!   `p_f = Φ(w)`; the statistics are flagged `singular`.
//!
//! Conventions
//! -----------
//! - This module does not range-check `p_f`; the pipeline entry point
//!   rejects values outside `[0, 1]` with
//!   [`ReliabilityError::ProbabilityOutOfRange`].
use crate::{errors::ReliabilityError, saddlepoint::cgf::Cgf};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};
use std::str::FromStr;

/// Threshold on `|w|` below which the correction term is skipped.
pub const SINGULARITY_TOL: f64 = 1e-10;

/// Definition of the `t` statistic in the correction term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TailVariant {
    /// `t = t_s · sqrt(|K(t_s)|)`.
    #[default]
    Magnitude,
    /// `t = t_s · sqrt(K″(t_s))`.
    Curvature,
}

impl FromStr for TailVariant {
    type Err = ReliabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "magnitude" => Ok(TailVariant::Magnitude),
            "curvature" => Ok(TailVariant::Curvature),
            _ => Err(ReliabilityError::InvalidOption {
                name: "tail_variant".to_string(),
                reason: "Tail variant must be 'magnitude' or 'curvature'.",
            }),
        }
    }
}

/// Quantities entering the tail formula, kept for reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TailStatistics {
    pub w: f64,
    pub t: f64,
    pub k_ts: f64,
    pub k2_ts: f64,
    pub p_f: f64,
    pub singular: bool,
}

/// tail_probability — evaluate the corrected tail probability at `t_s`.
///
/// Parameters
/// ----------
/// - `cgf`: `&Cgf`
///   CGF whose saddlepoint is `t_s`.
/// - `t_s`: `f64`
///   Root of `K(t) − t = 0`.
/// - `variant`: [`TailVariant`]
///   Definition of `t`.
///
/// Returns
/// -------
/// `TailStatistics`
///   `w`, `t`, `K(t_s)`, `K″(t_s)`, the raw `p_f` and the singular flag.
///
/// Notes
/// -----
/// - When `t == 0` while `|w|` is above the threshold the correction is
///   non-finite; the resulting `p_f` is left as computed and rejected by the
///   pipeline range check.
pub fn tail_probability(cgf: &Cgf, t_s: f64, variant: TailVariant) -> TailStatistics {
    let k_ts = cgf.value(t_s);
    let k2_ts = cgf.second_derivative(t_s);
    let w = signed_root(t_s, k_ts);
    let t = match variant {
        TailVariant::Magnitude => t_s * k_ts.abs().sqrt(),
        TailVariant::Curvature => t_s * k2_ts.sqrt(),
    };
    let singular = w.abs() <= SINGULARITY_TOL;
    let p_f = if singular { standard_normal().cdf(w) } else { lugannani_rice(w, t) };
    TailStatistics { w, t, k_ts, k2_ts, p_f, singular }
}

/// `Φ(w) + φ(w)/w · (1/w − 1/t)`.
pub fn lugannani_rice(w: f64, t: f64) -> f64 {
    let normal = standard_normal();
    normal.cdf(w) + normal.pdf(w) / w * (1.0 / w - 1.0 / t)
}

fn signed_root(t_s: f64, k_ts: f64) -> f64 {
    let magnitude = (2.0 * k_ts.abs()).sqrt();
    if t_s < 0.0 { -magnitude } else { magnitude }
}

fn standard_normal() -> Normal {
    Normal::standard()
}
