//! saddlepoint::domain — piecewise scan for sign changes of `K(t) − t`.
//!
//! Purpose
//! -------
//! Locate brackets for the saddlepoint equation without ever straddling a
//! pole of the CGF. The scan range is split at the poles into open
//! [`DomainSegment`]s on which the active term set is constant and `K` is
//! continuous; each segment is sampled on the global grid and every strict
//! sign change between neighbouring samples becomes a [`Bracket`].
//!
//! Key behaviors
//! -------------
//! - Segment ends that coincide with a pole are replaced by points nudged a
//!   relative [`POLE_NUDGE`] inside the segment; scan-range ends are
//!   sampled as-is.
//! - Samples where `K` is not finite are skipped.
//! - A sample where `K(t) − t` is exactly zero yields a degenerate bracket
//!   `[t, t]`.
//!
//! Invariants & assumptions
//! ------------------------
//! - No returned bracket contains a pole in its interior.
//! - Brackets are ordered by their lower end.
use crate::saddlepoint::{cgf::Cgf, options::ScanOptions};

/// Relative distance from a pole at which segment ends are sampled.
pub const POLE_NUDGE: f64 = 1e-9;

/// Open interval between consecutive breakpoints of the scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainSegment {
    pub lower: f64,
    pub upper: f64,
    pub lower_is_pole: bool,
    pub upper_is_pole: bool,
}

impl DomainSegment {
    pub fn contains(&self, t: f64) -> bool {
        self.lower < t && t < self.upper
    }

    fn inner_lower(&self) -> f64 {
        if self.lower_is_pole { self.lower + self.nudge(self.lower) } else { self.lower }
    }

    fn inner_upper(&self) -> f64 {
        if self.upper_is_pole { self.upper - self.nudge(self.upper) } else { self.upper }
    }

    fn nudge(&self, at: f64) -> f64 {
        (POLE_NUDGE * at.abs().max(1.0)).min(0.25 * (self.upper - self.lower))
    }
}

/// Interval `[lower, upper]` on which `K(t) − t` changes sign (or vanishes
/// at a degenerate `lower == upper`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub lower: f64,
    pub upper: f64,
}

impl Bracket {
    pub fn is_degenerate(&self) -> bool {
        self.lower == self.upper
    }
}

/// Saddlepoint equation `g(t) = K(t) − t`.
pub fn saddlepoint_equation(cgf: &Cgf, t: f64) -> f64 {
    cgf.value(t) - t
}

/// Split the scan range at the poles of `cgf`.
pub fn domain_segments(cgf: &Cgf, scan: &ScanOptions) -> Vec<DomainSegment> {
    let mut breaks: Vec<(f64, bool)> = vec![(scan.lower, false)];
    breaks.extend(
        cgf.poles().into_iter().filter(|&p| scan.lower < p && p < scan.upper).map(|p| (p, true)),
    );
    breaks.push((scan.upper, false));

    breaks
        .windows(2)
        .map(|w| DomainSegment {
            lower: w[0].0,
            upper: w[1].0,
            lower_is_pole: w[0].1,
            upper_is_pole: w[1].1,
        })
        .collect()
}

/// scan_brackets — sign-change brackets of `K(t) − t` over the scan range.
///
/// Parameters
/// ----------
/// - `cgf`: `&Cgf`
///   Cumulant generating function to scan.
/// - `scan`: `&ScanOptions`
///   Range and grid step.
///
/// Returns
/// -------
/// `Vec<Bracket>`
///   Every bracket found, segment by segment from left to right. Empty when
///   no segment shows a sign change.
pub fn scan_brackets(cgf: &Cgf, scan: &ScanOptions) -> Vec<Bracket> {
    let mut brackets = Vec::new();
    for segment in domain_segments(cgf, scan) {
        let samples: Vec<(f64, f64)> = segment_samples(&segment, scan)
            .into_iter()
            .map(|t| (t, saddlepoint_equation(cgf, t)))
            .filter(|(_, g)| g.is_finite())
            .collect();

        for (i, &(t, g)) in samples.iter().enumerate() {
            if g == 0.0 {
                brackets.push(Bracket { lower: t, upper: t });
            }
            if let Some(&(t_next, g_next)) = samples.get(i + 1) {
                if g != 0.0 && g_next != 0.0 && (g < 0.0) != (g_next < 0.0) {
                    brackets.push(Bracket { lower: t, upper: t_next });
                }
            }
        }
    }
    brackets
}

// Sorted sample abscissae for one segment: both (possibly nudged) ends plus
// the global grid points strictly inside.
fn segment_samples(segment: &DomainSegment, scan: &ScanOptions) -> Vec<f64> {
    let lo = segment.inner_lower();
    let hi = segment.inner_upper();
    let mut samples = vec![lo];
    samples.extend((0..scan.grid_len()).map(|k| scan.grid_point(k)).filter(|&t| lo < t && t < hi));
    if hi > lo {
        samples.push(hi);
    }
    samples
}
