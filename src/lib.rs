//! rust_reliability — saddlepoint SORM probability-of-failure engine.
//!
//! Purpose
//! -------
//! Estimate the probability of failure `p_f = P[G(U) < 0]` of a limit state
//! `G` in standard-normal space. The engine characterises the curvature of
//! `G` at the most probable point (MPP) `U*`, builds the cumulant generating
//! function of the resulting quadratic form, solves the saddlepoint equation
//! and applies a Lugannani–Rice type tail correction. An augmented-Lagrangian
//! MPP search and a crude Monte Carlo oracle complete the pipeline.
//!
//! Key behaviors
//! -------------
//! - [`differentiation`]: finite-difference gradient and Hessian of a limit
//!   state, plus pluggable [`differentiation::HessianSupplier`]s (finite
//!   difference, fixed matrix, closed form).
//! - [`saddlepoint`]: CGF construction, piecewise domain scan, Brent root
//!   solve and tail probability; [`saddlepoint::saddlepoint_probability`] and
//!   [`saddlepoint::analyse`] are the high-level entry points.
//! - [`mpp`]: multi-start MPP search with L-BFGS inner solves.
//! - [`simulation`]: Monte Carlo reference estimate with an explicit RNG.
//! - [`limit_state`]: the [`limit_state::LimitState`] seam and the
//!   elliptical benchmark surfaces.
//! - With `python-bindings`, define the `_rust_reliability` extension module
//!   and its `sorm` submodule.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work happens in the inner modules; the PyO3 items below
//!   only convert inputs, call into Rust and map errors.
//! - No global state: every call owns its inputs and RNG, so identical inputs
//!   give identical outputs.
//!
//! Conventions
//! -----------
//! - Failure is `G(u) < 0`; points live in standard-normal space.
//! - Errors are [`errors::ReliabilityError`] values tagged with the pipeline
//!   stage; at the PyO3 boundary they become `ValueError`.
//!
//! Downstream usage
//! ----------------
//! - Rust callers use the inner modules directly and can ignore the
//!   `python-bindings` feature.
//! - The `sorm` binary prints a full report for the benchmark surfaces.
//! - Python code imports `_rust_reliability.sorm` and passes a callable
//!   `f(u: np.ndarray) -> float` as the limit state.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; `tests/` holds the end-to-end
//!   pipeline checks against the Monte Carlo oracle.

pub mod differentiation;
pub mod errors;
pub mod limit_state;
pub mod mpp;
pub mod saddlepoint;
pub mod simulation;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{PyArray1, PyArray2, ToPyArray};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use rand::{SeedableRng, rngs::StdRng};

#[cfg(feature = "python-bindings")]
use crate::{
    differentiation::{FiniteDifferenceHessian, FixedHessian, HessianSupplier},
    errors::ReliabilityResult,
    mpp::form_probability,
    saddlepoint::{SaddlepointReport, saddlepoint_probability},
    simulation::monte_carlo,
    utils::{
        PyLimitState, extract_f64_matrix, extract_guesses, extract_mpp_opts, extract_point,
        extract_saddlepoint_opts,
    },
};

/// SaddlepointResult — Python-facing view of a [`SaddlepointReport`].
///
/// Purpose
/// -------
/// Hold the outcome of [`saddlepoint_pf`] and expose the probability and
/// every intermediate quantity as read-only Python properties.
///
/// Fields
/// ------
/// - `inner`: [`SaddlepointReport`]
///   Full Rust-side report.
///
/// Notes
/// -----
/// - Instances are created only by `saddlepoint_pf`; there is no Python
///   constructor.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_reliability.sorm")]
pub struct SaddlepointResult {
    inner: SaddlepointReport,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl SaddlepointResult {
    /// Probability of failure.
    #[getter]
    pub fn p_f(&self) -> f64 {
        self.inner.p_f()
    }

    /// Selected saddlepoint root.
    #[getter]
    pub fn t_s(&self) -> f64 {
        self.inner.saddlepoint.t_s
    }

    /// K'(t_s) - 1, the slope of the saddlepoint equation at the root.
    #[getter]
    pub fn slope(&self) -> f64 {
        self.inner.saddlepoint.slope
    }

    #[getter]
    pub fn w(&self) -> f64 {
        self.inner.tail.w
    }

    #[getter]
    pub fn t(&self) -> f64 {
        self.inner.tail.t
    }

    /// K(t_s).
    #[getter]
    pub fn k_ts(&self) -> f64 {
        self.inner.tail.k_ts
    }

    /// K''(t_s).
    #[getter]
    pub fn k2_ts(&self) -> f64 {
        self.inner.tail.k2_ts
    }

    /// True when `w` was too close to zero for the correction term and
    /// `p_f = Phi(w)` was used instead.
    #[getter]
    pub fn singular(&self) -> bool {
        self.inner.tail.singular
    }

    #[getter]
    pub fn u_star<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.u_star.to_pyarray(py)
    }

    #[getter]
    pub fn gradient<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.gradient.to_pyarray(py)
    }

    #[getter]
    pub fn hessian<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        self.inner.hessian.to_pyarray(py)
    }

    #[getter]
    pub fn curvature<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.curvature.to_pyarray(py)
    }

    /// All accepted roots of the saddlepoint equation, in scan order.
    #[getter]
    pub fn candidates(&self) -> Vec<f64> {
        self.inner.saddlepoint.candidates.clone()
    }

    fn __repr__(&self) -> String {
        format!(
            "SaddlepointResult(p_f={:.6e}, t_s={:.6}, w={:.6}, t={:.6})",
            self.inner.p_f(),
            self.inner.saddlepoint.t_s,
            self.inner.tail.w,
            self.inner.tail.t
        )
    }
}

/// saddlepoint_pf — run the saddlepoint pipeline on a Python limit state.
///
/// Parameters
/// ----------
/// - `limit_state`: callable `f(u: np.ndarray) -> float`.
/// - `u_star`: 1-D array-like, the MPP.
/// - `hessian`: optional 2-D array-like; when absent the Hessian is taken by
///   finite differences with step `eps`.
/// - `eps`, `curvature`, `variant`, `root_tol`, `scan`: see
///   [`crate::saddlepoint::SaddlepointOptions`].
///
/// Errors
/// ------
/// - The first exception raised by `limit_state`, if any.
/// - `ValueError` carrying the failing stage otherwise.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (
        limit_state,
        u_star,
        hessian = None,
        eps = None,
        curvature = None,
        variant = None,
        root_tol = None,
        scan = None,
    ),
    text_signature = "(limit_state, u_star, /, hessian=None, eps=1e-6, curvature='diagonal', \
                      variant='magnitude', root_tol=1e-8, scan=(-10.0, 10.0, 0.1))"
)]
pub fn saddlepoint_pf<'py>(
    py: Python<'py>, limit_state: &Bound<'py, PyAny>, u_star: &Bound<'py, PyAny>,
    hessian: Option<&Bound<'py, PyAny>>, eps: Option<f64>, curvature: Option<&str>,
    variant: Option<&str>, root_tol: Option<f64>, scan: Option<(f64, f64, f64)>,
) -> PyResult<SaddlepointResult> {
    let g = PyLimitState::new(py, limit_state)?;
    let u = extract_point(py, u_star, "u_star")?;
    let opts = extract_saddlepoint_opts(eps, curvature, variant, root_tol, scan)?;

    let supplier: Box<dyn HessianSupplier> = match hessian {
        Some(raw) => Box::new(FixedHessian(extract_f64_matrix(raw, "hessian")?)),
        None => Box::new(FiniteDifferenceHessian::new(opts.fd_step)?),
    };

    let result = saddlepoint_probability(&g, &u, supplier.as_ref(), &opts);
    let inner = raise_callback_error(&g, result)?;
    Ok(SaddlepointResult { inner })
}

/// monte_carlo_pf — crude Monte Carlo estimate of `p_f`.
///
/// Returns `(p_f, std_error, failures)`. With `seed=None` the generator is
/// seeded from system entropy.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (limit_state, dim, n_samples = 100_000, seed = None),
    text_signature = "(limit_state, dim, /, n_samples=100000, seed=None)"
)]
pub fn monte_carlo_pf<'py>(
    py: Python<'py>, limit_state: &Bound<'py, PyAny>, dim: usize, n_samples: usize,
    seed: Option<u64>,
) -> PyResult<(f64, f64, usize)> {
    let g = PyLimitState::new(py, limit_state)?;
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let result = monte_carlo(&g, dim, n_samples, &mut rng);
    let estimate = raise_callback_error(&g, result)?;
    Ok((estimate.p_f, estimate.std_error, estimate.failures))
}

/// find_mpp — most probable point of a Python limit state.
///
/// Returns `(u_star, beta, form_pf)` where `form_pf = Phi(-beta)`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "find_mpp",
    signature = (
        limit_state,
        initial_guesses,
        tol_grad = None,
        tol_cost = None,
        max_iter = None,
        line_searcher = None,
        lbfgs_mem = None,
        constraint_tol = None,
        max_outer = None,
    ),
    text_signature = "(limit_state, initial_guesses, /, tol_grad=1e-8, tol_cost=1e-14, \
                      max_iter=500, line_searcher='MoreThuente', lbfgs_mem=7, \
                      constraint_tol=1e-6, max_outer=50)"
)]
pub fn py_find_mpp<'py>(
    py: Python<'py>, limit_state: &Bound<'py, PyAny>, initial_guesses: &Bound<'py, PyAny>,
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>, constraint_tol: Option<f64>,
    max_outer: Option<usize>,
) -> PyResult<(Bound<'py, PyArray1<f64>>, f64, f64)> {
    let g = PyLimitState::new(py, limit_state)?;
    let guesses = extract_guesses(py, initial_guesses)?;
    let opts = extract_mpp_opts(
        tol_grad,
        tol_cost,
        max_iter,
        line_searcher,
        lbfgs_mem,
        constraint_tol,
        max_outer,
    )?;
    let result = crate::mpp::find_mpp(&g, &guesses, &opts);
    let outcome = raise_callback_error(&g, result)?;
    Ok((outcome.u_star.to_pyarray(py), outcome.beta, form_probability(outcome.beta)))
}

// A Python exception inside the callable takes precedence over the crate
// error it caused downstream.
#[cfg(feature = "python-bindings")]
fn raise_callback_error<T>(g: &PyLimitState<'_>, result: ReliabilityResult<T>) -> PyResult<T> {
    if let Some(err) = g.take_error() {
        return Err(err);
    }
    Ok(result?)
}

/// _rust_reliability — PyO3 module initializer for the Python extension.
///
/// Purpose
/// -------
/// Define the `_rust_reliability` Python module and register the `sorm`
/// submodule used by the public `rust_reliability` package.
///
/// Key behaviors
/// -------------
/// - Create the `sorm` submodule and attach it to `_rust_reliability`.
/// - Register it in `sys.modules` as `rust_reliability.sorm` so dotted
///   imports work.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating the submodule or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_reliability<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let sorm_mod = PyModule::new(_py, "sorm")?;
    sorm(_py, m, &sorm_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("rust_reliability.sorm", sorm_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn sorm<'py>(
    _py: Python, rust_reliability: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<SaddlepointResult>()?;
    m.add_function(wrap_pyfunction!(saddlepoint_pf, m)?)?;
    m.add_function(wrap_pyfunction!(monte_carlo_pf, m)?)?;
    m.add_function(wrap_pyfunction!(py_find_mpp, m)?)?;
    rust_reliability.add_submodule(m)?;
    Ok(())
}
