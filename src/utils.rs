//! utils — conversion helpers between Python objects and crate types.
//!
//! Everything here is compiled only with the `python-bindings` feature and is
//! used by the PyO3 wrappers in `lib.rs`.
#[cfg(feature = "python-bindings")]
use std::cell::RefCell;

#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    limit_state::{LimitState, Point},
    mpp::{LineSearcher, MppOptions, PenaltySchedule, Tolerances},
    saddlepoint::{CurvatureMode, SaddlepointOptions, ScanOptions, TailVariant},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
    PyReadonlyArray2,
    ToPyArray,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Copy a 1-D array-like into a [`Point`].
#[cfg(feature = "python-bindings")]
pub fn extract_point<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Point> {
    let arr = extract_f64_array(py, raw)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err(format!("{name} must be a 1-D contiguous float64 array or sequence"))
    })?;
    Ok(Array1::from(slice.to_vec()))
}

/// Copy a 2-D array-like (ndarray or nested sequence) into an owned matrix.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(raw: &Bound<'py, PyAny>, name: &str) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    let rows: Vec<Vec<f64>> = raw.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(format!(
            "{name} must be a 2-D numpy.ndarray or a sequence of float64 sequences"
        ))
    })?;
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != n_cols) {
        return Err(PyValueError::new_err(format!("{name} rows must all have the same length")));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| PyValueError::new_err(format!("{name}: {e}")))
}

/// Initial guesses for the MPP search: a 2-D array (one guess per row) or a
/// sequence of 1-D array-likes.
#[cfg(feature = "python-bindings")]
pub fn extract_guesses<'py>(py: Python<'py>, raw: &Bound<'py, PyAny>) -> PyResult<Vec<Point>> {
    if let Ok(arr_ro) = raw.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().rows().into_iter().map(|r| r.to_owned()).collect());
    }
    let items: Vec<Bound<'py, PyAny>> = raw.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "initial_guesses must be a 2-D numpy.ndarray or a sequence of 1-D array-likes",
        )
    })?;
    items.iter().map(|item| extract_point(py, item, "initial guess")).collect()
}

/// PyLimitState — a Python callable `f(u: np.ndarray) -> float` seen as a
/// [`LimitState`].
///
/// [`LimitState::value`] cannot fail, so a Python exception (or a return
/// value that is not a float) is stored in `error` and reported to the
/// pipeline as `NaN`. Wrappers call [`PyLimitState::take_error`] after the
/// computation and re-raise the first captured exception.
#[cfg(feature = "python-bindings")]
pub struct PyLimitState<'py> {
    py: Python<'py>,
    func: Bound<'py, PyAny>,
    error: RefCell<Option<PyErr>>,
}

#[cfg(feature = "python-bindings")]
impl<'py> PyLimitState<'py> {
    pub fn new(py: Python<'py>, func: &Bound<'py, PyAny>) -> PyResult<Self> {
        if !func.is_callable() {
            return Err(pyo3::exceptions::PyTypeError::new_err("limit_state must be callable"));
        }
        Ok(Self { py, func: func.clone(), error: RefCell::new(None) })
    }

    /// First exception raised by the callable, if any.
    pub fn take_error(&self) -> Option<PyErr> {
        self.error.borrow_mut().take()
    }

    fn call(&self, u: &Point) -> PyResult<f64> {
        let arr = u.to_pyarray(self.py);
        self.func.call1((arr,))?.extract::<f64>()
    }
}

#[cfg(feature = "python-bindings")]
impl LimitState for PyLimitState<'_> {
    fn value(&self, u: &Point) -> f64 {
        match self.call(u) {
            Ok(v) => v,
            Err(e) => {
                let mut slot = self.error.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                f64::NAN
            }
        }
    }
}

/// Build [`SaddlepointOptions`] from optional Python keyword arguments.
#[cfg(feature = "python-bindings")]
pub fn extract_saddlepoint_opts(
    eps: Option<f64>, curvature: Option<&str>, variant: Option<&str>, root_tol: Option<f64>,
    scan: Option<(f64, f64, f64)>,
) -> PyResult<SaddlepointOptions> {
    let defaults = SaddlepointOptions::default();
    let curvature_mode = match curvature {
        Some(s) => s.parse::<CurvatureMode>()?,
        None => defaults.curvature_mode,
    };
    let tail_variant = match variant {
        Some(s) => s.parse::<TailVariant>()?,
        None => defaults.tail_variant,
    };
    let scan = match scan {
        Some((lower, upper, step)) => ScanOptions::new(lower, upper, step)?,
        None => defaults.scan,
    };
    let opts = SaddlepointOptions::new(
        eps.unwrap_or(defaults.fd_step),
        curvature_mode,
        tail_variant,
        root_tol.unwrap_or(defaults.root_tol),
        scan,
    )?;
    Ok(opts)
}

/// Build [`MppOptions`] from optional Python keyword arguments.
#[cfg(feature = "python-bindings")]
pub fn extract_mpp_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>, constraint_tol: Option<f64>,
    max_outer: Option<usize>,
) -> PyResult<MppOptions> {
    let defaults = MppOptions::default();
    let tols = Tolerances::new(
        tol_grad.unwrap_or(defaults.tols.tol_grad),
        tol_cost.unwrap_or(defaults.tols.tol_cost),
        max_iter.unwrap_or(defaults.tols.max_iter),
    )?;
    let line_searcher = match line_searcher {
        Some(s) => s.parse::<LineSearcher>()?,
        None => defaults.line_searcher,
    };
    let opts = MppOptions::new(
        tols,
        line_searcher,
        lbfgs_mem,
        PenaltySchedule::default(),
        constraint_tol.unwrap_or(defaults.constraint_tol),
        max_outer.unwrap_or(defaults.max_outer),
        false,
    )?;
    Ok(opts)
}
