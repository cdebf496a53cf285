//! mpp::types — numeric aliases and solver type shorthands for the MPP search.
//!
//! The augmented-Lagrangian inner problem is solved by `argmin`'s L-BFGS
//! over `ndarray` vectors; these aliases pin the parameter, gradient and
//! cost types once so builders, the adapter and the runner agree.
use crate::limit_state::Point;
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;

/// Gradient of the inner objective, same length as the point.
pub type Grad = Array1<f64>;

/// Scalar inner objective value.
pub type Cost = f64;

/// Default L-BFGS history length.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Point, Grad, Cost>;

pub type MoreThuenteLS = MoreThuenteLineSearch<Point, Grad, Cost>;

pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Point, Grad, Cost>;

pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Point, Grad, Cost>;
