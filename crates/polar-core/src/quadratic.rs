//! Degree-2 sink-rate model and its least-squares fit.

use nalgebra::{DMatrix, DVector};

use crate::error::{CurveError, FitError};

/// Leading coefficients below this are treated as degenerate.
const A_EPS: f64 = 1e-12;

/// SVD cutoff for the least-squares solve.
const SVD_EPS: f64 = 1e-12;

/// `f(x) = a·x² + b·x + c`, sink rate as a function of speed.
///
/// Coefficients are read-only after construction; both constructors
/// reject a (near-)zero leading coefficient, so vertex and tangent
/// formulas are always defined on a live value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quadratic {
    a: f64,
    b: f64,
    c: f64,
}

impl Quadratic {
    pub fn new(a: f64, b: f64, c: f64) -> Result<Self, CurveError> {
        if !a.is_finite() || a.abs() < A_EPS {
            return Err(CurveError::ZeroLeadingCoefficient { value: a });
        }
        Ok(Self { a, b, c })
    }

    /// Least-squares quadratic through `(xs[i], ys[i])`.
    ///
    /// Needs at least 3 distinct x values; an exactly-determined fit
    /// (3 points) passes through all of them.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self, FitError> {
        if xs.len() != ys.len() {
            return Err(FitError::MismatchedLengths { xs: xs.len(), ys: ys.len() });
        }
        let distinct = distinct_count(xs);
        if distinct < 3 {
            return Err(FitError::TooFewPoints { got: distinct });
        }

        // Vandermonde columns [x², x, 1], solved by SVD.
        let n = xs.len();
        let vandermonde = DMatrix::from_fn(n, 3, |row, col| match col {
            0 => xs[row] * xs[row],
            1 => xs[row],
            _ => 1.0,
        });
        let rhs = DVector::from_column_slice(ys);
        let coeffs = vandermonde
            .svd(true, true)
            .solve(&rhs, SVD_EPS)
            .map_err(|_| FitError::Singular)?;

        Quadratic::new(coeffs[0], coeffs[1], coeffs[2]).map_err(|_| FitError::Singular)
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn eval(&self, x: f64) -> f64 {
        (self.a * x + self.b) * x + self.c
    }

    pub fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }

    /// First derivative `2a·x + b`.
    pub fn slope(&self, x: f64) -> f64 {
        2.0 * self.a * x + self.b
    }

    /// Vertex `(−b/2a, f(−b/2a))`: the horizontal-tangent point.
    pub fn vertex(&self) -> (f64, f64) {
        let x = -self.b / (2.0 * self.a);
        (x, self.eval(x))
    }

    /// Speed at which the line through the origin is tangent to the
    /// curve: `k = b − √(4ac)`, `x = −(b − k)/(2a)`.
    ///
    /// Errors when `4ac < 0` (tangency point would be complex); that
    /// cannot happen for a realistic polar, where a and c share a sign.
    pub fn origin_tangent_speed(&self) -> Result<f64, CurveError> {
        let disc = 4.0 * self.a * self.c;
        if disc < 0.0 {
            return Err(CurveError::NegativeDiscriminant { value: disc });
        }
        let k = self.b - disc.sqrt();
        Ok(-(self.b - k) / (2.0 * self.a))
    }
}

fn distinct_count(xs: &[f64]) -> usize {
    let mut sorted: Vec<f64> = xs.to_vec();
    sorted.sort_by(|p, q| p.partial_cmp(q).unwrap_or(std::cmp::Ordering::Equal));
    let mut count = 0;
    let mut last = f64::NAN;
    for &x in &sorted {
        if x != last {
            count += 1;
            last = x;
        }
    }
    count
}
