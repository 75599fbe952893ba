//! Characteristic tangent lines of a smooth sink-rate curve.
//!
//! Works on any `(f, f')` closure pair, not just [`Quadratic`]: the
//! horizontal tangent is found at the derivative's root, the tangent
//! through the origin at the root of `f(u) − f'(u)·u`. For quadratics
//! the closed forms on [`Quadratic`] are preferred; these solvers are
//! the generic path and the cross-check for them.
//!
//! [`Quadratic`]: crate::Quadratic

use crate::error::RootError;
use crate::roots::find_root;

/// `y = slope·x + intercept`, for sampling over a speed range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TangentLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TangentLine {
    pub fn eval(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    pub fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }
}

/// Tangent with zero slope: touches the curve where `f'` vanishes.
/// Returns the touch abscissa and the (horizontal) line.
pub fn horizontal_tangent_line<F, D>(f: F, df: D, seed: f64) -> Result<(f64, TangentLine), RootError>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let x0 = find_root(&df, seed)?;
    Ok((x0, TangentLine { slope: 0.0, intercept: f(x0) }))
}

/// Tangent through `(0, 0)`: touches the curve where `f(u) = f'(u)·u`.
/// Returns the touch abscissa and the line `y = f'(u)·x`.
pub fn origin_tangent_line<F, D>(f: F, df: D, seed: f64) -> Result<(f64, TangentLine), RootError>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let u = find_root(|x| f(x) - df(x) * x, seed)?;
    Ok((u, TangentLine { slope: df(u), intercept: 0.0 }))
}

const SECANT_ITERS: usize = 100;
const SECANT_TOL: f64 = 1e-10;

/// Intersection of a tangent line with the curve, near `seed`.
///
/// A tangent touches at a double root, so the residual never changes
/// sign and bracketing cannot apply; a secant iteration converges on
/// double roots (linearly) and on transversal crossings (fast).
pub fn intersection<F>(line: TangentLine, f: F, seed: f64) -> Result<(f64, f64), RootError>
where
    F: Fn(f64) -> f64,
{
    let g = |x: f64| line.eval(x) - f(x);
    let mut x0 = seed;
    let mut x1 = seed * 1.05 + 1.0;
    let mut g0 = g(x0);
    for _ in 0..SECANT_ITERS {
        let g1 = g(x1);
        if g1.abs() < SECANT_TOL || (x1 - x0).abs() < SECANT_TOL * x1.abs().max(1.0) {
            return Ok((x1, f(x1)));
        }
        let denom = g1 - g0;
        if denom == 0.0 {
            break;
        }
        let x2 = x1 - g1 * (x1 - x0) / denom;
        x0 = x1;
        g0 = g1;
        x1 = x2;
    }
    Err(RootError::NoConvergence { iterations: SECANT_ITERS })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Quadratic;
    use approx::assert_relative_eq;

    fn sample_polar() -> Quadratic {
        Quadratic::fit(&[90.0, 120.0, 160.0], &[-0.6, -0.65, -1.1]).unwrap()
    }

    #[test]
    fn horizontal_tangent_matches_the_vertex_closed_form() {
        let q = sample_polar();
        let (x0, line) = horizontal_tangent_line(|x| q.eval(x), |x| q.slope(x), 100.0).unwrap();
        let (vx, vy) = q.vertex();
        assert_relative_eq!(x0, vx, epsilon = 1e-6);
        assert_relative_eq!(line.eval(0.0), vy, epsilon = 1e-9);
        assert_relative_eq!(line.eval(200.0), vy, epsilon = 1e-9);
    }

    #[test]
    fn origin_tangent_matches_the_discriminant_closed_form() {
        let q = sample_polar();
        let (u, line) = origin_tangent_line(|x| q.eval(x), |x| q.slope(x), 100.0).unwrap();
        assert_relative_eq!(u, q.origin_tangent_speed().unwrap(), epsilon = 1e-6);
        assert_relative_eq!(line.intercept, 0.0);
        // The line touches the curve at u.
        assert_relative_eq!(line.eval(u), q.eval(u), epsilon = 1e-6);
    }

    #[test]
    fn intersection_recovers_the_touch_point() {
        let q = sample_polar();
        let (u, line) = origin_tangent_line(|x| q.eval(x), |x| q.slope(x), 100.0).unwrap();
        let (ix, iy) = intersection(line, |x| q.eval(x), 100.0).unwrap();
        // Tangency is a double root: accept the looser convergence it allows.
        assert_relative_eq!(ix, u, epsilon = 1e-3);
        assert_relative_eq!(iy, q.eval(u), epsilon = 1e-3);
    }
}
