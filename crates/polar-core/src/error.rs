use thiserror::Error;

/// Least-squares fitting failures.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("need at least 3 distinct x values to fit a quadratic, got {got}")]
    TooFewPoints { got: usize },
    #[error("mismatched sample lengths: {xs} x values vs {ys} y values")]
    MismatchedLengths { xs: usize, ys: usize },
    #[error("least-squares system is singular or fitted a zero leading coefficient")]
    Singular,
}

/// A quadratic whose vertex/tangent formulas are undefined.
#[derive(Debug, Error)]
pub enum CurveError {
    #[error("zero leading coefficient {value}: vertex and tangent formulas are undefined")]
    ZeroLeadingCoefficient { value: f64 },
    #[error("negative discriminant {value}: no real tangent through the origin")]
    NegativeDiscriminant { value: f64 },
}

/// Iterative root-finding failures.
#[derive(Debug, Error)]
pub enum RootError {
    #[error("no sign change found around {seed} (last bracket [{lo}, {hi}])")]
    NoBracket { seed: f64, lo: f64, hi: f64 },
    #[error("root search did not converge after {iterations} iterations")]
    NoConvergence { iterations: usize },
}
