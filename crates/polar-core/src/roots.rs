//! Bracketing root finder shared by the tangent solvers.

use crate::error::RootError;

const WIDEN_TRIES: usize = 10;
const BISECT_ITERS: usize = 80;
const F_TOL: f64 = 1e-12;

/// Finds a root of `f` near `seed` by sign-change bracketing and
/// bisection. The initial bracket spans half the seed's magnitude and
/// is doubled around the seed until the signs differ.
///
/// The seed selects among multiple roots: the bracket grows outward
/// from it, so the returned root is the one closest in reach. Callers
/// seed near the expected order of magnitude (e.g. 100 km/h).
pub fn find_root<F: Fn(f64) -> f64>(f: F, seed: f64) -> Result<f64, RootError> {
    let mut span = seed.abs().max(1.0) * 0.5;
    let mut lo = seed - span;
    let mut hi = seed + span;
    let mut f_lo = f(lo);
    let mut f_hi = f(hi);

    let mut tries = 0;
    while f_lo.signum() == f_hi.signum() && tries < WIDEN_TRIES {
        span *= 2.0;
        lo = seed - span;
        hi = seed + span;
        f_lo = f(lo);
        f_hi = f(hi);
        tries += 1;
    }
    if f_lo.signum() == f_hi.signum() {
        return Err(RootError::NoBracket { seed, lo, hi });
    }

    for _ in 0..BISECT_ITERS {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if f_mid.abs() < F_TOL || (hi - lo).abs() < F_TOL * mid.abs().max(1.0) {
            return Ok(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    Ok(0.5 * (lo + hi))
}
