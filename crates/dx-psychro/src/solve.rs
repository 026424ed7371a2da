//! Bracketed bisection shared by the iterative property inversions.

use crate::error::{PsychroError, PsychroResult};

const MAX_ITER: usize = 200;

/// Find `x` in `[lo, hi]` with `f(x) = 0` for a monotonic `f`.
///
/// The result is deterministic for identical inputs, which the coil model
/// relies on for repeatable timesteps.
pub fn bisect<F>(f: F, mut lo: f64, mut hi: f64, tol: f64, what: &'static str) -> PsychroResult<f64>
where
    F: Fn(f64) -> f64,
{
    let mut f_lo = f(lo);
    let f_hi = f(hi);
    if !f_lo.is_finite() || !f_hi.is_finite() {
        return Err(PsychroError::NonPhysical { what });
    }
    if f_lo == 0.0 {
        return Ok(lo);
    }
    if f_hi == 0.0 {
        return Ok(hi);
    }
    if f_lo.signum() == f_hi.signum() {
        return Err(PsychroError::OutOfRange { what });
    }

    for _ in 0..MAX_ITER {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if f_mid == 0.0 || (hi - lo) < tol {
            return Ok(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    Err(PsychroError::ConvergenceFailed { what })
}
