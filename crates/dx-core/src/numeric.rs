use crate::DxError;

/// Floating point type used throughout the workspace.
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, DxError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(DxError::NonFinite { what, value: v })
    }
}

/// Linear interpolation between `a` and `b` with weight `w` on `b`.
///
/// Written as a weighted sum so both endpoints are reproduced exactly.
#[inline]
pub fn lerp(a: Real, b: Real, w: Real) -> Real {
    a * (1.0 - w) + b * w
}
