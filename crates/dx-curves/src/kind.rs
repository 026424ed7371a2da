//! Curve families and their raw (unclamped) evaluation.

use crate::curve::Domain;
use interp::{InterpMode, interp};
use serde::{Deserialize, Serialize};

/// Curve family with its coefficient or table payload.
///
/// One-variable forms are in `x`; two-variable forms are in `x` and `y`.
/// Coefficients are listed in the order the formula comment gives them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CurveKind {
    /// c1 + c2·x
    Linear { c: [f64; 2] },
    /// c1 + c2·x + c3·x²
    Quadratic { c: [f64; 3] },
    /// c1 + c2·x + c3·x² + c4·x³
    Cubic { c: [f64; 4] },
    /// c1 + c2·x + c3·x² + c4·x³ + c5·x⁴
    Quartic { c: [f64; 5] },
    /// c1 + c2·x^c3
    Exponent { c: [f64; 3] },
    /// c1 + c2·x + c3·x² + c4·y + c5·y² + c6·x·y
    Biquadratic { c: [f64; 6] },
    /// Biquadratic terms + c7·x³ + c8·y³ + c9·x²·y + c10·x·y²
    Bicubic { c: [f64; 10] },
    /// (c1 + c2·x + c3·x²) + (c4 + c5·x + c6·x²)·y
    QuadraticLinear { c: [f64; 6] },
    /// (c1 + c2·x + c3·x² + c4·x³) + (c5 + c6·x)·y
    CubicLinear { c: [f64; 6] },
    /// Piecewise-linear lookup over strictly increasing `x`.
    Table1D { x: Vec<f64>, values: Vec<f64> },
    /// Bilinear lookup; `values[i * y.len() + j]` is the value at (`x[i]`, `y[j]`).
    Table2D {
        x: Vec<f64>,
        y: Vec<f64>,
        values: Vec<f64>,
    },
}

impl CurveKind {
    /// Number of independent variables.
    pub fn arity(&self) -> usize {
        match self {
            CurveKind::Linear { .. }
            | CurveKind::Quadratic { .. }
            | CurveKind::Cubic { .. }
            | CurveKind::Quartic { .. }
            | CurveKind::Exponent { .. }
            | CurveKind::Table1D { .. } => 1,
            CurveKind::Biquadratic { .. }
            | CurveKind::Bicubic { .. }
            | CurveKind::QuadraticLinear { .. }
            | CurveKind::CubicLinear { .. }
            | CurveKind::Table2D { .. } => 2,
        }
    }

    /// Short family name for reports.
    pub fn family(&self) -> &'static str {
        match self {
            CurveKind::Linear { .. } => "Linear",
            CurveKind::Quadratic { .. } => "Quadratic",
            CurveKind::Cubic { .. } => "Cubic",
            CurveKind::Quartic { .. } => "Quartic",
            CurveKind::Exponent { .. } => "Exponent",
            CurveKind::Biquadratic { .. } => "Biquadratic",
            CurveKind::Bicubic { .. } => "Bicubic",
            CurveKind::QuadraticLinear { .. } => "QuadraticLinear",
            CurveKind::CubicLinear { .. } => "CubicLinear",
            CurveKind::Table1D { .. } => "Table1D",
            CurveKind::Table2D { .. } => "Table2D",
        }
    }

    /// Natural domain of the independent variables.
    ///
    /// Tables are bounded by their grid; polynomials are unbounded.
    pub fn natural_domain(&self) -> Vec<Domain> {
        match self {
            CurveKind::Table1D { x, .. } => vec![grid_bounds(x)],
            CurveKind::Table2D { x, y, .. } => vec![grid_bounds(x), grid_bounds(y)],
            other => vec![Domain::UNBOUNDED; other.arity()],
        }
    }

    /// Check payload shape. Returns a description of the first problem found.
    pub(crate) fn check(&self) -> Result<(), &'static str> {
        let coefficients: &[f64] = match self {
            CurveKind::Linear { c } => c,
            CurveKind::Quadratic { c } => c,
            CurveKind::Cubic { c } => c,
            CurveKind::Quartic { c } => c,
            CurveKind::Exponent { c } => c,
            CurveKind::Biquadratic { c } => c,
            CurveKind::Bicubic { c } => c,
            CurveKind::QuadraticLinear { c } => c,
            CurveKind::CubicLinear { c } => c,
            CurveKind::Table1D { x, values } => {
                check_grid(x)?;
                if values.len() != x.len() {
                    return Err("table value count must match x grid");
                }
                values
            }
            CurveKind::Table2D { x, y, values } => {
                check_grid(x)?;
                check_grid(y)?;
                if values.len() != x.len() * y.len() {
                    return Err("table value count must equal x.len() * y.len()");
                }
                values
            }
        };
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err("coefficients and table values must be finite");
        }
        Ok(())
    }

    /// Evaluate without any domain handling. `v` must hold `arity()` values.
    pub(crate) fn eval_raw(&self, v: &[f64]) -> f64 {
        let x = v[0];
        match self {
            CurveKind::Linear { c } => c[0] + c[1] * x,
            CurveKind::Quadratic { c } => c[0] + x * (c[1] + x * c[2]),
            CurveKind::Cubic { c } => c[0] + x * (c[1] + x * (c[2] + x * c[3])),
            CurveKind::Quartic { c } => c[0] + x * (c[1] + x * (c[2] + x * (c[3] + x * c[4]))),
            CurveKind::Exponent { c } => c[0] + c[1] * x.powf(c[2]),
            CurveKind::Biquadratic { c } => {
                let y = v[1];
                c[0] + c[1] * x + c[2] * x * x + c[3] * y + c[4] * y * y + c[5] * x * y
            }
            CurveKind::Bicubic { c } => {
                let y = v[1];
                c[0] + c[1] * x
                    + c[2] * x * x
                    + c[3] * y
                    + c[4] * y * y
                    + c[5] * x * y
                    + c[6] * x * x * x
                    + c[7] * y * y * y
                    + c[8] * x * x * y
                    + c[9] * x * y * y
            }
            CurveKind::QuadraticLinear { c } => {
                let y = v[1];
                (c[0] + c[1] * x + c[2] * x * x) + (c[3] + c[4] * x + c[5] * x * x) * y
            }
            CurveKind::CubicLinear { c } => {
                let y = v[1];
                (c[0] + c[1] * x + c[2] * x * x + c[3] * x * x * x) + (c[4] + c[5] * x) * y
            }
            CurveKind::Table1D { x: grid, values } => table_lookup(grid, values, x),
            CurveKind::Table2D { x: gx, y: gy, values } => {
                let y = v[1];
                let along_y: Vec<f64> = values
                    .chunks_exact(gy.len().max(1))
                    .map(|row| table_lookup(gy, row, y))
                    .collect();
                table_lookup(gx, &along_y, x)
            }
        }
    }
}

fn grid_bounds(grid: &[f64]) -> Domain {
    match (grid.first(), grid.last()) {
        (Some(&lo), Some(&hi)) => Domain::new(lo, hi),
        _ => Domain::UNBOUNDED,
    }
}

fn check_grid(grid: &[f64]) -> Result<(), &'static str> {
    if grid.is_empty() {
        return Err("table grid must not be empty");
    }
    if grid.iter().any(|g| !g.is_finite()) {
        return Err("table grid must be finite");
    }
    if grid.windows(2).any(|w| w[1] <= w[0]) {
        return Err("table grid must be strictly increasing");
    }
    Ok(())
}

/// Linear lookup on a strictly increasing grid, held flat past either end.
fn table_lookup(grid: &[f64], values: &[f64], x: f64) -> f64 {
    match (grid.first(), grid.last()) {
        (Some(&lo), Some(&hi)) if grid.len() > 1 => interp(grid, values, x.clamp(lo, hi), &InterpMode::default()),
        _ => values.first().copied().unwrap_or(f64::NAN),
    }
}
