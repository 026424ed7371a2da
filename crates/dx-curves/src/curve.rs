//! A named curve: family payload plus valid input and output ranges.

use crate::error::{CurveError, CurveResult};
use crate::kind::CurveKind;
use serde::{Deserialize, Serialize};

/// Closed interval an input or output is limited to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub const UNBOUNDED: Domain = Domain {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp `v` into the interval, reporting whether it moved.
    pub fn clamp(&self, v: f64) -> (f64, bool) {
        if v < self.min {
            (self.min, true)
        } else if v > self.max {
            (self.max, true)
        } else {
            (v, false)
        }
    }
}

/// Empirical performance curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    name: String,
    kind: CurveKind,
    inputs: Vec<Domain>,
    output: Option<Domain>,
}

impl Curve {
    /// Create a curve over its natural domain (unbounded polynomials, table grid for tables).
    ///
    /// Names are compared case-insensitively and stored upper-cased.
    pub fn new(name: impl Into<String>, kind: CurveKind) -> Self {
        let inputs = kind.natural_domain();
        Self {
            name: name.into().to_uppercase(),
            kind,
            inputs,
            output: None,
        }
    }

    /// Limit the first independent variable.
    pub fn with_x_limits(mut self, min: f64, max: f64) -> Self {
        self.inputs[0] = Domain::new(min, max);
        self
    }

    /// Limit the second independent variable. Ignored for one-variable curves.
    pub fn with_y_limits(mut self, min: f64, max: f64) -> Self {
        if let Some(d) = self.inputs.get_mut(1) {
            *d = Domain::new(min, max);
        }
        self
    }

    /// Limit the curve output.
    pub fn with_output_limits(mut self, min: f64, max: f64) -> Self {
        self.output = Some(Domain::new(min, max));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &CurveKind {
        &self.kind
    }

    pub fn arity(&self) -> usize {
        self.kind.arity()
    }

    pub fn input_domains(&self) -> &[Domain] {
        &self.inputs
    }

    pub fn output_domain(&self) -> Option<Domain> {
        self.output
    }

    /// Validate payload and limits.
    pub fn validate(&self) -> CurveResult<()> {
        let invalid = |what| CurveError::Invalid {
            name: self.name.clone(),
            what,
        };
        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        self.kind.check().map_err(invalid)?;
        for d in self.inputs.iter().chain(self.output.iter()) {
            if d.min.is_nan() || d.max.is_nan() || d.min > d.max {
                return Err(invalid("limit minimum must not exceed maximum"));
            }
        }
        Ok(())
    }

    /// Evaluate with clamping. Returns the value and whether any input was clamped.
    pub(crate) fn eval_clamped(&self, inputs: &[f64]) -> CurveResult<(f64, bool)> {
        if inputs.len() != self.arity() {
            return Err(CurveError::ArityMismatch {
                name: self.name.clone(),
                expected: self.arity(),
                got: inputs.len(),
            });
        }
        if inputs.iter().any(|v| !v.is_finite()) {
            return Err(CurveError::NonFiniteInput {
                name: self.name.clone(),
            });
        }

        let mut args = [0.0_f64; 2];
        let mut clamped = false;
        for (slot, (&v, domain)) in args.iter_mut().zip(inputs.iter().zip(&self.inputs)) {
            let (c, moved) = domain.clamp(v);
            *slot = c;
            clamped |= moved;
        }

        let mut value = self.kind.eval_raw(&args[..inputs.len()]);
        if let Some(out) = self.output {
            value = out.clamp(value).0;
        }
        Ok((value, clamped))
    }
}
