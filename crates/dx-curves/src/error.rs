//! Error types for curve construction and evaluation.

use dx_core::DxError;
use thiserror::Error;

/// Errors raised by the curve evaluator.
///
/// Out-of-range inputs are never an error; they are clamped and counted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    #[error("Unknown curve: {name}")]
    UnknownCurve { name: String },

    #[error("Curve '{name}' takes {expected} independent variable(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("Duplicate curve name: {name}")]
    DuplicateName { name: String },

    #[error("Invalid curve '{name}': {what}")]
    Invalid { name: String, what: &'static str },

    #[error("Non-finite input to curve '{name}'")]
    NonFiniteInput { name: String },
}

pub type CurveResult<T> = Result<T, CurveError>;

impl From<CurveError> for DxError {
    fn from(e: CurveError) -> Self {
        DxError::Invariant {
            what: e.to_string(),
        }
    }
}
