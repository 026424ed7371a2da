//! Error types for coil construction and simulation.

use crate::speed::CurveRole;
use dx_core::DxError;
use dx_curves::CurveError;
use dx_psychro::PsychroError;
use thiserror::Error;

/// Errors raised while building coil records or simulating a timestep.
///
/// Structural variants (records, curves, schedules) are fatal to the coil
/// instance. Input variants reject a single timestep and leave the runtime
/// state untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoilError {
    #[error("Invalid load: {what} (value={value})")]
    InvalidLoad { what: &'static str, value: f64 },

    #[error("Invalid supply air mass flow: {value} kg/s")]
    InvalidMassFlow { value: f64 },

    #[error("Non-physical input: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invalid record '{name}': {what}")]
    InvalidRecord { name: String, what: &'static str },

    #[error("Speed '{speed}': {role} curve '{curve}' takes {got} variable(s), expected {expected}")]
    ArityMismatch {
        speed: String,
        role: CurveRole,
        curve: String,
        expected: usize,
        got: usize,
    },

    #[error("Mode '{mode}': speed '{speed}' has lower capacity than the speed before it")]
    NonMonotonicSpeeds { mode: String, speed: String },

    #[error("Duplicate name '{name}' in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Unknown schedule: {name}")]
    UnknownSchedule { name: String },

    #[error("Unknown coil: {name}")]
    UnknownCoil { name: String },

    #[error("Curve error: {0}")]
    Curve(#[from] CurveError),

    #[error("Psychrometric error: {0}")]
    Psychro(#[from] PsychroError),
}

pub type CoilResult<T> = Result<T, CoilError>;

impl From<CoilError> for DxError {
    fn from(e: CoilError) -> Self {
        match e {
            CoilError::InvalidArg { what } => DxError::InvalidArg { what },
            CoilError::InvalidLoad { what, .. } => DxError::InvalidArg { what },
            other => DxError::Invariant {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CoilError::InvalidLoad {
            what: "requested sensible load must be non-negative",
            value: -5.0,
        };
        assert!(err.to_string().contains("-5"));
    }

    #[test]
    fn curve_error_wraps() {
        let err: CoilError = CurveError::UnknownCurve { name: "CAPFT".into() }.into();
        assert!(matches!(err, CoilError::Curve(_)));
        assert!(err.to_string().contains("CAPFT"));
    }

    #[test]
    fn error_conversion() {
        let err: DxError = CoilError::InvalidArg { what: "timestep" }.into();
        assert!(matches!(err, DxError::InvalidArg { .. }));
    }
}
