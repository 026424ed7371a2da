//! Psychrometric errors.

use dx_core::DxError;
use thiserror::Error;

/// Result type for psychrometric operations.
pub type PsychroResult<T> = Result<T, PsychroError>;

/// Errors that can occur during psychrometric calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PsychroError {
    /// Non-physical values (negative humidity ratio, non-positive pressure, ...).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Value outside the range the correlations cover.
    #[error("Value out of range for {what}")]
    OutOfRange { what: &'static str },

    /// Bisection did not bracket or did not converge.
    #[error("Convergence failed for {what}")]
    ConvergenceFailed { what: &'static str },
}

impl From<PsychroError> for DxError {
    fn from(err: PsychroError) -> Self {
        match err {
            PsychroError::NonPhysical { what } => DxError::Invariant {
                what: format!("Non-physical air property: {what}"),
            },
            PsychroError::OutOfRange { what } => DxError::InvalidArg { what },
            PsychroError::ConvergenceFailed { what } => DxError::Invariant {
                what: format!("Psychrometric convergence failed: {what}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PsychroError::NonPhysical {
            what: "humidity ratio",
        };
        assert!(err.to_string().contains("humidity ratio"));
    }

    #[test]
    fn error_to_dx_error() {
        let err: DxError = PsychroError::OutOfRange { what: "enthalpy" }.into();
        assert!(matches!(err, DxError::InvalidArg { .. }));
    }
}
