//! Error types for puzzle generation and session control.
//!
//! [`TrainerError`] unifies the failures of this crate: configuration
//! rejected before any computation, session methods called in the wrong
//! stage, math failures bubbling up from the primitives, and internal
//! inconsistencies that indicate a construction bug.
//!
//! A wrong answer is never an error. Learner attempts always produce
//! outcome values; only misuse of the API or invalid configuration produce
//! an `Err`.

use thiserror::Error;

use attention_lab_core::MathError;

use crate::level::Stage;

/// A specialized `Result` type for trainer operations.
pub type TrainerResult<T> = Result<T, TrainerError>;

/// Unified error type for trainer operations.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TrainerError {
    /// Configuration rejected before any computation
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Description of the rejected setting
        message: String,
    },

    /// A session method was called while the session was in another stage
    #[error("Wrong stage: expected {expected}, found {actual}")]
    WrongStage {
        /// Stage the method requires
        expected: Stage,
        /// Stage the session was in
        actual: Stage,
    },

    /// Math primitive failure during puzzle construction
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Internal inconsistency (should not happen in normal operation)
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the violated invariant
        message: String,
    },
}

impl TrainerError {
    /// Creates a new invalid-configuration error.
    #[must_use]
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Creates a new wrong-stage error.
    #[must_use]
    pub const fn wrong_stage(expected: Stage, actual: Stage) -> Self {
        Self::WrongStage { expected, actual }
    }

    /// Creates a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if the error is recoverable.
    ///
    /// Validation and stage misuse are recoverable by the caller; math
    /// failures and internal inconsistencies are construction bugs.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidConfiguration { .. } | Self::WrongStage { .. } => true,
            Self::Math(e) => e.is_recoverable(),
            Self::Internal { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_display() {
        let err = TrainerError::invalid_configuration("key count must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: key count must be at least 1"
        );
    }

    #[test]
    fn test_wrong_stage_display() {
        let err = TrainerError::wrong_stage(Stage::TuneSoftmax, Stage::FindKey);
        assert_eq!(err.to_string(), "Wrong stage: expected tune-softmax, found find-key");
    }

    #[test]
    fn test_math_error_conversion() {
        let err: TrainerError = MathError::dimension_mismatch(3, 2).into();
        assert!(matches!(err, TrainerError::Math(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_recoverability_split() {
        assert!(TrainerError::invalid_configuration("x").is_recoverable());
        assert!(TrainerError::wrong_stage(Stage::FindKey, Stage::Complete).is_recoverable());
        assert!(!TrainerError::internal("x").is_recoverable());
    }
}
