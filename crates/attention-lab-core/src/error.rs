//! Error types for the math primitives.
//!
//! This module provides error handling using [`thiserror`] for automatic
//! `Display` and `Error` trait implementations.
//!
//! Both variants of [`MathError`] indicate programming errors: within a
//! correctly assembled puzzle every vector length is controlled upstream, so
//! neither error is expected to reach a caller outside of construction and
//! testing. Wrong answers from a learner are never errors; they are ordinary
//! outcome values in the trainer crate.
//!
//! # Example
//!
//! ```rust
//! use attention_lab_core::error::MathError;
//! use attention_lab_core::vector::dot;
//!
//! let err = dot(&[1.0, 2.0], &[1.0]).unwrap_err();
//! assert!(matches!(err, MathError::DimensionMismatch { expected: 2, actual: 1 }));
//! ```

use thiserror::Error;

/// A specialized `Result` type for math operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors produced by the vector math primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MathError {
    /// Two vectors that must share a dimension do not.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// An operation that requires at least one element received none.
    #[error("Empty input: {0}")]
    EmptyInput(String),
}

impl MathError {
    /// Creates a new dimension-mismatch error.
    #[must_use]
    pub const fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Creates a new empty-input error.
    #[must_use]
    pub fn empty_input(context: impl Into<String>) -> Self {
        Self::EmptyInput(context.into())
    }

    /// Returns `true` if the error is recoverable.
    ///
    /// Math errors indicate a bug in puzzle construction rather than bad
    /// user input, so none of them are recoverable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::DimensionMismatch { .. } | Self::EmptyInput(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let err = MathError::dimension_mismatch(3, 2);
        assert_eq!(err.to_string(), "Dimension mismatch: expected 3, got 2");
    }

    #[test]
    fn test_empty_input_display() {
        let err = MathError::empty_input("softmax over zero scores");
        assert_eq!(err.to_string(), "Empty input: softmax over zero scores");
    }

    #[test]
    fn test_nothing_is_recoverable() {
        assert!(!MathError::dimension_mismatch(1, 2).is_recoverable());
        assert!(!MathError::empty_input("x").is_recoverable());
    }
}
