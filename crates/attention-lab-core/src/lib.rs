//! # Attention Lab Core
//!
//! Vector math primitives and the dot-product attention pipeline behind the
//! Attention Lab trainer.
//!
//! This crate provides the foundational numeric building blocks used
//! throughout the Attention Lab workspace, including:
//!
//! - **Primitives**: [`dot`], [`softmax`], [`euclidean_distance`],
//!   [`round_vec`], [`argmax`], [`normalize`], and [`weighted_sum`] in the
//!   [`vector`] module.
//!
//! - **Error Types**: [`MathError`] and [`MathResult`] via the [`error`]
//!   module. Math errors are programmer errors; wrong answers from a
//!   learner are never represented as errors.
//!
//! - **Pipeline**: [`AttentionHead`], which chains the primitives into one
//!   computation and returns an [`AttentionTrace`] exposing every
//!   intermediate (scores, softmax weights, mixed output).
//!
//! # Example
//!
//! ```rust
//! use attention_lab_core::AttentionHead;
//!
//! let head = AttentionHead::new(3, 3);
//! let trace = head.attend(
//!     &[1.0, 0.0, 0.0],
//!     &[vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]],
//!     &[vec![5.0, 5.0, 5.0], vec![1.0, 1.0, 1.0]],
//! )?;
//!
//! assert_eq!(trace.scores, vec![1.0, 0.0]);
//! let sum: f64 = trace.weights.iter().sum();
//! assert!((sum - 1.0).abs() < 1e-9);
//! # Ok::<(), attention_lab_core::MathError>(())
//! ```

#![forbid(unsafe_code)]

pub mod attention;
pub mod error;
pub mod vector;

// Re-export commonly used items at the crate root
pub use attention::{AttentionHead, AttentionTrace};
pub use error::{MathError, MathResult};
pub use vector::{
    argmax, dot, euclidean_distance, normalize, round_to, round_vec, softmax, weighted_sum,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tolerance within which a probability vector must sum to one
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-9;

/// Tolerance for identifying the correct choice among candidates
pub const CHOICE_IDENTIFICATION_TOLERANCE: f64 = 1e-3;

/// Tolerance for recomputing a stored output from its inputs
pub const OUTPUT_RECOMPUTE_TOLERANCE: f64 = 1e-2;

/// Prelude module for convenient imports.
///
/// ```rust
/// use attention_lab_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::attention::{AttentionHead, AttentionTrace};
    pub use crate::error::{MathError, MathResult};
    pub use crate::vector::{
        argmax, dot, euclidean_distance, normalize, round_to, round_vec, softmax, weighted_sum,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_valid() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_tolerances_are_ordered() {
        assert!(PROBABILITY_SUM_TOLERANCE < CHOICE_IDENTIFICATION_TOLERANCE);
        assert!(CHOICE_IDENTIFICATION_TOLERANCE < OUTPUT_RECOMPUTE_TOLERANCE);
    }
}
