//! Dot-product attention pipeline.
//!
//! Implements the attention computation the trainer teaches:
//! scores = q·kᵢ, weights = softmax(scores), output = Σ weightsᵢ·vᵢ.
//!
//! Unlike the transformer formulation there is no `1/√d` scaling. The
//! trainer works on small integer vectors a learner can compute by hand,
//! and raw dot products keep the scores legible.

use serde::Serialize;

use crate::error::{MathError, MathResult};
use crate::vector::{dot, softmax, weighted_sum};

/// Every intermediate of one attention computation.
///
/// The trainer quizzes the learner on each stage, so the pipeline returns
/// the full trace instead of collapsing it to the output vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttentionTrace {
    /// Raw dot-product score per key
    pub scores: Vec<f64>,
    /// Softmax of the scores
    pub weights: Vec<f64>,
    /// Weighted mix of the value vectors
    pub output: Vec<f64>,
}

/// Dot-product attention over one query and a set of key/value pairs.
///
/// Keys share the query dimension; values may use a different dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttentionHead {
    dim_qk: usize,
    dim_v: usize,
}

impl AttentionHead {
    /// Creates an attention head for the given query/key and value dimensions.
    #[must_use]
    pub const fn new(dim_qk: usize, dim_v: usize) -> Self {
        Self { dim_qk, dim_v }
    }

    /// The query/key dimension.
    #[must_use]
    pub const fn dim_qk(&self) -> usize {
        self.dim_qk
    }

    /// The value dimension.
    #[must_use]
    pub const fn dim_v(&self) -> usize {
        self.dim_v
    }

    /// Runs the full pipeline and returns every intermediate.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::EmptyInput`] when `keys` or `values` is empty,
    /// and [`MathError::DimensionMismatch`] when the query, any key, or any
    /// value disagrees with the head's dimensions or the key and value
    /// counts differ.
    pub fn attend(
        &self,
        query: &[f64],
        keys: &[Vec<f64>],
        values: &[Vec<f64>],
    ) -> MathResult<AttentionTrace> {
        if query.len() != self.dim_qk {
            return Err(MathError::dimension_mismatch(self.dim_qk, query.len()));
        }
        if keys.is_empty() || values.is_empty() {
            return Err(MathError::empty_input("keys or values"));
        }
        if keys.len() != values.len() {
            return Err(MathError::dimension_mismatch(keys.len(), values.len()));
        }
        for value in values {
            if value.len() != self.dim_v {
                return Err(MathError::dimension_mismatch(self.dim_v, value.len()));
            }
        }

        let scores = keys
            .iter()
            .map(|key| dot(query, key))
            .collect::<MathResult<Vec<f64>>>()?;
        let weights = softmax(&scores)?;
        let output = weighted_sum(&weights, values)?;

        Ok(AttentionTrace {
            scores,
            weights,
            output,
        })
    }
}
