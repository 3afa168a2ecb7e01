//! Puzzle assembly and evaluation.
//!
//! A [`Puzzle`] is one frozen attention scenario: the drawn query, keys and
//! values, every derived stage of the computation, and three answer choices
//! (the true output plus two distractors) in shuffled order.
//!
//! ## Choice construction
//!
//! Distractors are built by adding fixed offsets to the true output with
//! alternating sign by component index. The smallest offset magnitude is
//! `0.25`, three orders of magnitude above the identification tolerance, so
//! the true output is always the unique choice within tolerance of the
//! rounded ground truth. At display precision 0 the offsets scale up by
//! ten, keeping them wider than the integer rounding step. Choices are
//! rounded for display; the stored `output` stays unrounded so rounding
//! error never compounds into comparisons.

use rand::{seq::SliceRandom, Rng};
use serde::Serialize;

use attention_lab_core::{
    argmax, euclidean_distance, round_vec, AttentionHead, MathResult,
    CHOICE_IDENTIFICATION_TOLERANCE,
};

use crate::config::PuzzleConfig;
use crate::error::{TrainerError, TrainerResult};

// Base offsets applied to even/odd components of the true output, scaled
// up when the display precision rounds coarser than they are.
const DISTRACTOR_A_EVEN: f64 = 0.4;
const DISTRACTOR_A_ODD: f64 = -0.35;
const DISTRACTOR_B_EVEN: f64 = -0.25;
const DISTRACTOR_B_ODD: f64 = 0.6;

/// One frozen attention scenario with derived answers and choices.
///
/// Immutable once assembled; every field is reachable through read-only
/// accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Puzzle {
    query: Vec<f64>,
    keys: Vec<Vec<f64>>,
    values: Vec<Vec<f64>>,
    scores: Vec<f64>,
    probabilities: Vec<f64>,
    output: Vec<f64>,
    choices: Vec<Vec<f64>>,
    correct_choice: usize,
    display_precision: u32,
}

impl Puzzle {
    /// Assembles a puzzle from fixed input vectors.
    ///
    /// Dimensions come from the supplied vectors; `config` contributes the
    /// display precision. The RNG is used once, to shuffle the choices.
    /// This is the constructor behind [`PuzzleGenerator`] and the way to
    /// build curated scenarios with known inputs.
    ///
    /// [`PuzzleGenerator`]: crate::generator::PuzzleGenerator
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::Math`] when the vectors are empty or
    /// disagree in dimension.
    pub fn assemble<R: Rng>(
        query: Vec<f64>,
        keys: Vec<Vec<f64>>,
        values: Vec<Vec<f64>>,
        config: &PuzzleConfig,
        rng: &mut R,
    ) -> TrainerResult<Self> {
        let dim_v = values.first().map_or(0, |v| v.len());
        let head = AttentionHead::new(query.len(), dim_v);
        let trace = head.attend(&query, &keys, &values)?;

        let precision = config.display_precision;
        let rounded_output = round_vec(&trace.output, precision);
        let (distractor_a, distractor_b) = build_distractors(&trace.output, precision);

        let mut choices = vec![
            rounded_output.clone(),
            round_vec(&distractor_a, precision),
            round_vec(&distractor_b, precision),
        ];
        choices.shuffle(rng);

        let correct_choice = identify_correct_choice(&choices, &rounded_output)?;

        Ok(Self {
            query,
            keys,
            values,
            scores: trace.scores,
            probabilities: trace.weights,
            output: trace.output,
            choices,
            correct_choice,
            display_precision: precision,
        })
    }

    /// The query vector
    pub fn query(&self) -> &[f64] {
        &self.query
    }

    /// The key vectors, one per score
    pub fn keys(&self) -> &[Vec<f64>] {
        &self.keys
    }

    /// The value vectors, one per key
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Raw dot-product scores, one per key
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Softmax of the scores
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Unrounded ground-truth output
    pub fn output(&self) -> &[f64] {
        &self.output
    }

    /// Answer choices in shuffled display order
    pub fn choices(&self) -> &[Vec<f64>] {
        &self.choices
    }

    /// Index of the true output inside [`choices`](Self::choices)
    pub fn correct_choice(&self) -> usize {
        self.correct_choice
    }

    /// Decimal digits the choices were rounded to
    pub fn display_precision(&self) -> u32 {
        self.display_precision
    }

    /// Number of key/value pairs
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Dimension of the query and keys
    pub fn dim_qk(&self) -> usize {
        self.query.len()
    }

    /// Dimension of the values and output
    pub fn dim_v(&self) -> usize {
        self.output.len()
    }

    /// Ground-truth output at display precision
    pub fn rounded_output(&self) -> Vec<f64> {
        round_vec(&self.output, self.display_precision)
    }

    /// Index of the key with the highest score, ties to the lowest index
    pub fn best_key_index(&self) -> usize {
        argmax(&self.scores).unwrap_or(0)
    }

    /// Check a level-1 answer.
    ///
    /// Any index that is not the argmax counts as incorrect, out-of-range
    /// included.
    pub fn is_best_key(&self, key_index: usize) -> bool {
        key_index == self.best_key_index()
    }

    /// Check a level-3 answer.
    pub fn is_correct_choice(&self, choice_index: usize) -> bool {
        choice_index == self.correct_choice
    }

    /// Distance between a candidate distribution and the true probabilities.
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::Math`] when the candidate length differs
    /// from the key count.
    pub fn candidate_distance(&self, candidate: &[f64]) -> TrainerResult<f64> {
        Ok(euclidean_distance(candidate, &self.probabilities)?)
    }

    /// The uniform starting candidate for level 2
    pub fn uniform_candidate(&self) -> Vec<f64> {
        let n = self.keys.len();
        vec![1.0 / n as f64; n]
    }
}

fn build_distractors(output: &[f64], precision: u32) -> (Vec<f64>, Vec<f64>) {
    // Rounding at the display precision moves a component by at most half a
    // step, 0.5 * 10^-precision. Below precision 1 that half-step reaches
    // past the base offsets, so they grow by the missing power of ten; an
    // offset that rounding can swallow would fold a distractor onto the
    // rounded true output.
    let scale = 10f64.powi((1 - precision as i32).max(0));
    let distractor_a = output
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            if i % 2 == 0 {
                x + scale * DISTRACTOR_A_EVEN
            } else {
                x + scale * DISTRACTOR_A_ODD
            }
        })
        .collect();
    let distractor_b = output
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            if i % 2 == 0 {
                x + scale * DISTRACTOR_B_EVEN
            } else {
                x + scale * DISTRACTOR_B_ODD
            }
        })
        .collect();
    (distractor_a, distractor_b)
}

fn identify_correct_choice(choices: &[Vec<f64>], rounded_output: &[f64]) -> TrainerResult<usize> {
    let matches: Vec<usize> = choices
        .iter()
        .enumerate()
        .filter_map(|(i, choice)| {
            let distance = euclidean_distance(choice, rounded_output).ok()?;
            (distance < CHOICE_IDENTIFICATION_TOLERANCE).then_some(i)
        })
        .collect();
    match matches.as_slice() {
        [index] => Ok(*index),
        _ => Err(TrainerError::internal(format!(
            "expected exactly one choice within tolerance, found {}",
            matches.len()
        ))),
    }
}

/// Recomputes the output from probabilities and values.
///
/// The diagnostics and tests use this to confirm the stored ground truth
/// against an independent computation.
pub fn recompute_output(puzzle: &Puzzle) -> MathResult<Vec<f64>> {
    attention_lab_core::weighted_sum(puzzle.probabilities(), puzzle.values())
}
