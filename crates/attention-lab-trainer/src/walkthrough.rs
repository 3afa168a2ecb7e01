//! Guided step-by-step derivation of one puzzle.
//!
//! The walkthrough retells the attention computation in six stages, from
//! the raw input matrices to the final mixed output. It is a pure value
//! built from a [`Puzzle`]: a cursor over precomputed steps, each carrying
//! a static explanation and the numeric rows a renderer would display.
//! Nothing here mutates the puzzle.

use serde::Serialize;

use crate::puzzle::Puzzle;

/// The six stages of the derivation, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WalkthroughStage {
    /// The drawn query, key, and value vectors
    Inputs,
    /// Dot products of the query with every key
    ScoreComputation,
    /// Softmax turning scores into a distribution
    SoftmaxNormalization,
    /// The resulting attention weights
    AttentionWeights,
    /// Per-value contributions scaled by their weights
    ValueMixing,
    /// The summed output vector
    FinalOutput,
}

impl WalkthroughStage {
    /// All stages in presentation order
    pub const ALL: [WalkthroughStage; 6] = [
        WalkthroughStage::Inputs,
        WalkthroughStage::ScoreComputation,
        WalkthroughStage::SoftmaxNormalization,
        WalkthroughStage::AttentionWeights,
        WalkthroughStage::ValueMixing,
        WalkthroughStage::FinalOutput,
    ];

    /// Short title for the stage
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            WalkthroughStage::Inputs => "Inputs",
            WalkthroughStage::ScoreComputation => "Query-Key Scores",
            WalkthroughStage::SoftmaxNormalization => "Softmax",
            WalkthroughStage::AttentionWeights => "Attention Weights",
            WalkthroughStage::ValueMixing => "Weighted Values",
            WalkthroughStage::FinalOutput => "Final Output",
        }
    }

    /// One-paragraph explanation shown alongside the numbers
    #[must_use]
    pub const fn explanation(&self) -> &'static str {
        match self {
            WalkthroughStage::Inputs => {
                "The query asks a question; each key advertises what its value holds. \
                 Components are small integers so every later step can be checked by hand."
            }
            WalkthroughStage::ScoreComputation => {
                "Each score is the dot product of the query with one key. A larger score \
                 means that key points in a direction closer to the query."
            }
            WalkthroughStage::SoftmaxNormalization => {
                "Subtract the largest score, exponentiate, and divide by the sum. The \
                 scores become positive weights that add up to one."
            }
            WalkthroughStage::AttentionWeights => {
                "The resulting distribution is the attention: how much of each value the \
                 output will borrow."
            }
            WalkthroughStage::ValueMixing => {
                "Scale every value vector by its attention weight. These contributions \
                 are what the output is built from."
            }
            WalkthroughStage::FinalOutput => {
                "Add the contributions component by component. This weighted mix of the \
                 values is the attention output."
            }
        }
    }
}

/// One labeled numeric row of a step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledVector {
    /// Row label, e.g. `query` or `key 2`
    pub label: String,
    /// Unrounded components; renderers round for display
    pub vector: Vec<f64>,
}

impl LabeledVector {
    fn new(label: impl Into<String>, vector: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            vector,
        }
    }
}

/// One stage of the derivation with its numeric payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalkthroughStep {
    /// Which stage this step presents
    pub stage: WalkthroughStage,
    /// The rows a renderer would display for this stage
    pub rows: Vec<LabeledVector>,
}

/// Cursor over the six-step derivation of one puzzle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Walkthrough {
    steps: Vec<WalkthroughStep>,
    cursor: usize,
}

impl Walkthrough {
    /// Builds the full derivation for a puzzle.
    #[must_use]
    pub fn new(puzzle: &Puzzle) -> Self {
        let mut inputs = vec![LabeledVector::new("query", puzzle.query().to_vec())];
        for (i, key) in puzzle.keys().iter().enumerate() {
            inputs.push(LabeledVector::new(format!("key {i}"), key.clone()));
        }
        for (i, value) in puzzle.values().iter().enumerate() {
            inputs.push(LabeledVector::new(format!("value {i}"), value.clone()));
        }

        let contributions: Vec<LabeledVector> = puzzle
            .probabilities()
            .iter()
            .zip(puzzle.values().iter())
            .enumerate()
            .map(|(i, (&p, value))| {
                let scaled = value.iter().map(|&x| p * x).collect();
                LabeledVector::new(format!("contribution {i}"), scaled)
            })
            .collect();

        let steps = vec![
            WalkthroughStep {
                stage: WalkthroughStage::Inputs,
                rows: inputs,
            },
            WalkthroughStep {
                stage: WalkthroughStage::ScoreComputation,
                rows: vec![LabeledVector::new("scores", puzzle.scores().to_vec())],
            },
            WalkthroughStep {
                stage: WalkthroughStage::SoftmaxNormalization,
                rows: vec![
                    LabeledVector::new("scores", puzzle.scores().to_vec()),
                    LabeledVector::new("probabilities", puzzle.probabilities().to_vec()),
                ],
            },
            WalkthroughStep {
                stage: WalkthroughStage::AttentionWeights,
                rows: vec![LabeledVector::new(
                    "probabilities",
                    puzzle.probabilities().to_vec(),
                )],
            },
            WalkthroughStep {
                stage: WalkthroughStage::ValueMixing,
                rows: contributions,
            },
            WalkthroughStep {
                stage: WalkthroughStage::FinalOutput,
                rows: vec![LabeledVector::new("output", puzzle.output().to_vec())],
            },
        ];

        Self { steps, cursor: 0 }
    }

    /// All steps in presentation order
    pub fn steps(&self) -> &[WalkthroughStep] {
        &self.steps
    }

    /// The step under the cursor
    pub fn current(&self) -> &WalkthroughStep {
        &self.steps[self.cursor]
    }

    /// Zero-based cursor position
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Check whether the cursor is on the last step
    pub fn is_at_end(&self) -> bool {
        self.cursor + 1 == self.steps.len()
    }

    /// Move forward one step; returns `false` when already at the end
    pub fn advance(&mut self) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Move back one step; returns `false` when already at the start
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Move the cursor back to the first step
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PuzzleConfig;
    use crate::generator::PuzzleGenerator;
    use approx::assert_relative_eq;

    fn sample_puzzle() -> Puzzle {
        let mut generator = PuzzleGenerator::with_seed(PuzzleConfig::default(), 21).unwrap();
        generator.generate().unwrap()
    }

    #[test]
    fn test_six_steps_in_presentation_order() {
        let puzzle = sample_puzzle();
        let walkthrough = Walkthrough::new(&puzzle);
        let stages: Vec<WalkthroughStage> =
            walkthrough.steps().iter().map(|s| s.stage).collect();
        assert_eq!(stages, WalkthroughStage::ALL.to_vec());
    }

    #[test]
    fn test_inputs_step_lists_every_vector() {
        let puzzle = sample_puzzle();
        let walkthrough = Walkthrough::new(&puzzle);
        let inputs = &walkthrough.steps()[0];
        // query + keys + values
        assert_eq!(inputs.rows.len(), 1 + 2 * puzzle.key_count());
        assert_eq!(inputs.rows[0].label, "query");
        assert_eq!(inputs.rows[0].vector, puzzle.query());
    }

    #[test]
    fn test_contributions_sum_to_the_output() {
        let puzzle = sample_puzzle();
        let walkthrough = Walkthrough::new(&puzzle);
        let mixing = &walkthrough.steps()[4];
        assert_eq!(mixing.stage, WalkthroughStage::ValueMixing);
        assert_eq!(mixing.rows.len(), puzzle.key_count());

        let mut summed = vec![0.0; puzzle.dim_v()];
        for row in &mixing.rows {
            for (s, &x) in summed.iter_mut().zip(row.vector.iter()) {
                *s += x;
            }
        }
        for (s, &o) in summed.iter().zip(puzzle.output().iter()) {
            assert_relative_eq!(*s, o, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_cursor_saturates_at_both_ends() {
        let puzzle = sample_puzzle();
        let mut walkthrough = Walkthrough::new(&puzzle);
        assert!(!walkthrough.back());
        for _ in 0..5 {
            assert!(walkthrough.advance());
        }
        assert!(walkthrough.is_at_end());
        assert!(!walkthrough.advance());
        assert_eq!(walkthrough.current().stage, WalkthroughStage::FinalOutput);

        walkthrough.rewind();
        assert_eq!(walkthrough.position(), 0);
    }

    #[test]
    fn test_walkthrough_serializes() {
        let puzzle = sample_puzzle();
        let walkthrough = Walkthrough::new(&puzzle);
        let json = serde_json::to_value(&walkthrough).unwrap();
        assert_eq!(json["steps"].as_array().unwrap().len(), 6);
    }
}
