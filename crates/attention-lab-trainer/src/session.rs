//! Trainer session: one learner, one puzzle at a time.
//!
//! [`TrainerSession`] owns the generator, the active [`Puzzle`], the stage,
//! the level-2 working candidate, and the running score/streak. Every
//! transition is a synchronous method on the session; there is no shared
//! store and no subscription machinery. The presentation layer re-renders
//! whenever it likes by reading the accessors.
//!
//! Wrong answers are outcome values. The only `Err` cases are construction
//! with a bad configuration and calling a level method in the wrong stage.

use attention_lab_core::normalize;

use crate::config::{ScoringRules, TrainerConfig};
use crate::error::{TrainerError, TrainerResult};
use crate::generator::PuzzleGenerator;
use crate::level::{AttemptOutcome, Stage, TuneOutcome};
use crate::puzzle::Puzzle;

/// Interactive three-level trainer over generated puzzles.
#[derive(Debug)]
pub struct TrainerSession {
    generator: PuzzleGenerator,
    rules: ScoringRules,
    puzzle: Puzzle,
    stage: Stage,
    candidate: Vec<f64>,
    auto_match_used: bool,
    score: u64,
    streak: u32,
}

impl TrainerSession {
    /// Creates a session with entropy-seeded puzzle generation.
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::InvalidConfiguration`] when the
    /// configuration is rejected.
    pub fn new(config: TrainerConfig) -> TrainerResult<Self> {
        config.scoring.validate()?;
        let generator = PuzzleGenerator::new(config.puzzle)?;
        Self::from_generator(generator, config.scoring)
    }

    /// Creates a fully reproducible session from a seed.
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::InvalidConfiguration`] when the
    /// configuration is rejected.
    pub fn with_seed(config: TrainerConfig, seed: u64) -> TrainerResult<Self> {
        config.scoring.validate()?;
        let generator = PuzzleGenerator::with_seed(config.puzzle, seed)?;
        Self::from_generator(generator, config.scoring)
    }

    fn from_generator(
        mut generator: PuzzleGenerator,
        rules: ScoringRules,
    ) -> TrainerResult<Self> {
        let puzzle = generator.generate()?;
        let candidate = puzzle.uniform_candidate();
        Ok(Self {
            generator,
            rules,
            puzzle,
            stage: Stage::FindKey,
            candidate,
            auto_match_used: false,
            score: 0,
            streak: 0,
        })
    }

    /// The active puzzle
    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    /// The current stage
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Total points accumulated this session
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Consecutive successful attempts without an intervening failure
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// The scoring rules in effect
    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// The level-2 working distribution (always normalized)
    pub fn candidate(&self) -> &[f64] {
        &self.candidate
    }

    /// Whether the auto-match shortcut was used on the active puzzle
    pub fn auto_match_used(&self) -> bool {
        self.auto_match_used
    }

    /// Distance between the working candidate and the true probabilities.
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::Math`] only on an internal length mismatch,
    /// which session construction rules out.
    pub fn candidate_distance(&self) -> TrainerResult<f64> {
        self.puzzle.candidate_distance(&self.candidate)
    }

    /// Level 1: select the key expected to win the attention comparison.
    ///
    /// Correct iff `key_index` is the argmax of the scores, ties to the
    /// lowest index. An incorrect selection keeps the session in level 1
    /// so the learner may retry.
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::WrongStage`] outside level 1.
    pub fn attempt_find_key(&mut self, key_index: usize) -> TrainerResult<AttemptOutcome> {
        self.require_stage(Stage::FindKey)?;
        let correct = self.puzzle.is_best_key(key_index);
        let points_awarded = if correct {
            self.record_success(self.rules.find_key_points);
            self.stage = self.stage.advance();
            self.rules.find_key_points
        } else {
            self.record_failure();
            0
        };
        tracing::debug!(key_index, correct, points_awarded, "find-key attempt");
        Ok(AttemptOutcome {
            correct,
            points_awarded,
        })
    }

    /// Level 2: set one component of the working candidate.
    ///
    /// The component is clamped to `[0, 1]` and the whole candidate is
    /// re-normalized, then evaluated against the pass threshold. The edit
    /// that brings the distance under the threshold awards the points and
    /// advances the session; edits that do not are neither success nor
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::WrongStage`] outside level 2 and
    /// [`TrainerError::InvalidConfiguration`] for an out-of-range index.
    pub fn set_candidate_component(
        &mut self,
        index: usize,
        value: f64,
    ) -> TrainerResult<TuneOutcome> {
        self.require_stage(Stage::TuneSoftmax)?;
        if index >= self.candidate.len() {
            return Err(TrainerError::invalid_configuration(format!(
                "candidate index {} out of range for {} keys",
                index,
                self.candidate.len()
            )));
        }
        self.candidate[index] = value.clamp(0.0, 1.0);
        self.candidate = normalize(&self.candidate);
        self.evaluate_candidate()
    }

    /// Level 2: replace the whole working candidate.
    ///
    /// Negative components are clamped to zero and the vector is
    /// re-normalized before evaluation.
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::WrongStage`] outside level 2 and
    /// [`TrainerError::Math`] when the candidate length differs from the
    /// key count.
    pub fn submit_candidate(&mut self, candidate: &[f64]) -> TrainerResult<TuneOutcome> {
        self.require_stage(Stage::TuneSoftmax)?;
        if candidate.len() != self.candidate.len() {
            return Err(attention_lab_core::MathError::dimension_mismatch(
                self.candidate.len(),
                candidate.len(),
            )
            .into());
        }
        self.candidate = normalize(candidate);
        self.evaluate_candidate()
    }

    /// Level 2: snap the candidate to the true distribution for a reduced
    /// award.
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::WrongStage`] outside level 2.
    pub fn auto_match(&mut self) -> TrainerResult<TuneOutcome> {
        self.require_stage(Stage::TuneSoftmax)?;
        self.auto_match_used = true;
        self.candidate = self.puzzle.probabilities().to_vec();
        self.evaluate_candidate()
    }

    /// Level 3: select the choice claimed to be the mixed output.
    ///
    /// An incorrect selection keeps the session in level 3 so the learner
    /// may retry.
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::WrongStage`] outside level 3.
    pub fn attempt_mix_values(&mut self, choice_index: usize) -> TrainerResult<AttemptOutcome> {
        self.require_stage(Stage::MixValues)?;
        let correct = self.puzzle.is_correct_choice(choice_index);
        let points_awarded = if correct {
            self.record_success(self.rules.mix_values_points);
            self.stage = self.stage.advance();
            self.rules.mix_values_points
        } else {
            self.record_failure();
            0
        };
        tracing::debug!(choice_index, correct, points_awarded, "mix-values attempt");
        Ok(AttemptOutcome {
            correct,
            points_awarded,
        })
    }

    /// Replaces the puzzle and returns to level 1, keeping score and
    /// streak.
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::Math`] only if regeneration fails, which a
    /// validated configuration rules out.
    pub fn new_puzzle(&mut self) -> TrainerResult<()> {
        self.regenerate()
    }

    /// Same effect as [`new_puzzle`](Self::new_puzzle), available from any
    /// stage.
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::Math`] only if regeneration fails, which a
    /// validated configuration rules out.
    pub fn reset_puzzle(&mut self) -> TrainerResult<()> {
        self.regenerate()
    }

    /// Clears score and streak and starts over with a fresh puzzle.
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::Math`] only if regeneration fails, which a
    /// validated configuration rules out.
    pub fn reset_session(&mut self) -> TrainerResult<()> {
        self.score = 0;
        self.streak = 0;
        self.regenerate()
    }

    fn evaluate_candidate(&mut self) -> TrainerResult<TuneOutcome> {
        let distance = self.puzzle.candidate_distance(&self.candidate)?;
        let passed = distance < self.rules.tune_threshold;
        let mut points_awarded = 0;
        if passed {
            points_awarded = if self.auto_match_used {
                self.rules.auto_match_points
            } else {
                self.rules.tune_softmax_points
            };
            self.record_success(points_awarded);
            self.stage = self.stage.advance();
        }
        tracing::debug!(distance, passed, points_awarded, "tune-softmax evaluation");
        Ok(TuneOutcome {
            distance,
            passed,
            points_awarded,
        })
    }

    fn regenerate(&mut self) -> TrainerResult<()> {
        self.puzzle = self.generator.generate()?;
        self.candidate = self.puzzle.uniform_candidate();
        self.auto_match_used = false;
        self.stage = Stage::FindKey;
        tracing::debug!(score = self.score, streak = self.streak, "fresh puzzle");
        Ok(())
    }

    fn require_stage(&self, expected: Stage) -> TrainerResult<()> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(TrainerError::wrong_stage(expected, self.stage))
        }
    }

    fn record_success(&mut self, points: u32) {
        self.score += u64::from(points);
        self.streak += 1;
    }

    fn record_failure(&mut self) {
        self.streak = 0;
    }
}
