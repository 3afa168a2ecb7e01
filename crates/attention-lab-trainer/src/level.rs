//! Level progression for the three-stage trainer.
//!
//! A session walks one puzzle through three graduated stages and a terminal
//! completed state. Stages only ever move forward; regenerating the puzzle
//! is the only way back to the start.

use serde::{Deserialize, Serialize};

/// Stage of the current puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Level 1: pick the key with the highest attention score
    FindKey,

    /// Level 2: shape a candidate distribution until it matches the softmax
    TuneSoftmax,

    /// Level 3: pick the correctly mixed output among distractors
    MixValues,

    /// All three levels solved; a new puzzle may be requested
    Complete,
}

impl Stage {
    /// Get the level number, or `None` for the completed state
    #[must_use]
    pub const fn level_number(&self) -> Option<u8> {
        match self {
            Stage::FindKey => Some(1),
            Stage::TuneSoftmax => Some(2),
            Stage::MixValues => Some(3),
            Stage::Complete => None,
        }
    }

    /// Get the stage title shown to the learner
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Stage::FindKey => "Find the Best Key",
            Stage::TuneSoftmax => "Tune the Softmax",
            Stage::MixValues => "Mix the Values",
            Stage::Complete => "Puzzle Complete",
        }
    }

    /// Get the instruction shown to the learner
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Stage::FindKey => "Pick the key whose dot product with the query is largest",
            Stage::TuneSoftmax => {
                "Adjust the candidate weights until they match the softmax distribution"
            }
            Stage::MixValues => "Pick the output that mixes the values by the attention weights",
            Stage::Complete => "All levels solved; request a new puzzle to continue",
        }
    }

    /// The stage that follows a success at this one
    #[must_use]
    pub const fn advance(&self) -> Stage {
        match self {
            Stage::FindKey => Stage::TuneSoftmax,
            Stage::TuneSoftmax => Stage::MixValues,
            Stage::MixValues | Stage::Complete => Stage::Complete,
        }
    }

    /// Check whether the puzzle is fully solved
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Stage::Complete)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::FindKey => write!(f, "find-key"),
            Stage::TuneSoftmax => write!(f, "tune-softmax"),
            Stage::MixValues => write!(f, "mix-values"),
            Stage::Complete => write!(f, "complete"),
        }
    }
}

/// Result of a level-1 or level-3 attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttemptOutcome {
    /// Whether the selected index was the correct one
    pub correct: bool,
    /// Points added to the session score by this attempt
    pub points_awarded: u32,
}

/// Result of a level-2 edit or submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TuneOutcome {
    /// Euclidean distance between the candidate and the true distribution
    pub distance: f64,
    /// Whether the candidate is within the pass threshold
    pub passed: bool,
    /// Points added to the session score by this edit (non-zero only on the
    /// edit that passes)
    pub points_awarded: u32,
}
