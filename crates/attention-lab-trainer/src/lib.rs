//! # Attention Lab Trainer
//!
//! Puzzle generation and the three-level scoring state machine that turn
//! the attention computation into an interactive trainer.
//!
//! # Features
//!
//! - **Puzzle generation**: [`PuzzleGenerator`] draws integer-valued
//!   query/key/value vectors, derives scores, softmax probabilities and the
//!   mixed output, and packages them with two distractor choices. Fully
//!   reproducible from a seed.
//!
//! - **Session state machine**: [`TrainerSession`] walks one puzzle through
//!   three levels (find the best key, tune the softmax, mix the values),
//!   keeps score and streak, and exposes everything through read-only
//!   accessors. State lives in the session value its caller owns; there is
//!   no global store.
//!
//! - **Guided walkthrough**: [`Walkthrough`] retells one puzzle's
//!   derivation in six renderable steps.
//!
//! - **Diagnostics**: [`diagnostics::run_self_check`] verifies the
//!   structural invariants of a seeded puzzle at runtime.
//!
//! # Example
//!
//! ```rust
//! use attention_lab_trainer::{TrainerConfig, TrainerSession};
//!
//! let mut session = TrainerSession::with_seed(TrainerConfig::default(), 42)?;
//!
//! // Level 1: the argmax of the scores is always the right answer
//! let best = session.puzzle().best_key_index();
//! let outcome = session.attempt_find_key(best)?;
//! assert!(outcome.correct);
//!
//! // Level 2: the true distribution passes at distance zero
//! let truth = session.puzzle().probabilities().to_vec();
//! let tune = session.submit_candidate(&truth)?;
//! assert!(tune.passed);
//! # Ok::<(), attention_lab_trainer::TrainerError>(())
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod generator;
pub mod level;
pub mod puzzle;
pub mod session;
pub mod walkthrough;

// Re-export commonly used types at the crate root
pub use config::{
    PuzzleConfig, PuzzleConfigBuilder, ScoringRules, ScoringRulesBuilder, TrainerConfig,
};
pub use diagnostics::{all_passed, run_self_check, CheckReport};
pub use error::{TrainerError, TrainerResult};
pub use generator::PuzzleGenerator;
pub use level::{AttemptOutcome, Stage, TuneOutcome};
pub use puzzle::Puzzle;
pub use session::TrainerSession;
pub use walkthrough::{LabeledVector, Walkthrough, WalkthroughStage, WalkthroughStep};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
///
/// ```rust
/// use attention_lab_trainer::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{PuzzleConfig, ScoringRules, TrainerConfig};
    pub use crate::diagnostics::{all_passed, run_self_check, CheckReport};
    pub use crate::error::{TrainerError, TrainerResult};
    pub use crate::generator::PuzzleGenerator;
    pub use crate::level::{AttemptOutcome, Stage, TuneOutcome};
    pub use crate::puzzle::Puzzle;
    pub use crate::session::TrainerSession;
    pub use crate::walkthrough::{Walkthrough, WalkthroughStage};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_valid() {
        assert!(!VERSION.is_empty());
    }
}
