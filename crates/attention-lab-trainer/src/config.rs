//! Configuration for puzzle generation and scoring.
//!
//! Two independent knobs: [`PuzzleConfig`] shapes the generated puzzles
//! (dimensions, key count, component range, display precision) and
//! [`ScoringRules`] tunes the reward side (per-level points and the level-2
//! pass threshold). [`TrainerConfig`] bundles both for session construction.
//!
//! The point values and the threshold are tuning constants, not invariants.
//! Tests verify the mechanism against whatever rules object is in effect.

use serde::{Deserialize, Serialize};

use crate::error::{TrainerError, TrainerResult};

/// Highest display precision the generator accepts.
///
/// Beyond 12 decimal digits rounding is a no-op at `f64` resolution and the
/// choice-identification tolerance loses meaning.
pub const MAX_DISPLAY_PRECISION: u32 = 12;

/// Configuration for the puzzle generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// Dimension of the query and every key
    pub dim_qk: usize,
    /// Dimension of every value
    pub dim_v: usize,
    /// Number of key/value pairs
    pub key_count: usize,
    /// Smallest component drawn for query/key/value vectors (inclusive)
    pub component_min: i64,
    /// Largest component drawn for query/key/value vectors (inclusive)
    pub component_max: i64,
    /// Decimal digits used when rounding choices for display
    pub display_precision: u32,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            dim_qk: 3,
            dim_v: 3,
            key_count: 4,
            component_min: -3,
            component_max: 3,
            display_precision: 3,
        }
    }
}

impl PuzzleConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> PuzzleConfigBuilder {
        PuzzleConfigBuilder::default()
    }

    /// Checks the configuration before any puzzle is generated.
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::InvalidConfiguration`] when the key count or
    /// a dimension is zero, the component range is inverted, or the display
    /// precision exceeds [`MAX_DISPLAY_PRECISION`].
    pub fn validate(&self) -> TrainerResult<()> {
        if self.key_count < 1 {
            return Err(TrainerError::invalid_configuration(
                "key count must be at least 1",
            ));
        }
        if self.dim_qk < 1 {
            return Err(TrainerError::invalid_configuration(
                "query/key dimension must be at least 1",
            ));
        }
        if self.dim_v < 1 {
            return Err(TrainerError::invalid_configuration(
                "value dimension must be at least 1",
            ));
        }
        if self.component_min > self.component_max {
            return Err(TrainerError::invalid_configuration(format!(
                "component range is inverted: {} > {}",
                self.component_min, self.component_max
            )));
        }
        if self.display_precision > MAX_DISPLAY_PRECISION {
            return Err(TrainerError::invalid_configuration(format!(
                "display precision {} exceeds the maximum of {}",
                self.display_precision, MAX_DISPLAY_PRECISION
            )));
        }
        Ok(())
    }
}

/// Builder for [`PuzzleConfig`]
#[derive(Debug, Default)]
pub struct PuzzleConfigBuilder {
    config: PuzzleConfig,
}

impl PuzzleConfigBuilder {
    /// Set the query/key dimension
    #[must_use]
    pub fn dim_qk(mut self, dim: usize) -> Self {
        self.config.dim_qk = dim;
        self
    }

    /// Set the value dimension
    #[must_use]
    pub fn dim_v(mut self, dim: usize) -> Self {
        self.config.dim_v = dim;
        self
    }

    /// Set the number of key/value pairs
    #[must_use]
    pub fn key_count(mut self, count: usize) -> Self {
        self.config.key_count = count;
        self
    }

    /// Set the inclusive component range for drawn vectors
    #[must_use]
    pub fn component_range(mut self, min: i64, max: i64) -> Self {
        self.config.component_min = min;
        self.config.component_max = max;
        self
    }

    /// Set the display precision, clamped to the supported range
    #[must_use]
    pub fn display_precision(mut self, digits: u32) -> Self {
        self.config.display_precision = digits.min(MAX_DISPLAY_PRECISION);
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> PuzzleConfig {
        self.config
    }
}

/// Scoring rules for the three levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Points for identifying the best key (level 1)
    pub find_key_points: u32,
    /// Points for matching the softmax distribution by hand (level 2)
    pub tune_softmax_points: u32,
    /// Reduced points when the auto-match shortcut was used (level 2)
    pub auto_match_points: u32,
    /// Points for picking the correct output mix (level 3)
    pub mix_values_points: u32,
    /// Euclidean distance below which a candidate distribution passes
    pub tune_threshold: f64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            find_key_points: 120,
            tune_softmax_points: 140,
            auto_match_points: 100,
            mix_values_points: 160,
            tune_threshold: 0.15,
        }
    }
}

impl ScoringRules {
    /// Create a new rules builder
    #[must_use]
    pub fn builder() -> ScoringRulesBuilder {
        ScoringRulesBuilder::default()
    }

    /// Checks the rules before a session is constructed.
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::InvalidConfiguration`] when the pass
    /// threshold is not a positive finite number.
    pub fn validate(&self) -> TrainerResult<()> {
        if !self.tune_threshold.is_finite() || self.tune_threshold <= 0.0 {
            return Err(TrainerError::invalid_configuration(format!(
                "tune threshold must be positive and finite, got {}",
                self.tune_threshold
            )));
        }
        Ok(())
    }
}

/// Builder for [`ScoringRules`]
#[derive(Debug, Default)]
pub struct ScoringRulesBuilder {
    rules: ScoringRules,
}

impl ScoringRulesBuilder {
    /// Set the level-1 award
    #[must_use]
    pub fn find_key_points(mut self, points: u32) -> Self {
        self.rules.find_key_points = points;
        self
    }

    /// Set the level-2 award
    #[must_use]
    pub fn tune_softmax_points(mut self, points: u32) -> Self {
        self.rules.tune_softmax_points = points;
        self
    }

    /// Set the reduced level-2 award for the auto-match shortcut
    #[must_use]
    pub fn auto_match_points(mut self, points: u32) -> Self {
        self.rules.auto_match_points = points;
        self
    }

    /// Set the level-3 award
    #[must_use]
    pub fn mix_values_points(mut self, points: u32) -> Self {
        self.rules.mix_values_points = points;
        self
    }

    /// Set the level-2 pass threshold, clamped to a usable range
    #[must_use]
    pub fn tune_threshold(mut self, threshold: f64) -> Self {
        self.rules.tune_threshold = threshold.clamp(1e-6, 2.0);
        self
    }

    /// Build the rules
    #[must_use]
    pub fn build(self) -> ScoringRules {
        self.rules
    }
}

/// Bundled configuration for a trainer session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Puzzle generation settings
    pub puzzle: PuzzleConfig,
    /// Scoring settings
    pub scoring: ScoringRules,
}

impl TrainerConfig {
    /// Checks both halves of the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::InvalidConfiguration`] when either half is
    /// rejected.
    pub fn validate(&self) -> TrainerResult<()> {
        self.puzzle.validate()?;
        self.scoring.validate()
    }
}
