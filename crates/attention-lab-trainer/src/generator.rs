//! Randomized puzzle generation.
//!
//! [`PuzzleGenerator`] owns its random source. Construction validates the
//! configuration once; after that every [`generate`](PuzzleGenerator::generate)
//! call draws fresh integer-valued vectors and assembles a puzzle from them.
//!
//! Randomness is a passed-in dependency: `with_seed` makes a run fully
//! reproducible, which is how the tests and the deterministic CLI paths
//! drive it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::PuzzleConfig;
use crate::error::TrainerResult;
use crate::puzzle::Puzzle;

/// Generates randomized attention puzzles from a validated configuration.
#[derive(Debug)]
pub struct PuzzleGenerator {
    config: PuzzleConfig,
    rng: StdRng,
}

impl PuzzleGenerator {
    /// Creates a generator seeded from operating-system entropy.
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::InvalidConfiguration`] when the
    /// configuration is rejected.
    ///
    /// [`TrainerError::InvalidConfiguration`]: crate::error::TrainerError::InvalidConfiguration
    pub fn new(config: PuzzleConfig) -> TrainerResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::from_entropy(),
        })
    }

    /// Creates a fully reproducible generator from a seed.
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::InvalidConfiguration`] when the
    /// configuration is rejected.
    ///
    /// [`TrainerError::InvalidConfiguration`]: crate::error::TrainerError::InvalidConfiguration
    pub fn with_seed(config: PuzzleConfig, seed: u64) -> TrainerResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// The configuration this generator draws from
    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    /// Generates the next puzzle.
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::Math`] only if assembly fails, which a
    /// validated configuration rules out.
    ///
    /// [`TrainerError::Math`]: crate::error::TrainerError::Math
    pub fn generate(&mut self) -> TrainerResult<Puzzle> {
        let query = self.draw_vector(self.config.dim_qk);
        let keys = (0..self.config.key_count)
            .map(|_| self.draw_vector(self.config.dim_qk))
            .collect();
        let values = (0..self.config.key_count)
            .map(|_| self.draw_vector(self.config.dim_v))
            .collect();

        let puzzle = Puzzle::assemble(query, keys, values, &self.config, &mut self.rng)?;
        tracing::debug!(
            keys = puzzle.key_count(),
            dim_qk = puzzle.dim_qk(),
            dim_v = puzzle.dim_v(),
            best_key = puzzle.best_key_index(),
            "generated puzzle"
        );
        Ok(puzzle)
    }

    fn draw_vector(&mut self, dim: usize) -> Vec<f64> {
        let min = self.config.component_min;
        let max = self.config.component_max;
        (0..dim)
            .map(|_| self.rng.gen_range(min..=max) as f64)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PuzzleConfig;
    use attention_lab_core::{
        euclidean_distance, CHOICE_IDENTIFICATION_TOLERANCE, PROBABILITY_SUM_TOLERANCE,
    };

    #[test]
    fn test_generate_respects_configured_shape() {
        let config = PuzzleConfig::builder()
            .dim_qk(2)
            .dim_v(4)
            .key_count(5)
            .build();
        let mut generator = PuzzleGenerator::with_seed(config, 9).unwrap();
        let puzzle = generator.generate().unwrap();

        assert_eq!(puzzle.key_count(), 5);
        assert_eq!(puzzle.dim_qk(), 2);
        assert_eq!(puzzle.dim_v(), 4);
        assert_eq!(puzzle.scores().len(), 5);
        assert_eq!(puzzle.probabilities().len(), 5);
        assert_eq!(puzzle.choices().len(), 3);
    }

    #[test]
    fn test_components_stay_in_configured_range() {
        let config = PuzzleConfig::builder().component_range(-2, 2).build();
        let mut generator = PuzzleGenerator::with_seed(config, 11).unwrap();
        let puzzle = generator.generate().unwrap();

        let in_range = |v: &[f64]| v.iter().all(|&x| (-2.0..=2.0).contains(&x) && x == x.trunc());
        assert!(in_range(puzzle.query()));
        assert!(puzzle.keys().iter().all(|k| in_range(k)));
        assert!(puzzle.values().iter().all(|v| in_range(v)));
    }

    #[test]
    fn test_same_seed_means_same_puzzles() {
        let config = PuzzleConfig::default();
        let mut a = PuzzleGenerator::with_seed(config.clone(), 42).unwrap();
        let mut b = PuzzleGenerator::with_seed(config, 42).unwrap();
        for _ in 0..5 {
            assert_eq!(a.generate().unwrap(), b.generate().unwrap());
        }
    }

    #[test]
    fn test_probabilities_always_sum_to_one() {
        let config = PuzzleConfig::default();
        let mut generator = PuzzleGenerator::with_seed(config, 1234).unwrap();
        for _ in 0..50 {
            let puzzle = generator.generate().unwrap();
            let sum: f64 = puzzle.probabilities().iter().sum();
            assert!((sum - 1.0).abs() < PROBABILITY_SUM_TOLERANCE);
            assert!(puzzle.probabilities().iter().all(|&p| p > 0.0 && p <= 1.0));
        }
    }

    #[test]
    fn test_generates_cleanly_at_precision_zero() {
        let config = PuzzleConfig::builder().display_precision(0).build();
        let mut generator = PuzzleGenerator::with_seed(config, 77).unwrap();
        for _ in 0..100 {
            let puzzle = generator.generate().unwrap();
            let rounded = puzzle.rounded_output();
            let close = puzzle
                .choices()
                .iter()
                .filter(|choice| {
                    euclidean_distance(choice.as_slice(), &rounded).unwrap()
                        < CHOICE_IDENTIFICATION_TOLERANCE
                })
                .count();
            assert_eq!(close, 1);
        }
    }

    #[test]
    fn test_invalid_configuration_is_rejected_up_front() {
        let config = PuzzleConfig::builder().key_count(0).build();
        assert!(PuzzleGenerator::with_seed(config, 1).is_err());
    }

    #[test]
    fn test_single_point_range_produces_constant_vectors() {
        let config = PuzzleConfig::builder().component_range(1, 1).build();
        let mut generator = PuzzleGenerator::with_seed(config, 3).unwrap();
        let puzzle = generator.generate().unwrap();
        assert!(puzzle.query().iter().all(|&x| x == 1.0));
    }
}
