//! Property-based tests for puzzle generation and the math underneath it
//!
//! Tests cover:
//! - Softmax outputs forming a probability distribution
//! - Self dot products staying non-negative
//! - Candidate normalization producing distributions
//! - Rounding moving values by at most half a step
//! - Generated puzzles keeping exactly one matching choice
//! - The true distribution always clearing the tuning threshold
//! - Component edits never corrupting the working candidate

use attention_lab_trainer::prelude::*;

// Property-based tests
#[cfg(test)]
mod property_tests {
    use super::*;
    use attention_lab_core::{
        dot, euclidean_distance, normalize, round_to, softmax, CHOICE_IDENTIFICATION_TOLERANCE,
        PROBABILITY_SUM_TOLERANCE,
    };
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_softmax_is_a_distribution(
            scores in prop::collection::vec(-50.0f64..50.0, 1..12)
        ) {
            let probabilities = softmax(&scores).unwrap();
            let sum: f64 = probabilities.iter().sum();
            assert!((sum - 1.0).abs() < PROBABILITY_SUM_TOLERANCE);
            assert!(probabilities.iter().all(|&p| p > 0.0 && p <= 1.0));
        }

        #[test]
        fn prop_self_dot_is_non_negative(
            v in prop::collection::vec(-10.0f64..10.0, 1..8)
        ) {
            assert!(dot(&v, &v).unwrap() >= 0.0);
        }

        #[test]
        fn prop_normalize_yields_a_distribution(
            v in prop::collection::vec(-5.0f64..5.0, 1..8)
        ) {
            let normalized = normalize(&v);
            let sum: f64 = normalized.iter().sum();
            assert!((sum - 1.0).abs() < PROBABILITY_SUM_TOLERANCE);
            assert!(normalized.iter().all(|&p| (0.0..=1.0).contains(&p)));
        }

        #[test]
        fn prop_rounding_moves_at_most_half_a_step(
            x in -1_000_000.0f64..1_000_000.0,
            precision in 0u32..=6
        ) {
            let rounded = round_to(x, precision);
            let half_step = 0.5 * 10f64.powi(-(precision as i32));
            assert!((rounded - x).abs() <= half_step + 1e-9);
        }

        #[test]
        fn prop_generated_puzzle_keeps_its_invariants(
            seed in any::<u64>(),
            dim_qk in 1usize..=4,
            dim_v in 1usize..=4,
            keys in 1usize..=8,
            precision in 0u32..=4
        ) {
            let puzzle = generate(seed, dim_qk, dim_v, keys, precision);

            let sum: f64 = puzzle.probabilities().iter().sum();
            assert!((sum - 1.0).abs() < PROBABILITY_SUM_TOLERANCE);
            assert_eq!(puzzle.scores().len(), keys);
            assert_eq!(puzzle.choices().len(), 3);
            assert!(puzzle.best_key_index() < keys);

            let rounded = puzzle.rounded_output();
            let within: Vec<usize> = (0..puzzle.choices().len())
                .filter(|&i| {
                    euclidean_distance(&puzzle.choices()[i], &rounded).unwrap()
                        < CHOICE_IDENTIFICATION_TOLERANCE
                })
                .collect();
            assert_eq!(within, vec![puzzle.correct_choice()]);
        }

        #[test]
        fn prop_truth_always_clears_the_threshold(
            seed in any::<u64>(),
            keys in 1usize..=8
        ) {
            let config = TrainerConfig {
                puzzle: PuzzleConfig::builder().key_count(keys).build(),
                scoring: ScoringRules::default(),
            };
            let mut session = TrainerSession::with_seed(config, seed).unwrap();
            let best = session.puzzle().best_key_index();
            assert!(session.attempt_find_key(best).unwrap().correct);

            let truth = session.puzzle().probabilities().to_vec();
            let outcome = session.submit_candidate(&truth).unwrap();
            assert!(outcome.passed);
            assert!(outcome.distance < session.rules().tune_threshold);
        }

        #[test]
        fn prop_component_edits_keep_a_valid_candidate(
            seed in any::<u64>(),
            index in 0usize..8,
            value in -2.0f64..3.0
        ) {
            let mut session =
                TrainerSession::with_seed(TrainerConfig::default(), seed).unwrap();
            let best = session.puzzle().best_key_index();
            session.attempt_find_key(best).unwrap();

            let index = index % session.puzzle().key_count();
            session.set_candidate_component(index, value).unwrap();

            let sum: f64 = session.candidate().iter().sum();
            assert!((sum - 1.0).abs() < PROBABILITY_SUM_TOLERANCE);
            assert!(session
                .candidate()
                .iter()
                .all(|&c| (0.0..=1.0).contains(&c)));
        }

        #[test]
        fn prop_drawn_components_are_integers_in_range(
            seed in any::<u64>(),
            min in -6i64..=0,
            max in 0i64..=6
        ) {
            let config = PuzzleConfig::builder().component_range(min, max).build();
            let mut generator = PuzzleGenerator::with_seed(config, seed).unwrap();
            let puzzle = generator.generate().unwrap();

            let rows = puzzle
                .keys()
                .iter()
                .chain(puzzle.values().iter())
                .flatten()
                .chain(puzzle.query().iter());
            for &x in rows {
                assert_eq!(x, x.trunc());
                assert!(x >= min as f64 && x <= max as f64);
            }
        }
    }

    fn generate(seed: u64, dim_qk: usize, dim_v: usize, keys: usize, precision: u32) -> Puzzle {
        let config = PuzzleConfig::builder()
            .dim_qk(dim_qk)
            .dim_v(dim_v)
            .key_count(keys)
            .display_precision(precision)
            .build();
        let mut generator = PuzzleGenerator::with_seed(config, seed).unwrap();
        generator.generate().unwrap()
    }
}
