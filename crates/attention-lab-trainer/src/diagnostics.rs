//! Runtime self-checks over a deterministically generated puzzle.
//!
//! The trainer ships with the invariant checks its original developer panel
//! ran on demand: generate one puzzle from a seed and confirm every
//! structural guarantee on it. The same checks back the integration tests;
//! here they produce [`CheckReport`] values a presentation layer can list.

use serde::Serialize;

use attention_lab_core::{
    dot, euclidean_distance, CHOICE_IDENTIFICATION_TOLERANCE, OUTPUT_RECOMPUTE_TOLERANCE,
    PROBABILITY_SUM_TOLERANCE,
};

use crate::config::PuzzleConfig;
use crate::error::TrainerResult;
use crate::generator::PuzzleGenerator;
use crate::puzzle::{recompute_output, Puzzle};

/// Outcome of one named invariant check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// What was checked
    pub name: String,
    /// Whether the invariant held
    pub passed: bool,
    /// The measured quantity behind the verdict
    pub details: String,
}

impl CheckReport {
    fn new(name: &str, passed: bool, details: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            passed,
            details: details.into(),
        }
    }
}

/// Check whether every report passed
#[must_use]
pub fn all_passed(reports: &[CheckReport]) -> bool {
    reports.iter().all(|r| r.passed)
}

/// Runs every invariant check against one seeded puzzle.
///
/// # Errors
///
/// Returns an error only if puzzle generation itself fails, which the
/// default configuration rules out.
pub fn run_self_check(seed: u64) -> TrainerResult<Vec<CheckReport>> {
    let mut generator = PuzzleGenerator::with_seed(PuzzleConfig::default(), seed)?;
    let puzzle = generator.generate()?;
    Ok(check_puzzle(&puzzle))
}

/// Runs every invariant check against an already built puzzle.
#[must_use]
pub fn check_puzzle(puzzle: &Puzzle) -> Vec<CheckReport> {
    let mut reports = Vec::new();

    let sum: f64 = puzzle.probabilities().iter().sum();
    reports.push(CheckReport::new(
        "softmax sums to one",
        (sum - 1.0).abs() < PROBABILITY_SUM_TOLERANCE,
        format!("sum = {sum:.12}"),
    ));

    let in_unit = puzzle.probabilities().iter().all(|&p| p > 0.0 && p <= 1.0);
    reports.push(CheckReport::new(
        "probabilities lie in (0, 1]",
        in_unit,
        format!("{} entries checked", puzzle.probabilities().len()),
    ));

    let self_dot = dot(puzzle.query(), puzzle.query()).unwrap_or(-1.0);
    reports.push(CheckReport::new(
        "query dotted with itself is non-negative",
        self_dot >= 0.0,
        format!("dot = {self_dot:.6}"),
    ));

    let n = puzzle.key_count();
    let shapes_ok = puzzle.scores().len() == n
        && puzzle.probabilities().len() == n
        && puzzle.values().iter().all(|v| v.len() == puzzle.dim_v())
        && puzzle.choices().len() == 3
        && puzzle.correct_choice() < puzzle.choices().len();
    reports.push(CheckReport::new(
        "shapes agree",
        shapes_ok,
        format!(
            "keys = {n}, dim_qk = {}, dim_v = {}",
            puzzle.dim_qk(),
            puzzle.dim_v()
        ),
    ));

    let recompute_distance = recompute_output(puzzle)
        .and_then(|recomputed| euclidean_distance(&recomputed, puzzle.output()))
        .unwrap_or(f64::INFINITY);
    reports.push(CheckReport::new(
        "output recomputes from probabilities and values",
        recompute_distance < OUTPUT_RECOMPUTE_TOLERANCE,
        format!("distance = {recompute_distance:.9}"),
    ));

    let rounded = puzzle.rounded_output();
    let matches: Vec<usize> = puzzle
        .choices()
        .iter()
        .enumerate()
        .filter_map(|(i, choice)| {
            let distance = euclidean_distance(choice, &rounded).ok()?;
            (distance < CHOICE_IDENTIFICATION_TOLERANCE).then_some(i)
        })
        .collect();
    reports.push(CheckReport::new(
        "exactly one choice matches the output",
        matches.as_slice() == [puzzle.correct_choice()],
        format!("matching choices = {matches:?}"),
    ));

    let best = puzzle.best_key_index();
    let best_is_max = puzzle
        .scores()
        .iter()
        .all(|&s| s <= puzzle.scores()[best]);
    reports.push(CheckReport::new(
        "argmax picks a highest-scoring key",
        best < n && best_is_max,
        format!("best key = {best}"),
    ));

    reports
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_check_passes_on_seeded_puzzle() {
        let reports = run_self_check(42).unwrap();
        assert_eq!(reports.len(), 7);
        assert!(all_passed(&reports), "failing reports: {reports:?}");
    }

    #[test]
    fn test_self_check_passes_across_many_seeds() {
        for seed in 0..25 {
            let reports = run_self_check(seed).unwrap();
            assert!(all_passed(&reports), "seed {seed}: {reports:?}");
        }
    }

    #[test]
    fn test_check_names_are_unique() {
        let reports = run_self_check(1).unwrap();
        let mut names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), reports.len());
    }

    #[test]
    fn test_all_passed_spots_a_failure() {
        let mut reports = run_self_check(2).unwrap();
        assert!(all_passed(&reports));
        reports[0].passed = false;
        assert!(!all_passed(&reports));
    }

    #[test]
    fn test_reports_serialize_for_presentation() {
        let reports = run_self_check(3).unwrap();
        let json = serde_json::to_string(&reports).unwrap();
        assert!(json.contains("softmax sums to one"));
    }
}
