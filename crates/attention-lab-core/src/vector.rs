//! Vector math primitives.
//!
//! Small, allocation-light helpers over `&[f64]` slices. Everything here is
//! pure and deterministic; the fallible functions return [`MathError`] rather
//! than panicking so that callers can keep dimension handling explicit.
//!
//! Components are `f64` throughout. The probability invariants downstream
//! (softmax sums to one within `1e-9`) sit below `f32` resolution.

use crate::error::{MathError, MathResult};

/// Computes the dot product of two equal-length vectors.
///
/// # Errors
///
/// Returns [`MathError::DimensionMismatch`] if the lengths differ.
pub fn dot(a: &[f64], b: &[f64]) -> MathResult<f64> {
    if a.len() != b.len() {
        return Err(MathError::dimension_mismatch(a.len(), b.len()));
    }
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x * y).sum())
}

/// Computes a numerically stable softmax.
///
/// The maximum score is subtracted before exponentiating, so large scores
/// cannot overflow. The result sums to one within floating tolerance and
/// every entry is strictly positive.
///
/// # Errors
///
/// Returns [`MathError::EmptyInput`] if `scores` is empty.
pub fn softmax(scores: &[f64]) -> MathResult<Vec<f64>> {
    if scores.is_empty() {
        return Err(MathError::empty_input("softmax over zero scores"));
    }
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    Ok(exps.into_iter().map(|e| e / sum).collect())
}

/// Computes the Euclidean distance between two equal-length vectors.
///
/// # Errors
///
/// Returns [`MathError::DimensionMismatch`] if the lengths differ.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> MathResult<f64> {
    if a.len() != b.len() {
        return Err(MathError::dimension_mismatch(a.len(), b.len()));
    }
    let sum_sq: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum();
    Ok(sum_sq.sqrt())
}

/// Rounds a single value to `precision` decimal digits.
#[must_use]
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// Rounds each component to `precision` decimal digits.
///
/// Used for display and choice generation only. Ground-truth vectors are
/// kept unrounded so that rounding error never compounds into comparisons.
#[must_use]
pub fn round_vec(v: &[f64], precision: u32) -> Vec<f64> {
    v.iter().map(|&x| round_to(x, precision)).collect()
}

/// Returns the index of the first occurrence of the maximum value.
///
/// Ties resolve to the lowest index. Returns `None` for an empty slice.
#[must_use]
pub fn argmax(v: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &x) in v.iter().enumerate() {
        match best {
            Some((_, max)) if x <= max => {}
            _ => best = Some((i, x)),
        }
    }
    best.map(|(i, _)| i)
}

/// Rescales non-negative values into a probability distribution.
///
/// Negative components are clamped to zero before rescaling. A non-positive
/// total yields the uniform distribution, so the result always sums to one
/// for non-empty input.
#[must_use]
pub fn normalize(v: &[f64]) -> Vec<f64> {
    if v.is_empty() {
        return Vec::new();
    }
    let clamped: Vec<f64> = v.iter().map(|&x| x.max(0.0)).collect();
    let sum: f64 = clamped.iter().sum();
    if sum <= 0.0 {
        let uniform = 1.0 / v.len() as f64;
        return vec![uniform; v.len()];
    }
    clamped.into_iter().map(|x| x / sum).collect()
}

/// Computes the weighted sum of vectors: `Σ weights[i] * vectors[i]`.
///
/// Every vector must share the dimension of the first one.
///
/// # Errors
///
/// Returns [`MathError::EmptyInput`] if `vectors` is empty, and
/// [`MathError::DimensionMismatch`] if `weights` and `vectors` disagree in
/// count or the vectors disagree in dimension.
pub fn weighted_sum(weights: &[f64], vectors: &[Vec<f64>]) -> MathResult<Vec<f64>> {
    if vectors.is_empty() {
        return Err(MathError::empty_input("weighted sum over zero vectors"));
    }
    if weights.len() != vectors.len() {
        return Err(MathError::dimension_mismatch(vectors.len(), weights.len()));
    }
    let dim = vectors[0].len();
    let mut out = vec![0.0; dim];
    for (w, v) in weights.iter().zip(vectors.iter()) {
        if v.len() != dim {
            return Err(MathError::dimension_mismatch(dim, v.len()));
        }
        for (o, x) in out.iter_mut().zip(v.iter()) {
            *o += w * x;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_dot_basic() {
        let result = dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        assert_relative_eq!(result, 32.0);
    }

    #[test]
    fn test_dot_with_self_is_non_negative() {
        let v = [-2.0, 0.5, -1.5, 3.0];
        assert!(dot(&v, &v).unwrap() >= 0.0);
    }

    #[test]
    fn test_dot_dimension_mismatch() {
        let err = dot(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert_eq!(err, MathError::dimension_mismatch(2, 1));
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        let sum: f64 = probs.iter().sum();
        assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-9);
        assert!(probs.iter().all(|&p| p > 0.0 && p <= 1.0));
    }

    #[test]
    fn test_softmax_equal_scores_are_uniform() {
        let probs = softmax(&[2.0, 2.0]).unwrap();
        assert_relative_eq!(probs[0], 0.5);
        assert_relative_eq!(probs[1], 0.5);
    }

    #[test]
    fn test_softmax_is_shift_invariant() {
        let a = softmax(&[1.0, 2.0, 3.0]).unwrap();
        let b = softmax(&[1001.0, 1002.0, 1003.0]).unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_softmax_survives_large_scores() {
        let probs = softmax(&[1000.0, 1000.0]).unwrap();
        assert_relative_eq!(probs[0], 0.5);
    }

    #[test]
    fn test_softmax_empty_input() {
        assert!(matches!(
            softmax(&[]).unwrap_err(),
            MathError::EmptyInput(_)
        ));
    }

    #[test]
    fn test_euclidean_distance_basic() {
        let d = euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]).unwrap();
        assert_relative_eq!(d, 5.0);
    }

    #[test]
    fn test_euclidean_distance_of_identical_vectors() {
        let v = [1.5, -2.5, 0.25];
        assert_relative_eq!(euclidean_distance(&v, &v).unwrap(), 0.0);
    }

    #[test]
    fn test_round_vec() {
        let rounded = round_vec(&[1.005, -2.3449, 0.5], 2);
        assert_relative_eq!(rounded[1], -2.34);
        assert_relative_eq!(rounded[2], 0.5);
    }

    #[test]
    fn test_round_to_zero_precision() {
        assert_relative_eq!(round_to(2.6, 0), 3.0);
        assert_relative_eq!(round_to(-1.4, 0), -1.0);
    }

    #[test]
    fn test_argmax_first_occurrence_wins() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(argmax(&[5.0]), Some(0));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_normalize_rescales() {
        let n = normalize(&[1.0, 3.0]);
        assert_relative_eq!(n[0], 0.25);
        assert_relative_eq!(n[1], 0.75);
    }

    #[test]
    fn test_normalize_clamps_negatives() {
        let n = normalize(&[-1.0, 2.0]);
        assert_relative_eq!(n[0], 0.0);
        assert_relative_eq!(n[1], 1.0);
    }

    #[test]
    fn test_normalize_zero_sum_is_uniform() {
        let n = normalize(&[0.0, 0.0, 0.0, 0.0]);
        for &p in &n {
            assert_relative_eq!(p, 0.25);
        }
    }

    #[test]
    fn test_weighted_sum_basic() {
        let out = weighted_sum(
            &[0.5, 0.5],
            &[vec![2.0, 0.0, 4.0], vec![0.0, 2.0, 4.0]],
        )
        .unwrap();
        assert_relative_eq!(out[0], 1.0);
        assert_relative_eq!(out[1], 1.0);
        assert_relative_eq!(out[2], 4.0);
    }

    #[test]
    fn test_weighted_sum_rejects_ragged_vectors() {
        let err = weighted_sum(&[1.0, 1.0], &[vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert_eq!(err, MathError::dimension_mismatch(2, 1));
    }

    #[test]
    fn test_weighted_sum_rejects_empty() {
        assert!(matches!(
            weighted_sum(&[], &[]).unwrap_err(),
            MathError::EmptyInput(_)
        ));
    }
}
