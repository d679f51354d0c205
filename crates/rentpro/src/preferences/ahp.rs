//! AHP consistency engine.
//!
//! Pure functions that turn an ordered criteria list and a set of pairwise judgments
//! into priority weights and a consistency ratio. Nothing here performs I/O or keeps
//! state; every call builds its matrix from scratch.
//!
//! Two entry points exist:
//!
//! - [`evaluate`] is the permissive preview path. Unsupplied pairs default to equal
//!   importance and comparisons naming unknown criteria are skipped. Callers decide
//!   whether the result is meaningful via the completeness predicates in
//!   [`super::judgments`].
//! - [`evaluate_strict`] is the authoritative path used by the profile and
//!   recommendation services. It rejects malformed input and applies an acceptance
//!   threshold supplied by the caller.

use serde::{Deserialize, Serialize};

use super::comparison::{PairwiseComparison, SAATY_MAX, SAATY_MIN};
use super::criteria::CriteriaOrder;

/// Conventional acceptance bound for the consistency ratio.
///
/// Caller policy only: the engine functions below never consult it.
pub const CR_THRESHOLD: f64 = 0.10;

/// Saaty random index for matrix sizes 1 through 10.
const RANDOM_INDEX: [f64; 10] = [0.00, 0.00, 0.58, 0.90, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49];

const SCALE_TOLERANCE: f64 = 1e-9;

/// Random index for an `n×n` matrix, or `None` outside `1..=10`.
pub fn random_index(n: usize) -> Option<f64> {
    n.checked_sub(1)
        .and_then(|index| RANDOM_INDEX.get(index))
        .copied()
}

/// Square positive comparison matrix, rows and columns in criteria order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ComparisonMatrix {
    rows: Vec<Vec<f64>>,
}

impl ComparisonMatrix {
    /// `n×n` matrix of ones: every pair at equal importance.
    pub fn neutral(n: usize) -> Self {
        Self {
            rows: vec![vec![1.0; n]; n],
        }
    }

    /// Wrap arbitrary square rows. Returns `None` when the rows are ragged.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let n = rows.len();
        if rows.iter().all(|row| row.len() == n) {
            Some(Self { rows })
        } else {
            None
        }
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.rows[i][j]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Checks `A[i][i] == 1` and `A[i][j]·A[j][i] == 1` within `tolerance`.
    pub fn is_reciprocal(&self, tolerance: f64) -> bool {
        let n = self.size();
        (0..n).all(|i| {
            (self.rows[i][i] - 1.0).abs() <= tolerance
                && (0..n).all(|j| (self.rows[i][j] * self.rows[j][i] - 1.0).abs() <= tolerance)
        })
    }

    fn set_pair(&mut self, i: usize, j: usize, value: f64) {
        self.rows[i][j] = value;
        self.rows[j][i] = 1.0 / value;
    }
}

/// Build the reciprocal matrix `A` for `order` from the supplied judgments.
///
/// # Algorithm
/// Start from the neutral all-ones matrix. For each comparison of `a` over `b`,
/// set `A[i][j] = value` and `A[j][i] = 1/value`, where `i`/`j` are the positions of
/// `a`/`b` in `order`. Later comparisons for the same pair overwrite earlier ones.
///
/// # Edge Cases
/// - No comparisons: returns the neutral matrix
/// - Unknown criterion key: comparison skipped
/// - Self-comparison: skipped, the diagonal stays at 1
///
/// Values are expected inside `[1/9, 9]`; that boundary is owned by the caller.
pub fn build_reciprocal_matrix(
    order: &CriteriaOrder,
    comparisons: &[PairwiseComparison],
) -> ComparisonMatrix {
    let mut matrix = ComparisonMatrix::neutral(order.len());

    for comparison in comparisons {
        let (Some(i), Some(j)) = (
            order.index_of(&comparison.criterion_a_key),
            order.index_of(&comparison.criterion_b_key),
        ) else {
            continue;
        };
        if i == j {
            continue;
        }

        debug_assert!(
            comparison.value.is_finite()
                && comparison.value >= SAATY_MIN - SCALE_TOLERANCE
                && comparison.value <= SAATY_MAX + SCALE_TOLERANCE,
            "comparison value {} outside the Saaty scale",
            comparison.value
        );
        matrix.set_pair(i, j, comparison.value);
    }

    matrix
}

/// Priority weights by the row geometric-mean method.
///
/// # Algorithm
/// `g_i = exp(mean_j ln A[i][j])`, then `w_i = g_i / Σ g`.
///
/// Requires strictly positive entries. The result has one weight per row, sums to 1
/// and contains no zeros.
pub fn geometric_mean_weights(matrix: &ComparisonMatrix) -> Vec<f64> {
    let n = matrix.size();
    if n == 0 {
        return Vec::new();
    }

    let means: Vec<f64> = matrix
        .rows()
        .iter()
        .map(|row| {
            debug_assert!(row.iter().all(|value| *value > 0.0));
            let log_sum: f64 = row.iter().map(|value| value.ln()).sum();
            (log_sum / n as f64).exp()
        })
        .collect();

    let total: f64 = means.iter().sum();
    means.into_iter().map(|mean| mean / total).collect()
}

/// Estimate `λmax` as the mean of `(A·w)_i / w_i`.
///
/// Requires `weights.len() == matrix.size()` and no zero weight.
pub fn principal_eigenvalue_estimate(matrix: &ComparisonMatrix, weights: &[f64]) -> f64 {
    let n = matrix.size();
    debug_assert_eq!(weights.len(), n);
    if n == 0 {
        return 0.0;
    }

    let ratio_sum: f64 = matrix
        .rows()
        .iter()
        .zip(weights)
        .map(|(row, weight)| {
            let product: f64 = row.iter().zip(weights).map(|(a, w)| a * w).sum();
            product / weight
        })
        .sum();

    ratio_sum / n as f64
}

/// Consistency index and ratio for an `n×n` matrix with eigenvalue estimate `lambda_max`.
///
/// `CI = 0` for `n ≤ 2`, otherwise `(λmax − n)/(n − 1)`. `CR = 0` when the random
/// index is zero or undefined, otherwise `CI/RI`. Float noise below zero is clamped so
/// a perfectly consistent matrix reports exactly 0.
fn consistency_measures(n: usize, lambda_max: f64) -> (f64, f64) {
    let ci = if n <= 2 {
        0.0
    } else {
        ((lambda_max - n as f64) / (n as f64 - 1.0)).max(0.0)
    };
    let ri = random_index(n).unwrap_or(0.0);
    let cr = if ri == 0.0 { 0.0 } else { ci / ri };
    (ci, cr)
}

/// Consistency ratio of the judgments, composed from the functions above.
pub fn consistency_ratio(order: &CriteriaOrder, comparisons: &[PairwiseComparison]) -> f64 {
    evaluate(order, comparisons).consistency_ratio
}

/// Output of the preview engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AhpPreview {
    /// Same order as the criteria list, sums to 1.
    pub weights: Vec<f64>,
    pub consistency_ratio: f64,
}

/// Weights and consistency ratio with missing pairs treated as equal importance.
pub fn evaluate(order: &CriteriaOrder, comparisons: &[PairwiseComparison]) -> AhpPreview {
    let matrix = build_reciprocal_matrix(order, comparisons);
    let weights = geometric_mean_weights(&matrix);
    let lambda_max = principal_eigenvalue_estimate(&matrix, &weights);
    let (_, consistency_ratio) = consistency_measures(order.len(), lambda_max);

    AhpPreview {
        weights,
        consistency_ratio,
    }
}

/// Weight assigned to a single criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionWeight {
    pub key: String,
    pub weight: f64,
}

/// Full authoritative AHP outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AhpResult {
    pub criteria_keys: Vec<String>,
    pub weights: Vec<CriterionWeight>,
    pub lambda_max: f64,
    pub ci: f64,
    pub cr: f64,
    pub accepted: bool,
}

impl AhpResult {
    pub fn weight_of(&self, key: &str) -> Option<f64> {
        self.weights
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.weight)
    }

    pub fn weight_vector(&self) -> Vec<f64> {
        self.weights.iter().map(|entry| entry.weight).collect()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AhpError {
    #[error("need at least 2 criteria for AHP (got {count})")]
    TooFewCriteria { count: usize },
    #[error("random index not defined for n={count}")]
    UnsupportedSize { count: usize },
    #[error("unknown criterion key(s): {a}, {b}")]
    UnknownCriterion { a: String, b: String },
    #[error("self-comparisons are not allowed ({key})")]
    SelfComparison { key: String },
    #[error("pairwise value {value} must lie within the Saaty scale [1/9, 9]")]
    InvalidValue { value: f64 },
}

/// Authoritative evaluation: validates the judgments, then accepts when `cr < threshold`.
pub fn evaluate_strict(
    order: &CriteriaOrder,
    comparisons: &[PairwiseComparison],
    threshold: f64,
) -> Result<AhpResult, AhpError> {
    let n = order.len();
    if n < 2 {
        return Err(AhpError::TooFewCriteria { count: n });
    }
    if random_index(n).is_none() {
        return Err(AhpError::UnsupportedSize { count: n });
    }

    for comparison in comparisons {
        let a = &comparison.criterion_a_key;
        let b = &comparison.criterion_b_key;
        if !order.contains(a) || !order.contains(b) {
            return Err(AhpError::UnknownCriterion {
                a: a.clone(),
                b: b.clone(),
            });
        }
        if a == b {
            return Err(AhpError::SelfComparison { key: a.clone() });
        }
        let value = comparison.value;
        if !value.is_finite()
            || value < SAATY_MIN - SCALE_TOLERANCE
            || value > SAATY_MAX + SCALE_TOLERANCE
        {
            return Err(AhpError::InvalidValue { value });
        }
    }

    let matrix = build_reciprocal_matrix(order, comparisons);
    let weights = geometric_mean_weights(&matrix);
    let lambda_max = principal_eigenvalue_estimate(&matrix, &weights);
    let (ci, cr) = consistency_measures(n, lambda_max);

    Ok(AhpResult {
        criteria_keys: order.keys().to_vec(),
        weights: order
            .keys()
            .iter()
            .zip(&weights)
            .map(|(key, weight)| CriterionWeight {
                key: key.clone(),
                weight: *weight,
            })
            .collect(),
        lambda_max,
        ci,
        cr,
        accepted: cr < threshold,
    })
}
