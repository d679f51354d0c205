use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::comparison::{clamp_saaty, is_within_saaty_scale, PairwiseComparison};
use super::criteria::CriteriaOrder;

/// Rejection raised while validating a submitted comparison batch.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ComparisonBatchError {
    #[error("at least one pairwise comparison is required")]
    Empty,
    #[error("not enough active criteria to compare")]
    NotEnoughCriteria,
    #[error("criterion_a_key and criterion_b_key must be different ({key})")]
    SelfComparison { key: String },
    #[error("value {value} must be within Saaty scale range [1/9, 9]")]
    OutOfScale { value: f64 },
    #[error("unknown criterion key(s): {a}, {b}")]
    UnknownCriterion { a: String, b: String },
    #[error("pairwise comparisons must cover all criterion pairs exactly once")]
    Coverage {
        expected_pair_count: usize,
        provided_pair_count: usize,
        missing_pairs: Vec<[String; 2]>,
    },
    #[error("duplicate pairwise comparison in payload ({a}, {b})")]
    Duplicate { a: String, b: String },
}

/// Authoritative validation of a full comparison batch.
///
/// Each record must name two distinct known criteria with a value on the Saaty
/// scale, and the batch must cover every unordered pair exactly once. Accepted
/// records are rewritten so `criterion_a_key` precedes `criterion_b_key` in
/// `order` (flipped pairs take the reciprocal value) and returned in pair order.
pub fn validate_batch(
    order: &CriteriaOrder,
    comparisons: &[PairwiseComparison],
) -> Result<Vec<PairwiseComparison>, ComparisonBatchError> {
    if comparisons.is_empty() {
        return Err(ComparisonBatchError::Empty);
    }

    for comparison in comparisons {
        if comparison.criterion_a_key == comparison.criterion_b_key {
            return Err(ComparisonBatchError::SelfComparison {
                key: comparison.criterion_a_key.clone(),
            });
        }
        if !is_within_saaty_scale(comparison.value) {
            return Err(ComparisonBatchError::OutOfScale {
                value: comparison.value,
            });
        }
    }

    if order.len() < 2 {
        return Err(ComparisonBatchError::NotEnoughCriteria);
    }

    let mut positions = Vec::with_capacity(comparisons.len());
    for comparison in comparisons {
        match (
            order.index_of(&comparison.criterion_a_key),
            order.index_of(&comparison.criterion_b_key),
        ) {
            (Some(i), Some(j)) => positions.push((i, j)),
            _ => {
                return Err(ComparisonBatchError::UnknownCriterion {
                    a: comparison.criterion_a_key.clone(),
                    b: comparison.criterion_b_key.clone(),
                })
            }
        }
    }

    let provided: BTreeSet<(usize, usize)> = positions
        .iter()
        .map(|&(i, j)| (i.min(j), i.max(j)))
        .collect();
    let keys = order.keys();
    let mut missing_pairs = Vec::new();
    for i in 0..keys.len() {
        for j in i + 1..keys.len() {
            if !provided.contains(&(i, j)) {
                missing_pairs.push([keys[i].clone(), keys[j].clone()]);
            }
        }
    }
    if !missing_pairs.is_empty() {
        return Err(ComparisonBatchError::Coverage {
            expected_pair_count: order.pair_count(),
            provided_pair_count: provided.len(),
            missing_pairs,
        });
    }

    let mut canonical: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    for (comparison, &(i, j)) in comparisons.iter().zip(&positions) {
        let (slot, value) = if i < j {
            ((i, j), comparison.value)
        } else {
            ((j, i), clamp_saaty(1.0 / comparison.value))
        };
        if canonical.insert(slot, value).is_some() {
            return Err(ComparisonBatchError::Duplicate {
                a: keys[slot.0].clone(),
                b: keys[slot.1].clone(),
            });
        }
    }

    Ok(canonical
        .into_iter()
        .map(|((i, j), value)| PairwiseComparison::new(keys[i].clone(), keys[j].clone(), value))
        .collect())
}
