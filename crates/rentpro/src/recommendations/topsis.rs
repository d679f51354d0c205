//! TOPSIS ranking over a decision matrix weighted by AHP priorities.

use serde::Serialize;

/// Upper bound of the what-if price boost (+60%).
pub const MAX_PRICE_BOOST: f64 = 0.6;

/// Ranked alternative: `index` points back into the decision matrix rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopsisScore {
    pub index: usize,
    /// Closeness coefficient in `[0, 1]`.
    pub score: f64,
    pub d_best: f64,
    pub d_worst: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TopsisError {
    #[error("weights/is_benefit length must match number of criteria ({expected}), got {weights} weights and {benefit} benefit flags")]
    CriteriaMismatch {
        expected: usize,
        weights: usize,
        benefit: usize,
    },
    #[error("decision matrix row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
}

/// Rank the rows of `matrix` (alternatives × criteria).
///
/// Columns are vector-normalized (a zero column keeps norm 1), multiplied by
/// `weights`, and compared against the ideal best and worst values, which depend on
/// whether the criterion is a benefit or a cost. The closeness coefficient is
/// `d_worst / (d_best + d_worst)`, or 0 when both distances are zero. Results are
/// ordered by score, highest first; equal scores keep their row order.
pub fn topsis_rank(
    matrix: &[Vec<f64>],
    weights: &[f64],
    is_benefit: &[bool],
) -> Result<Vec<TopsisScore>, TopsisError> {
    let Some(first) = matrix.first() else {
        return Ok(Vec::new());
    };
    let n = first.len();

    if weights.len() != n || is_benefit.len() != n {
        return Err(TopsisError::CriteriaMismatch {
            expected: n,
            weights: weights.len(),
            benefit: is_benefit.len(),
        });
    }
    if let Some((row, values)) = matrix
        .iter()
        .enumerate()
        .find(|(_, values)| values.len() != n)
    {
        return Err(TopsisError::RaggedRow {
            row,
            found: values.len(),
            expected: n,
        });
    }

    let norms: Vec<f64> = (0..n)
        .map(|j| {
            let sum: f64 = matrix.iter().map(|row| row[j] * row[j]).sum();
            if sum > 0.0 {
                sum.sqrt()
            } else {
                1.0
            }
        })
        .collect();

    let weighted: Vec<Vec<f64>> = matrix
        .iter()
        .map(|row| (0..n).map(|j| row[j] / norms[j] * weights[j]).collect())
        .collect();

    let mut ideal_best = Vec::with_capacity(n);
    let mut ideal_worst = Vec::with_capacity(n);
    for j in 0..n {
        let column = weighted.iter().map(|row| row[j]);
        let high = column.clone().fold(f64::NEG_INFINITY, f64::max);
        let low = column.fold(f64::INFINITY, f64::min);
        if is_benefit[j] {
            ideal_best.push(high);
            ideal_worst.push(low);
        } else {
            ideal_best.push(low);
            ideal_worst.push(high);
        }
    }

    let mut scores: Vec<TopsisScore> = weighted
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let d_best = distance(row, &ideal_best);
            let d_worst = distance(row, &ideal_worst);
            let denominator = d_best + d_worst;
            let score = if denominator > 0.0 {
                d_worst / denominator
            } else {
                0.0
            };
            TopsisScore {
                index,
                score,
                d_best,
                d_worst,
            }
        })
        .collect();

    scores.sort_by(|left, right| right.score.total_cmp(&left.score));
    Ok(scores)
}

fn distance(row: &[f64], ideal: &[f64]) -> f64 {
    row.iter()
        .zip(ideal)
        .map(|(value, target)| (value - target).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// What-if rerank: raise the `price` weight by `boost` (clamped to `[0, 0.6]`) and
/// renormalize. Weights are returned unchanged when `price` is not in `order`.
pub fn apply_price_boost(order: &[String], weights: &[f64], boost: f64) -> Vec<f64> {
    let Some(index) = order.iter().position(|key| key == "price") else {
        return weights.to_vec();
    };
    let boost = if boost.is_finite() {
        boost.clamp(0.0, MAX_PRICE_BOOST)
    } else {
        0.0
    };

    let mut next = weights.to_vec();
    if let Some(price) = next.get_mut(index) {
        *price *= 1.0 + boost;
    }
    let total: f64 = next.iter().sum();
    if total > 0.0 {
        next.iter_mut().for_each(|weight| *weight /= total);
    }
    next
}
