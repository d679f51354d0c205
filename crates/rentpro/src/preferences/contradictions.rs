//! Triad analysis pointing users at the judgments that break transitivity.

use serde::Serialize;

use super::ahp::build_reciprocal_matrix;
use super::comparison::PairwiseComparison;
use super::criteria::CriteriaOrder;

/// Number of triads reported back to the user.
pub const MAX_CONTRADICTIONS: usize = 2;

/// A triad whose judgments disagree, with the pair most worth revisiting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contradiction {
    pub score: f64,
    pub triad: [String; 3],
    pub suggest_pair: [String; 2],
}

fn safe_ln(value: f64) -> f64 {
    value.max(1e-12).ln()
}

/// Rank triads `(i < j < k)` by `|ln(a_ij · a_jk / a_ik)|`, highest first.
///
/// A consistent triad satisfies `a_ik = a_ij · a_jk` and scores 0. For each triad the
/// edge with the largest log-deviation from its transitive estimate is suggested;
/// on ties the later edge in `i–k`, `i–j`, `j–k` order wins. Fewer than three
/// criteria yield no triads.
pub fn analyze_contradictions(
    order: &CriteriaOrder,
    comparisons: &[PairwiseComparison],
) -> Vec<Contradiction> {
    let n = order.len();
    if n < 3 {
        return Vec::new();
    }

    let matrix = build_reciprocal_matrix(order, comparisons);
    let keys = order.keys();
    let mut conflicts = Vec::new();

    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                let aij = matrix.get(i, j);
                let ajk = matrix.get(j, k);
                let aik = matrix.get(i, k);

                let score = safe_ln((aij * ajk) / aik).abs();

                let candidates = [
                    (safe_ln(aik / (aij * ajk)).abs(), i, k),
                    (safe_ln(aij / (aik / ajk)).abs(), i, j),
                    (safe_ln(ajk / (aik / aij)).abs(), j, k),
                ];
                let (_, x, y) = candidates
                    .into_iter()
                    .reduce(|best, next| if next.0 >= best.0 { next } else { best })
                    .unwrap_or((0.0, i, k));

                conflicts.push(Contradiction {
                    score,
                    triad: [keys[i].clone(), keys[j].clone(), keys[k].clone()],
                    suggest_pair: [keys[x].clone(), keys[y].clone()],
                });
            }
        }
    }

    conflicts.sort_by(|left, right| right.score.total_cmp(&left.score));
    conflicts.truncate(MAX_CONTRADICTIONS);
    conflicts
}
