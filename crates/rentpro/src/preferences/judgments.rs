//! Caller-owned preference input.
//!
//! Two input modes feed the engine: explicit pairwise slider judgments, and a simple
//! importance score per criterion. Both expose a strict completeness predicate
//! (used to decide whether a CR is worth showing) and a permissive conversion to
//! comparison records (missing entries default to equal importance).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::comparison::{clamp_saaty, Direction, PairJudgment, PairwiseComparison};
use super::criteria::CriteriaOrder;

/// A stored slider judgment for one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgmentEntry {
    pub criterion_a_key: String,
    pub criterion_b_key: String,
    pub direction: Direction,
    pub intensity: f64,
}

impl JudgmentEntry {
    pub fn judgment(&self) -> PairJudgment {
        PairJudgment::new(self.direction, self.intensity)
    }

    fn matches(&self, a: &str, b: &str) -> bool {
        self.criterion_a_key == a && self.criterion_b_key == b
    }
}

/// Pairwise judgments keyed by unordered pair.
///
/// An entry may be stored in either orientation; lookups flip the direction when the
/// pair is requested the other way round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairwiseJudgments {
    entries: Vec<JudgmentEntry>,
}

impl PairwiseJudgments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every pair of `order` at equal importance, the initial slider state.
    pub fn all_equal(order: &CriteriaOrder) -> Self {
        let mut judgments = Self::new();
        for (a, b) in order.pairs() {
            judgments.set(a, b, PairJudgment::equal());
        }
        judgments
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[JudgmentEntry] {
        &self.entries
    }

    /// Record the judgment of `a` against `b`, replacing any entry for the pair.
    pub fn set(&mut self, a: &str, b: &str, judgment: PairJudgment) {
        self.remove(a, b);
        self.entries.push(JudgmentEntry {
            criterion_a_key: a.to_string(),
            criterion_b_key: b.to_string(),
            direction: judgment.direction,
            intensity: judgment.intensity,
        });
    }

    pub fn get(&self, a: &str, b: &str) -> Option<PairJudgment> {
        self.entries.iter().find_map(|entry| {
            if entry.matches(a, b) {
                Some(entry.judgment())
            } else if entry.matches(b, a) {
                Some(entry.judgment().flipped())
            } else {
                None
            }
        })
    }

    pub fn remove(&mut self, a: &str, b: &str) -> Option<PairJudgment> {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.matches(a, b) || entry.matches(b, a))?;
        let removed = self.entries.remove(position);
        Some(if removed.matches(a, b) {
            removed.judgment()
        } else {
            removed.judgment().flipped()
        })
    }

    /// True only when every pair of `order` has an explicit judgment with an
    /// intensity in `[1, 9]`.
    pub fn is_complete(&self, order: &CriteriaOrder) -> bool {
        order.pairs().into_iter().all(|(a, b)| {
            self.get(a, b)
                .is_some_and(|judgment| judgment.has_valid_intensity())
        })
    }

    /// One comparison per pair in `order`; unset pairs become equal importance.
    pub fn to_comparisons(&self, order: &CriteriaOrder) -> Vec<PairwiseComparison> {
        order
            .pairs()
            .into_iter()
            .map(|(a, b)| {
                let judgment = self.get(a, b).unwrap_or_default();
                PairwiseComparison::from_judgment(a, b, judgment)
            })
            .collect()
    }
}

/// Importance score per criterion on a 1–9 scale.
///
/// Pair values derive from score ratios, so the resulting matrix is always
/// perfectly consistent (up to clamping).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportanceSliders {
    scores: BTreeMap<String, f64>,
}

impl ImportanceSliders {
    pub const DEFAULT_SCORE: f64 = 5.0;

    pub fn uniform(order: &CriteriaOrder, score: f64) -> Self {
        Self {
            scores: order
                .keys()
                .iter()
                .map(|key| (key.clone(), score))
                .collect(),
        }
    }

    pub fn set(&mut self, key: &str, score: f64) {
        self.scores.insert(key.to_string(), score);
    }

    pub fn score(&self, key: &str) -> Option<f64> {
        self.scores.get(key).copied()
    }

    pub fn is_complete(&self, order: &CriteriaOrder) -> bool {
        order.keys().iter().all(|key| {
            self.score(key)
                .is_some_and(|score| score.is_finite() && (1.0..=9.0).contains(&score))
        })
    }

    pub fn to_comparisons(&self, order: &CriteriaOrder) -> Vec<PairwiseComparison> {
        order
            .pairs()
            .into_iter()
            .map(|(a, b)| {
                let wa = self.score(a).unwrap_or(1.0);
                let wb = self.score(b).unwrap_or(1.0);
                PairwiseComparison::new(a, b, clamp_saaty(wa / wb))
            })
            .collect()
    }
}

/// The active input mode of the preferences screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PreferenceInput {
    Pairwise { judgments: PairwiseJudgments },
    Sliders { importance: ImportanceSliders },
}

impl PreferenceInput {
    pub fn is_pairwise(&self) -> bool {
        matches!(self, PreferenceInput::Pairwise { .. })
    }

    pub fn is_complete(&self, order: &CriteriaOrder) -> bool {
        match self {
            PreferenceInput::Pairwise { judgments } => judgments.is_complete(order),
            PreferenceInput::Sliders { importance } => importance.is_complete(order),
        }
    }

    pub fn to_comparisons(&self, order: &CriteriaOrder) -> Vec<PairwiseComparison> {
        match self {
            PreferenceInput::Pairwise { judgments } => judgments.to_comparisons(order),
            PreferenceInput::Sliders { importance } => importance.to_comparisons(order),
        }
    }
}

impl From<PairwiseJudgments> for PreferenceInput {
    fn from(judgments: PairwiseJudgments) -> Self {
        PreferenceInput::Pairwise { judgments }
    }
}

impl From<ImportanceSliders> for PreferenceInput {
    fn from(importance: ImportanceSliders) -> Self {
        PreferenceInput::Sliders { importance }
    }
}
