use std::time::Duration;

use serde::Serialize;

use super::ahp::{evaluate, AhpPreview};
use super::contradictions::{analyze_contradictions, Contradiction};
use super::criteria::CriteriaOrder;
use super::judgments::PreferenceInput;

/// Quiet period callers wait after the last edit before recomputing a preview.
pub const PREVIEW_DEBOUNCE: Duration = Duration::from_millis(200);

/// Local CR preview, or `None` while the input is incomplete.
///
/// An incomplete judgment set would produce a CR computed from silently defaulted
/// pairs, so it is never surfaced.
pub fn compute_preview(order: &CriteriaOrder, input: &PreferenceInput) -> Option<AhpPreview> {
    if !input.is_complete(order) {
        return None;
    }
    let comparisons = input.to_comparisons(order);
    Some(evaluate(order, &comparisons))
}

/// Reason the local gate refuses a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum GateBlock {
    EmptyProfileName,
    IncompleteInput,
    InconsistentJudgments { consistency_ratio: f64, threshold: f64 },
}

impl GateBlock {
    pub fn describe(&self) -> String {
        match self {
            GateBlock::EmptyProfileName => "profile name must not be empty".to_string(),
            GateBlock::IncompleteInput => {
                "every criterion pair needs a direction and an intensity between 1 and 9"
                    .to_string()
            }
            GateBlock::InconsistentJudgments {
                consistency_ratio,
                threshold,
            } => format!(
                "consistency ratio {consistency_ratio:.3} is not below {threshold:.2}; revise the judgments"
            ),
        }
    }
}

/// Everything the preferences screen needs to render its submit state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateDecision {
    pub preview: Option<AhpPreview>,
    pub blocks: Vec<GateBlock>,
    pub contradictions: Vec<Contradiction>,
}

impl GateDecision {
    pub fn can_submit(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Client-side submit gate. Advisory only: the backend re-validates every submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmissionGate {
    threshold: f64,
}

impl SubmissionGate {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn evaluate(
        &self,
        order: &CriteriaOrder,
        profile_name: &str,
        input: &PreferenceInput,
    ) -> GateDecision {
        let mut blocks = Vec::new();
        if profile_name.trim().is_empty() {
            blocks.push(GateBlock::EmptyProfileName);
        }

        let preview = compute_preview(order, input);
        let mut contradictions = Vec::new();

        match &preview {
            None => blocks.push(GateBlock::IncompleteInput),
            Some(result) if result.consistency_ratio >= self.threshold => {
                blocks.push(GateBlock::InconsistentJudgments {
                    consistency_ratio: result.consistency_ratio,
                    threshold: self.threshold,
                });
                if input.is_pairwise() {
                    contradictions = analyze_contradictions(order, &input.to_comparisons(order));
                }
            }
            Some(_) => {}
        }

        GateDecision {
            preview,
            blocks,
            contradictions,
        }
    }
}

/// Monotonic token identifying one recompute request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Revision(u64);

/// Holds the latest preview and drops results from superseded requests.
#[derive(Debug, Default)]
pub struct PreviewTracker {
    latest: u64,
    current: Option<AhpPreview>,
}

impl PreviewTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new input snapshot; earlier revisions become stale.
    pub fn begin(&mut self) -> Revision {
        self.latest += 1;
        Revision(self.latest)
    }

    /// Store `result` if `revision` is still the newest. Returns whether it was kept.
    pub fn complete(&mut self, revision: Revision, result: Option<AhpPreview>) -> bool {
        if revision.0 != self.latest {
            return false;
        }
        self.current = result;
        true
    }

    pub fn current(&self) -> Option<&AhpPreview> {
        self.current.as_ref()
    }
}
