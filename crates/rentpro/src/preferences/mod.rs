//! Renter preference capture and AHP consistency checking.
//!
//! The engine in [`ahp`] is pure and shared by two callers: the interactive preview and
//! submit gate used while a renter edits judgments, and the authoritative profile service
//! that stores comparison sets and re-validates them whenever weights are consumed.

pub mod ahp;
pub mod comparison;
pub mod contradictions;
pub mod criteria;
pub mod judgments;
pub mod preview;
pub mod profile;
pub mod router;
pub mod submission;
pub mod validation;

#[cfg(test)]
mod tests;

pub use ahp::{
    build_reciprocal_matrix, consistency_ratio, evaluate, evaluate_strict,
    geometric_mean_weights, principal_eigenvalue_estimate, random_index, AhpError, AhpPreview,
    AhpResult, ComparisonMatrix, CriterionWeight, CR_THRESHOLD,
};
pub use comparison::{clamp_saaty, Direction, PairJudgment, PairwiseComparison};
pub use contradictions::{analyze_contradictions, Contradiction};
pub use criteria::{CriteriaOrder, CriteriaOrderError, Criterion};
pub use judgments::{ImportanceSliders, PairwiseJudgments, PreferenceInput};
pub use preview::{
    compute_preview, GateBlock, GateDecision, PreviewTracker, Revision, SubmissionGate,
    PREVIEW_DEBOUNCE,
};
pub use profile::{
    PreferenceProfile, PreferenceProfileService, ProfileRepository, ProfileServiceError,
    RepositoryError, UserId,
};
pub use router::preference_router;
pub use submission::{
    AuthorityRejection, PreferenceAuthority, PreferenceSubmitter, ServiceAuthority,
    SubmissionError, SubmissionReceipt,
};
pub use validation::{validate_batch, ComparisonBatchError};
