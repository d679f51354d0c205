//! Client-side submission: local gate first, then the remote authority decides.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use super::ahp::AhpPreview;
use super::comparison::PairwiseComparison;
use super::criteria::CriteriaOrder;
use super::judgments::PreferenceInput;
use super::preview::{GateBlock, SubmissionGate};
use super::profile::{PreferenceProfileService, ProfileRepository, ProfileServiceError, UserId};

pub const AHP_INCONSISTENT: &str = "AHP_INCONSISTENT";
pub const AHP_INCONSISTENT_MESSAGE: &str = "Comparisons are not consistent. Please revise them.";

/// Rejection returned by the system of record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthorityRejection {
    #[error("AHP_INCONSISTENT: {message} (cr {cr:.6}, threshold {threshold})")]
    AhpInconsistent {
        cr: f64,
        threshold: f64,
        message: String,
    },
    #[error("submission rejected: {0}")]
    Invalid(String),
    #[error("preference authority unavailable: {0}")]
    Unavailable(String),
}

/// Remote owner of persisted comparisons and the canonical accept/reject decision.
pub trait PreferenceAuthority: Send + Sync {
    fn submit(
        &self,
        profile_name: &str,
        comparisons: &[PairwiseComparison],
    ) -> Result<(), AuthorityRejection>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission blocked locally: {}", describe_blocks(.0))]
    Blocked(Vec<GateBlock>),
    #[error(transparent)]
    Rejected(#[from] AuthorityRejection),
}

fn describe_blocks(blocks: &[GateBlock]) -> String {
    blocks
        .iter()
        .map(GateBlock::describe)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Record of an accepted submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReceipt {
    pub comparisons: Vec<PairwiseComparison>,
    pub local_preview: Option<AhpPreview>,
}

/// Applies the local gate and forwards accepted input to the authority.
pub struct PreferenceSubmitter<A> {
    authority: Arc<A>,
    gate: SubmissionGate,
    order: CriteriaOrder,
}

impl<A> PreferenceSubmitter<A>
where
    A: PreferenceAuthority + 'static,
{
    pub fn new(authority: Arc<A>, gate: SubmissionGate, order: CriteriaOrder) -> Self {
        Self {
            authority,
            gate,
            order,
        }
    }

    pub fn submit(
        &self,
        profile_name: &str,
        input: &PreferenceInput,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let decision = self.gate.evaluate(&self.order, profile_name, input);
        if !decision.can_submit() {
            return Err(SubmissionError::Blocked(decision.blocks));
        }

        let comparisons = input.to_comparisons(&self.order);
        if let Err(rejection) = self.authority.submit(profile_name.trim(), &comparisons) {
            warn!(%rejection, "preference submission rejected by authority");
            return Err(rejection.into());
        }

        Ok(SubmissionReceipt {
            comparisons,
            local_preview: decision.preview,
        })
    }
}

/// In-process authority backed by the profile service.
pub struct ServiceAuthority<R> {
    profiles: Arc<PreferenceProfileService<R>>,
    user: UserId,
}

impl<R> ServiceAuthority<R>
where
    R: ProfileRepository + 'static,
{
    pub fn new(profiles: Arc<PreferenceProfileService<R>>, user: UserId) -> Self {
        Self { profiles, user }
    }
}

impl<R> PreferenceAuthority for ServiceAuthority<R>
where
    R: ProfileRepository + 'static,
{
    fn submit(
        &self,
        profile_name: &str,
        comparisons: &[PairwiseComparison],
    ) -> Result<(), AuthorityRejection> {
        self.profiles
            .upsert_profile(&self.user, Some(profile_name))
            .map_err(rejection_from)?;
        let profile = self
            .profiles
            .replace_comparisons(&self.user, comparisons)
            .map_err(rejection_from)?;
        let assessment = self.profiles.assess(&profile).map_err(rejection_from)?;

        if assessment.accepted {
            Ok(())
        } else {
            Err(AuthorityRejection::AhpInconsistent {
                cr: round6(assessment.cr),
                threshold: self.profiles.threshold(),
                message: AHP_INCONSISTENT_MESSAGE.to_string(),
            })
        }
    }
}

fn rejection_from(error: ProfileServiceError) -> AuthorityRejection {
    match error {
        ProfileServiceError::Repository(err) => AuthorityRejection::Unavailable(err.to_string()),
        other => AuthorityRejection::Invalid(other.to_string()),
    }
}

pub(crate) fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}
