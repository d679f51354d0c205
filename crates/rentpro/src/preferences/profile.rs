use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ahp::{evaluate_strict, AhpError, AhpResult};
use super::comparison::PairwiseComparison;
use super::criteria::CriteriaOrder;
use super::validation::{validate_batch, ComparisonBatchError};
use crate::config::AnalysisConfig;

pub const DEFAULT_PROFILE_NAME: &str = "My preferences";
pub const MAX_PROFILE_NAME_LEN: usize = 100;

/// Caller identity asserted by the upstream gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted preference profile: a name plus the canonical comparison set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceProfile {
    pub user_id: UserId,
    pub name: String,
    pub comparisons: Vec<PairwiseComparison>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PreferenceProfile {
    pub fn has_comparisons(&self) -> bool {
        !self.comparisons.is_empty()
    }
}

/// Storage abstraction so the service can be exercised in isolation.
pub trait ProfileRepository: Send + Sync {
    fn fetch(&self, user: &UserId) -> Result<Option<PreferenceProfile>, RepositoryError>;
    fn save(&self, profile: PreferenceProfile) -> Result<PreferenceProfile, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileServiceError {
    #[error("preference profile not found; create it via PUT /api/v1/preference-profiles/me")]
    NotFound,
    #[error("profile name must be between 1 and 100 characters")]
    InvalidName,
    #[error(transparent)]
    Comparisons(#[from] ComparisonBatchError),
    #[error(transparent)]
    Ahp(#[from] AhpError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Authoritative owner of preference profiles and their comparison sets.
pub struct PreferenceProfileService<R> {
    repository: Arc<R>,
    order: CriteriaOrder,
    config: AnalysisConfig,
}

impl<R> PreferenceProfileService<R>
where
    R: ProfileRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: AnalysisConfig) -> Self {
        Self::with_order(repository, CriteriaOrder::standard(), config)
    }

    pub fn with_order(repository: Arc<R>, order: CriteriaOrder, config: AnalysisConfig) -> Self {
        Self {
            repository,
            order,
            config,
        }
    }

    pub fn order(&self) -> &CriteriaOrder {
        &self.order
    }

    pub fn threshold(&self) -> f64 {
        self.config.cr_threshold
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Create the caller's profile, or rename it when `name` is given.
    pub fn upsert_profile(
        &self,
        user: &UserId,
        name: Option<&str>,
    ) -> Result<PreferenceProfile, ProfileServiceError> {
        let name = name.map(normalize_name).transpose()?;

        let profile = match self.repository.fetch(user)? {
            Some(mut existing) => {
                if let Some(name) = name {
                    existing.name = name;
                    existing.updated_at = Some(Utc::now());
                }
                existing
            }
            None => {
                info!(user = %user, "creating preference profile");
                PreferenceProfile {
                    user_id: user.clone(),
                    name: name.unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string()),
                    comparisons: Vec::new(),
                    created_at: Utc::now(),
                    updated_at: None,
                }
            }
        };

        Ok(self.repository.save(profile)?)
    }

    pub fn get(&self, user: &UserId) -> Result<PreferenceProfile, ProfileServiceError> {
        self.repository
            .fetch(user)?
            .ok_or(ProfileServiceError::NotFound)
    }

    /// Validate a full batch and replace the stored comparisons.
    ///
    /// Consistency is not enforced here; it is checked whenever the weights are used.
    pub fn replace_comparisons(
        &self,
        user: &UserId,
        comparisons: &[PairwiseComparison],
    ) -> Result<PreferenceProfile, ProfileServiceError> {
        let mut profile = self.get(user)?;
        let canonical = validate_batch(&self.order, comparisons)?;
        debug!(user = %user, pairs = canonical.len(), "replacing pairwise comparisons");

        profile.comparisons = canonical;
        profile.updated_at = Some(Utc::now());
        Ok(self.repository.save(profile)?)
    }

    /// Run the authoritative AHP check against the stored comparisons.
    pub fn assess(&self, profile: &PreferenceProfile) -> Result<AhpResult, ProfileServiceError> {
        Ok(evaluate_strict(
            &self.order,
            &profile.comparisons,
            self.config.cr_threshold,
        )?)
    }
}

fn normalize_name(raw: &str) -> Result<String, ProfileServiceError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_PROFILE_NAME_LEN {
        return Err(ProfileServiceError::InvalidName);
    }
    Ok(trimmed.to_string())
}
