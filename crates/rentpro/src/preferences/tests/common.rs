use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::AnalysisConfig;
use crate::preferences::comparison::{PairJudgment, PairwiseComparison};
use crate::preferences::criteria::CriteriaOrder;
use crate::preferences::judgments::PairwiseJudgments;
use crate::preferences::profile::{
    PreferenceProfile, PreferenceProfileService, ProfileRepository, RepositoryError, UserId,
};

pub(super) const TOLERANCE: f64 = 1e-9;

pub(super) fn order() -> CriteriaOrder {
    CriteriaOrder::standard()
}

pub(super) fn renter() -> UserId {
    UserId("renter-42".to_string())
}

/// Near-consistent judgments over the standard criteria, price dominant.
pub(super) fn near_consistent_comparisons() -> Vec<PairwiseComparison> {
    vec![
        PairwiseComparison::new("price", "size", 3.0),
        PairwiseComparison::new("price", "property_type", 5.0),
        PairwiseComparison::new("price", "area_score", 7.0),
        PairwiseComparison::new("size", "property_type", 2.0),
        PairwiseComparison::new("size", "area_score", 4.0),
        PairwiseComparison::new("property_type", "area_score", 2.0),
    ]
}

/// Every judgment at maximum intensity in a cycle: price > size > property_type >
/// area_score > price.
pub(super) fn cyclic_comparisons() -> Vec<PairwiseComparison> {
    vec![
        PairwiseComparison::new("price", "size", 9.0),
        PairwiseComparison::new("size", "property_type", 9.0),
        PairwiseComparison::new("property_type", "area_score", 9.0),
        PairwiseComparison::new("price", "area_score", 1.0 / 9.0),
        PairwiseComparison::new("price", "property_type", 1.0),
        PairwiseComparison::new("size", "area_score", 1.0),
    ]
}

pub(super) fn near_consistent_judgments() -> PairwiseJudgments {
    let mut judgments = PairwiseJudgments::new();
    judgments.set("price", "size", PairJudgment::favoring_a(3.0));
    judgments.set("price", "property_type", PairJudgment::favoring_a(5.0));
    judgments.set("price", "area_score", PairJudgment::favoring_a(7.0));
    judgments.set("size", "property_type", PairJudgment::favoring_a(2.0));
    judgments.set("size", "area_score", PairJudgment::favoring_a(4.0));
    judgments.set("property_type", "area_score", PairJudgment::favoring_a(2.0));
    judgments
}

pub(super) fn cyclic_judgments() -> PairwiseJudgments {
    let mut judgments = PairwiseJudgments::new();
    judgments.set("price", "size", PairJudgment::favoring_a(9.0));
    judgments.set("size", "property_type", PairJudgment::favoring_a(9.0));
    judgments.set("property_type", "area_score", PairJudgment::favoring_a(9.0));
    judgments.set("price", "area_score", PairJudgment::favoring_b(9.0));
    judgments.set("price", "property_type", PairJudgment::equal());
    judgments.set("size", "area_score", PairJudgment::equal());
    judgments
}

pub(super) fn build_service() -> (
    PreferenceProfileService<MemoryProfiles>,
    Arc<MemoryProfiles>,
) {
    let repository = Arc::new(MemoryProfiles::default());
    let service = PreferenceProfileService::new(repository.clone(), AnalysisConfig::default());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryProfiles {
    pub(super) profiles: Arc<Mutex<HashMap<UserId, PreferenceProfile>>>,
}

impl ProfileRepository for MemoryProfiles {
    fn fetch(&self, user: &UserId) -> Result<Option<PreferenceProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.get(user).cloned())
    }

    fn save(&self, profile: PreferenceProfile) -> Result<PreferenceProfile, RepositoryError> {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        guard.insert(profile.user_id.clone(), profile.clone());
        Ok(profile)
    }
}

pub(super) struct UnavailableProfiles;

impl ProfileRepository for UnavailableProfiles {
    fn fetch(&self, _user: &UserId) -> Result<Option<PreferenceProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save(&self, _profile: PreferenceProfile) -> Result<PreferenceProfile, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
