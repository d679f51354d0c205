use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::ahp::AhpPreview;
use super::comparison::PairwiseComparison;
use super::contradictions::Contradiction;
use super::judgments::PreferenceInput;
use super::preview::{GateBlock, SubmissionGate};
use super::profile::{
    PreferenceProfileService, ProfileRepository, ProfileServiceError, UserId,
    DEFAULT_PROFILE_NAME,
};
use super::validation::ComparisonBatchError;

/// Header carrying the caller identity established by the upstream gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpsertRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ComparisonBatchRequest {
    pub comparisons: Vec<PairwiseComparison>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub profile_name: Option<String>,
    pub input: PreferenceInput,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub criteria_order: Vec<String>,
    pub threshold: f64,
    pub can_submit: bool,
    pub preview: Option<AhpPreview>,
    pub blocks: Vec<GateBlock>,
    pub contradictions: Vec<Contradiction>,
}

/// Router builder exposing the preference profile and preview endpoints.
pub fn preference_router<R>(service: Arc<PreferenceProfileService<R>>) -> Router
where
    R: ProfileRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/preference-profiles/me",
            put(upsert_handler::<R>).get(profile_handler::<R>),
        )
        .route(
            "/api/v1/preference-profiles/me/pairwise-comparisons",
            post(comparisons_handler::<R>),
        )
        .route("/api/v1/preferences/preview", post(preview_handler::<R>))
        .with_state(service)
}

pub(crate) fn caller_identity(headers: &HeaderMap) -> Result<UserId, Response> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| UserId(value.to_string()))
        .ok_or_else(|| {
            let payload = json!({ "error": "missing X-User-Id header" });
            (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
        })
}

pub(crate) async fn upsert_handler<R>(
    State(service): State<Arc<PreferenceProfileService<R>>>,
    headers: HeaderMap,
    Json(request): Json<ProfileUpsertRequest>,
) -> Response
where
    R: ProfileRepository + 'static,
{
    let user = match caller_identity(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.upsert_profile(&user, request.name.as_deref()) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => profile_error_response(error),
    }
}

pub(crate) async fn profile_handler<R>(
    State(service): State<Arc<PreferenceProfileService<R>>>,
    headers: HeaderMap,
) -> Response
where
    R: ProfileRepository + 'static,
{
    let user = match caller_identity(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.get(&user) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => profile_error_response(error),
    }
}

pub(crate) async fn comparisons_handler<R>(
    State(service): State<Arc<PreferenceProfileService<R>>>,
    headers: HeaderMap,
    Json(request): Json<ComparisonBatchRequest>,
) -> Response
where
    R: ProfileRepository + 'static,
{
    let user = match caller_identity(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.replace_comparisons(&user, &request.comparisons) {
        Ok(profile) => {
            info!(user = %user, pairs = profile.comparisons.len(), "pairwise comparisons stored");
            (StatusCode::OK, Json(profile.comparisons)).into_response()
        }
        Err(error) => profile_error_response(error),
    }
}

pub(crate) async fn preview_handler<R>(
    State(service): State<Arc<PreferenceProfileService<R>>>,
    Json(request): Json<PreviewRequest>,
) -> Json<PreviewResponse>
where
    R: ProfileRepository + 'static,
{
    let gate = SubmissionGate::new(service.threshold());
    let profile_name = request
        .profile_name
        .unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string());
    let decision = gate.evaluate(service.order(), &profile_name, &request.input);

    Json(PreviewResponse {
        criteria_order: service.order().keys().to_vec(),
        threshold: gate.threshold(),
        can_submit: decision.can_submit(),
        preview: decision.preview,
        blocks: decision.blocks,
        contradictions: decision.contradictions,
    })
}

fn profile_error_response(error: ProfileServiceError) -> Response {
    let status = match &error {
        ProfileServiceError::NotFound => StatusCode::NOT_FOUND,
        ProfileServiceError::InvalidName => StatusCode::UNPROCESSABLE_ENTITY,
        ProfileServiceError::Comparisons(ComparisonBatchError::NotEnoughCriteria) => {
            StatusCode::CONFLICT
        }
        ProfileServiceError::Comparisons(_) | ProfileServiceError::Ahp(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ProfileServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = match &error {
        ProfileServiceError::Comparisons(details) => json!({
            "error": error.to_string(),
            "details": details,
        }),
        _ => json!({ "error": error.to_string() }),
    };

    (status, Json(payload)).into_response()
}
