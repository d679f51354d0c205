use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::catalog::PropertyCatalog;
use super::service::{RecommendationError, RecommendationService};
use crate::preferences::profile::ProfileRepository;
use crate::preferences::router::caller_identity;
use crate::preferences::submission::{AHP_INCONSISTENT, AHP_INCONSISTENT_MESSAGE};

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default)]
    pub price_boost: Option<f64>,
}

/// Router builder exposing the ranked recommendation endpoint.
pub fn recommendation_router<R, C>(service: Arc<RecommendationService<R, C>>) -> Router
where
    R: ProfileRepository + 'static,
    C: PropertyCatalog + 'static,
{
    Router::new()
        .route("/api/v1/recommendations", get(recommendations_handler::<R, C>))
        .with_state(service)
}

pub(crate) async fn recommendations_handler<R, C>(
    State(service): State<Arc<RecommendationService<R, C>>>,
    headers: HeaderMap,
    Query(query): Query<RecommendationQuery>,
) -> Response
where
    R: ProfileRepository + 'static,
    C: PropertyCatalog + 'static,
{
    let user = match caller_identity(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.recommend(&user, query.price_boost) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => recommendation_error_response(err),
    }
}

fn recommendation_error_response(err: RecommendationError) -> Response {
    match err {
        RecommendationError::ProfileNotFound => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": err.to_string() }))).into_response()
        }
        RecommendationError::ComparisonsNotSet => {
            (StatusCode::CONFLICT, Json(json!({ "error": err.to_string() }))).into_response()
        }
        RecommendationError::AhpInconsistent { cr, threshold } => {
            let payload = json!({
                "error": AHP_INCONSISTENT,
                "cr": cr,
                "threshold": threshold,
                "message": AHP_INCONSISTENT_MESSAGE,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        RecommendationError::UnknownPropertyTypes(ref types) => {
            let payload = json!({
                "error": "Missing property type mapping for one or more properties",
                "unknown_types": types,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        other => {
            error!(error = %other, "recommendation run failed");
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
