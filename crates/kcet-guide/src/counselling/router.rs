use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::engine::RecommendationRequest;
use super::service::{ChoicePlacementRequest, CounsellingService, CounsellingServiceError};

/// Router builder exposing the recommendation and choice placement endpoints.
pub fn counselling_router(service: Arc<CounsellingService>) -> Router {
    Router::new()
        .route(
            "/api/v1/counselling/recommendations",
            post(recommendations_handler),
        )
        .route(
            "/api/v1/counselling/choices/position",
            post(choice_position_handler),
        )
        .with_state(service)
}

pub(crate) async fn recommendations_handler(
    State(service): State<Arc<CounsellingService>>,
    payload: Result<axum::Json<RecommendationRequest>, JsonRejection>,
) -> Response {
    let axum::Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match service.recommend(&request) {
        Ok(set) => (StatusCode::OK, axum::Json(set)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn choice_position_handler(
    State(service): State<Arc<CounsellingService>>,
    payload: Result<axum::Json<ChoicePlacementRequest>, JsonRejection>,
) -> Response {
    let axum::Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match service.place_choice(&request) {
        Ok(placement) => (StatusCode::OK, axum::Json(placement)).into_response(),
        Err(error) => error_response(error),
    }
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, axum::Json(json!({ "error": message }))).into_response()
}

fn error_response(error: CounsellingServiceError) -> Response {
    let status = match error {
        CounsellingServiceError::Recommendation(_) => StatusCode::BAD_REQUEST,
        CounsellingServiceError::UnknownBranch(_) => StatusCode::NOT_FOUND,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
