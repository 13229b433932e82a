use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::catalog::BranchKey;
use crate::counselling::router::{choice_position_handler, recommendations_handler};
use crate::counselling::{counselling_router, ChoicePlacementRequest, RecommendationRequest};

fn json_request(uri: &str, payload: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn recommendations_handler_rejects_non_positive_rank() {
    let response = recommendations_handler(
        State(sample_service()),
        Ok(axum::Json(RecommendationRequest::for_rank(0))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("positive"));
}

#[tokio::test]
async fn recommendations_route_returns_ranked_entries() {
    let router = counselling_router(sample_service());

    let response = router
        .oneshot(json_request(
            "/api/v1/counselling/recommendations",
            &json!({ "kcet_rank": 5000, "category": "GM" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["rank"], 5000);
    assert_eq!(body["round"], "R1");
    assert_eq!(body["band"], "medium");
    assert_eq!(body["opening_rank"], 3000);
    assert_eq!(body["closing_rank"], 15000);
    assert!(body["data_loaded_at"].is_string());

    let first = &body["recommendations"][0];
    assert_eq!(first["branch_key"], "E001CS");
    assert_eq!(first["cutoff"], 4200);
    assert_eq!(first["college"]["location"], "Bangalore");
    assert_eq!(first["branch"]["name"], "Computer Science");
    assert_eq!(first["eligibility_flag"], true);
    assert_eq!(body["recommendations"][1]["branch_key"], "E001ME");
}

#[tokio::test]
async fn recommendations_route_rejects_malformed_payloads() {
    let router = counselling_router(sample_service());

    let response = router
        .oneshot(json_request(
            "/api/v1/counselling/recommendations",
            &json!({ "rank": "five thousand" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn choice_position_rejects_payload_without_candidate() {
    let router = counselling_router(sample_service());

    let response = router
        .oneshot(json_request(
            "/api/v1/counselling/choices/position",
            &json!({ "existing": ["E001CS"] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn choice_position_orders_by_cutoff() {
    let router = counselling_router(sample_service());

    let response = router
        .oneshot(json_request(
            "/api/v1/counselling/choices/position",
            &json!({
                "category": "1G",
                "existing": ["E001CS", "E001ME"],
                "candidate": "E020EC",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["position"], 2);
    assert_eq!(body["candidate_cutoff"], 6300);
}

#[tokio::test]
async fn choice_without_cutoff_goes_after_ranked_choices() {
    let request = ChoicePlacementRequest {
        category: None,
        year: None,
        round: None,
        existing: vec![BranchKey::new("E005CS"), BranchKey::new("E001CS")],
        candidate: BranchKey::new("E020EC"),
    };

    let response = choice_position_handler(State(sample_service()), Ok(axum::Json(request))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["position"], 3);
    assert!(body["candidate_cutoff"].is_null());
}

#[tokio::test]
async fn choice_position_returns_not_found_for_unknown_candidate() {
    let request = ChoicePlacementRequest {
        category: None,
        year: None,
        round: None,
        existing: Vec::new(),
        candidate: BranchKey::new("E999XX"),
    };

    let response = choice_position_handler(State(sample_service()), Ok(axum::Json(request))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("E999XX"));
}
