use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::BranchKey;
use super::query;
use super::snapshot::CatalogSnapshot;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    query: String,
    #[serde(default)]
    location: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CutoffParams {
    #[serde(default)]
    category: Option<String>,
}

/// Read-only catalog browsing endpoints.
pub fn catalog_router(snapshot: Arc<CatalogSnapshot>) -> Router {
    Router::new()
        .route("/api/v1/colleges", get(colleges_handler))
        .route("/api/v1/colleges/search", get(search_handler))
        .route("/api/v1/colleges/locations", get(locations_handler))
        .route("/api/v1/colleges/:code", get(college_handler))
        .route("/api/v1/colleges/:code/branches", get(college_branches_handler))
        .route("/api/v1/colleges/:code/cutoffs", get(college_cutoffs_handler))
        .route("/api/v1/branches/:key", get(branch_handler))
        .route("/api/v1/branches/:key/cutoffs", get(branch_cutoffs_handler))
        .route("/api/v1/categories", get(categories_handler))
        .route("/api/v1/clusters", get(clusters_handler))
        .with_state(snapshot)
}

pub(crate) async fn colleges_handler(State(snapshot): State<Arc<CatalogSnapshot>>) -> Response {
    (StatusCode::OK, axum::Json(query::colleges(&snapshot))).into_response()
}

pub(crate) async fn locations_handler(State(snapshot): State<Arc<CatalogSnapshot>>) -> Response {
    let locations = query::locations(&snapshot);
    (StatusCode::OK, axum::Json(json!({ "locations": locations }))).into_response()
}

pub(crate) async fn college_handler(
    State(snapshot): State<Arc<CatalogSnapshot>>,
    Path(code): Path<String>,
) -> Response {
    match query::college(&snapshot, &code) {
        Some(detail) => (StatusCode::OK, axum::Json(detail)).into_response(),
        None => not_found(format!("unknown college '{code}'")),
    }
}

pub(crate) async fn college_cutoffs_handler(
    State(snapshot): State<Arc<CatalogSnapshot>>,
    Path(code): Path<String>,
) -> Response {
    match query::college_cutoffs(&snapshot, &code) {
        Some(cutoffs) => (StatusCode::OK, axum::Json(cutoffs)).into_response(),
        None => not_found(format!("unknown college '{code}'")),
    }
}

pub(crate) async fn branch_handler(
    State(snapshot): State<Arc<CatalogSnapshot>>,
    Path(key): Path<String>,
) -> Response {
    let key = BranchKey::new(key);
    match query::branch(&snapshot, &key) {
        Some(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        None => not_found(format!("unknown branch '{key}'")),
    }
}

pub(crate) async fn search_handler(
    State(snapshot): State<Arc<CatalogSnapshot>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let results = query::search(&snapshot, &params.query, &params.location);
    (StatusCode::OK, axum::Json(results)).into_response()
}

pub(crate) async fn college_branches_handler(
    State(snapshot): State<Arc<CatalogSnapshot>>,
    Path(code): Path<String>,
) -> Response {
    if snapshot.college(&code).is_none() {
        return not_found(format!("unknown college '{code}'"));
    }

    let branches = query::branches_for_college(&snapshot, &code);
    (StatusCode::OK, axum::Json(branches)).into_response()
}

pub(crate) async fn branch_cutoffs_handler(
    State(snapshot): State<Arc<CatalogSnapshot>>,
    Path(key): Path<String>,
    Query(params): Query<CutoffParams>,
) -> Response {
    let key = BranchKey::new(key);
    let category = params
        .category
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty());

    match query::branch_cutoffs(&snapshot, &key, category) {
        Some(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        None => not_found(format!("unknown branch '{key}'")),
    }
}

pub(crate) async fn categories_handler(State(snapshot): State<Arc<CatalogSnapshot>>) -> Response {
    (StatusCode::OK, axum::Json(query::categories(&snapshot))).into_response()
}

pub(crate) async fn clusters_handler(State(snapshot): State<Arc<CatalogSnapshot>>) -> Response {
    (StatusCode::OK, axum::Json(query::clusters(&snapshot))).into_response()
}

fn not_found(message: String) -> Response {
    (StatusCode::NOT_FOUND, axum::Json(json!({ "error": message }))).into_response()
}
