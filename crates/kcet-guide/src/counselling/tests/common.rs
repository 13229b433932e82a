use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::catalog::snapshot::fixtures::{branch, cluster, college, sample_parts};
use crate::catalog::{Branch, BranchKey, CatalogParts, CatalogSnapshot, CutoffRow, Round};
use crate::counselling::{
    CounsellingService, RecommendationEngine, RecommendationPolicy, RecommendationRequest,
    RecommendationSet,
};

pub(super) use crate::catalog::snapshot::fixtures::sample_snapshot;

/// Cutoff row from explicit `(year, round, raw)` cells.
pub(super) fn row(key: &str, category: &str, cells: &[(&str, Round, &str)]) -> CutoffRow {
    let mut row = CutoffRow::new(BranchKey::new(key), category);
    for (year, round, raw) in cells {
        row.set_cell(year, *round, Some(raw));
    }
    row
}

/// Two-college catalog holding only the supplied branches and cutoffs.
pub(super) fn snapshot_with(branches: Vec<Branch>, cutoffs: Vec<CutoffRow>) -> CatalogSnapshot {
    let parts = CatalogParts {
        colleges: vec![
            college("E001", "University Visvesvaraya College of Engineering", "Bangalore"),
            college("E005", "RV College of Engineering", "Bangalore"),
        ],
        clusters: vec![cluster("A", "Computer Sciences")],
        branches,
        categories: sample_parts().categories,
        cutoffs,
    };
    CatalogSnapshot::from_parts(parts).expect("test catalog is valid")
}

pub(super) fn cs_branch(key: &str, college: &str) -> Branch {
    branch(key, college, "A", "Computer Science")
}

pub(super) fn recommend(
    snapshot: &CatalogSnapshot,
    request: RecommendationRequest,
) -> RecommendationSet {
    RecommendationEngine::new(RecommendationPolicy::default())
        .recommend(snapshot, &request)
        .expect("valid request")
}

pub(super) fn keys(set: &RecommendationSet) -> Vec<&str> {
    set.recommendations
        .iter()
        .map(|entry| entry.branch_key.as_str())
        .collect()
}

pub(super) fn sample_service() -> Arc<CounsellingService> {
    Arc::new(CounsellingService::new(
        Arc::new(sample_snapshot()),
        RecommendationPolicy::default(),
    ))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
