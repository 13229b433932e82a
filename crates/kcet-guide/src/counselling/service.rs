use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::choices::{choice_cutoff, insertion_position};
use super::engine::{
    non_blank, RecommendationEngine, RecommendationError, RecommendationRequest, RecommendationSet,
};
use super::policy::RecommendationPolicy;
use crate::catalog::{BranchKey, CatalogSnapshot, Round};

/// Where a new branch should land in a student's ordered choice list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoicePlacementRequest {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub round: Option<String>,
    #[serde(default)]
    pub existing: Vec<BranchKey>,
    pub candidate: BranchKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoicePlacement {
    pub position: usize,
    pub candidate_cutoff: Option<u32>,
}

/// Read-only counselling operations bound to one catalog snapshot.
pub struct CounsellingService {
    snapshot: Arc<CatalogSnapshot>,
    engine: RecommendationEngine,
}

impl CounsellingService {
    pub fn new(snapshot: Arc<CatalogSnapshot>, policy: RecommendationPolicy) -> Self {
        Self {
            snapshot,
            engine: RecommendationEngine::new(policy),
        }
    }

    pub fn snapshot(&self) -> &Arc<CatalogSnapshot> {
        &self.snapshot
    }

    pub fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationSet, CounsellingServiceError> {
        Ok(self.engine.recommend(&self.snapshot, request)?)
    }

    pub fn place_choice(
        &self,
        request: &ChoicePlacementRequest,
    ) -> Result<ChoicePlacement, CounsellingServiceError> {
        if self.snapshot.branch(&request.candidate).is_none() {
            return Err(CounsellingServiceError::UnknownBranch(
                request.candidate.clone(),
            ));
        }

        let category = non_blank(request.category.as_deref());
        let year = non_blank(request.year.as_deref())
            .unwrap_or(&self.engine.policy().default_year);
        let round = request
            .round
            .as_deref()
            .map(Round::parse_lenient)
            .unwrap_or(Round::R1);

        let cutoff_for =
            |branch: &BranchKey| choice_cutoff(&self.snapshot, category, year, round, branch);

        let existing: Vec<Option<u32>> = request.existing.iter().map(cutoff_for).collect();
        let candidate_cutoff = cutoff_for(&request.candidate);

        Ok(ChoicePlacement {
            position: insertion_position(&existing, candidate_cutoff),
            candidate_cutoff,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CounsellingServiceError {
    #[error(transparent)]
    Recommendation(#[from] RecommendationError),
    #[error("unknown branch '{0}'")]
    UnknownBranch(BranchKey),
}
