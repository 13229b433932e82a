use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::category::CategoryResolver;
use super::policy::RecommendationPolicy;
use super::relaxation::historical_relaxation;
use super::round::fallback_order;
use super::stabilizer::CutoffSeries;
use super::window::{RankBand, RankWindow};
use crate::catalog::{Branch, BranchKey, CatalogSnapshot, Cluster, College, Round};

/// Student input for a recommendation query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(alias = "kcet_rank")]
    pub rank: i64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub round: Option<String>,
    #[serde(default)]
    pub cluster: Option<String>,
    #[serde(default)]
    pub opening_rank: Option<u32>,
    #[serde(default)]
    pub closing_rank: Option<u32>,
}

impl RecommendationRequest {
    pub fn for_rank(rank: i64) -> Self {
        Self {
            rank,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchSummary {
    pub code: String,
    pub name: String,
}

/// One recommended branch with the category and cutoff that qualified it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub branch_key: BranchKey,
    pub college: College,
    pub branch: BranchSummary,
    pub cluster: Cluster,
    pub category: String,
    pub cutoff: u32,
    /// Round that supplied the current-year cutoff before stabilization.
    pub source_round: Round,
    pub distance_from_rank: u32,
    pub eligibility_flag: bool,
    pub may_relax: bool,
}

/// Ranked recommendations plus the effective request parameters.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationSet {
    pub rank: u32,
    pub category: Option<String>,
    pub year: String,
    pub round: Round,
    pub cluster: Option<String>,
    pub opening_rank: u32,
    pub closing_rank: u32,
    pub band: RankBand,
    pub recommendations: Vec<Recommendation>,
    pub count: usize,
    pub data_loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecommendationError {
    #[error("rank must be a positive integer, got {0}")]
    InvalidRank(i64),
}

/// Per-request parameters shared by every (branch, category) lookup.
struct Lookup<'q> {
    year: &'q str,
    selected: Round,
    rounds: [Round; 3],
    window: RankWindow,
}

/// Best qualifying cutoff found for one branch across candidate categories.
struct BranchMatch<'a> {
    category: &'a str,
    cutoff: u32,
    source_round: Round,
    history: Vec<u32>,
}

/// Stateless recommendation engine; all data comes from the snapshot passed per call.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    policy: RecommendationPolicy,
}

impl RecommendationEngine {
    pub fn new(policy: RecommendationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RecommendationPolicy {
        &self.policy
    }

    pub fn recommend(
        &self,
        snapshot: &CatalogSnapshot,
        request: &RecommendationRequest,
    ) -> Result<RecommendationSet, RecommendationError> {
        let rank = u32::try_from(request.rank)
            .ok()
            .filter(|rank| *rank > 0)
            .ok_or(RecommendationError::InvalidRank(request.rank))?;

        let category = non_blank(request.category.as_deref());
        let cluster = non_blank(request.cluster.as_deref());
        let year = non_blank(request.year.as_deref())
            .unwrap_or(&self.policy.default_year)
            .to_string();
        let round = request
            .round
            .as_deref()
            .map(Round::parse_lenient)
            .unwrap_or(Round::R1);

        let window = RankWindow::resolve(rank, request.opening_rank, request.closing_rank);
        let lookup = Lookup {
            year: &year,
            selected: round,
            rounds: fallback_order(round),
            window,
        };
        let categories = CategoryResolver::new(snapshot).resolve(category);

        let mut recommendations: Vec<Recommendation> = Vec::new();
        let mut seen: HashMap<(String, String), usize> = HashMap::new();
        let mut scanned = 0usize;

        let candidates = snapshot
            .branches()
            .filter(|branch| cluster.is_none_or(|code| branch.cluster_code == code));

        for branch in candidates {
            scanned += 1;

            let mut best: Option<BranchMatch<'_>> = None;
            for code in &categories {
                let Some(found) = self.match_category(snapshot, branch, code, &lookup) else {
                    continue;
                };
                if best.as_ref().is_none_or(|current| found.cutoff < current.cutoff) {
                    best = Some(found);
                }
            }

            let Some(best) = best else {
                continue;
            };

            let distance = best.cutoff.abs_diff(rank);
            let may_relax = historical_relaxation(
                &best.history,
                rank,
                self.policy.relaxation_factor,
                self.policy.relaxation_drop_pct,
            );

            let dedup_key = (branch.college_code.clone(), branch.code.clone());
            if let Some(&index) = seen.get(&dedup_key) {
                let existing = &mut recommendations[index];
                if distance < existing.distance_from_rank {
                    existing.category = best.category.to_string();
                    existing.cutoff = best.cutoff;
                    existing.source_round = best.source_round;
                    existing.distance_from_rank = distance;
                    existing.eligibility_flag = best.cutoff <= rank;
                    existing.may_relax = may_relax;
                }
                continue;
            }

            let (Some(college), Some(group)) = (
                snapshot.college(&branch.college_code),
                snapshot.cluster(&branch.cluster_code),
            ) else {
                continue;
            };

            seen.insert(dedup_key, recommendations.len());
            recommendations.push(Recommendation {
                branch_key: branch.key.clone(),
                college: college.clone(),
                branch: BranchSummary {
                    code: branch.code.clone(),
                    name: branch.name.clone(),
                },
                cluster: group.clone(),
                category: best.category.to_string(),
                cutoff: best.cutoff,
                source_round: best.source_round,
                distance_from_rank: distance,
                eligibility_flag: best.cutoff <= rank,
                may_relax,
            });
        }

        recommendations.sort_by(|a, b| {
            a.cutoff
                .cmp(&b.cutoff)
                .then_with(|| a.branch_key.cmp(&b.branch_key))
        });

        debug!(
            rank,
            %year,
            %round,
            opening = window.opening,
            closing = window.closing,
            categories = categories.len(),
            scanned,
            matched = recommendations.len(),
            "recommendations computed"
        );

        Ok(RecommendationSet {
            rank,
            category: category.map(str::to_string),
            year,
            round,
            cluster: cluster.map(str::to_string),
            opening_rank: window.opening,
            closing_rank: window.closing,
            band: RankBand::for_rank(rank),
            count: recommendations.len(),
            recommendations,
            data_loaded_at: snapshot.loaded_at(),
        })
    }

    /// Effective cutoff for one (branch, category) if it falls inside the window.
    ///
    /// The current value comes from the first round in fallback order that has
    /// a cell for the requested year; the multi-year series is always read at
    /// the selected round.
    fn match_category<'c>(
        &self,
        snapshot: &CatalogSnapshot,
        branch: &Branch,
        category: &'c str,
        lookup: &Lookup<'_>,
    ) -> Option<BranchMatch<'c>> {
        let (source_round, current) = lookup.rounds.iter().find_map(|round| {
            snapshot
                .cell(&branch.key, category, lookup.year, *round)
                .map(|rank| (*round, rank))
        })?;

        let series = CutoffSeries::new(snapshot.series(
            &branch.key,
            category,
            &self.policy.years,
            lookup.selected,
        ));
        let cutoff = series
            .stabilized(self.policy.stability_threshold)
            .unwrap_or(current);

        if !lookup.window.contains(cutoff) {
            return None;
        }

        Some(BranchMatch {
            category,
            cutoff,
            source_round,
            history: series.values(),
        })
    }
}

/// Trims optional input; blank strings read as absent.
pub(super) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
