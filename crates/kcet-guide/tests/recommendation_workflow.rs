use std::collections::HashSet;
use std::sync::Arc;

use kcet_guide::catalog::{BranchKey, CatalogImporter, Round};
use kcet_guide::counselling::{
    ChoicePlacementRequest, CounsellingService, CounsellingServiceError, RankBand,
    RecommendationPolicy, RecommendationRequest, RecommendationSet,
};

const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data");

fn service() -> CounsellingService {
    let snapshot = CatalogImporter::from_dir(DATA_DIR).expect("sample dataset imports");
    CounsellingService::new(Arc::new(snapshot), RecommendationPolicy::default())
}

fn summary(set: &RecommendationSet) -> Vec<(&str, u32, &str)> {
    set.recommendations
        .iter()
        .map(|entry| {
            (
                entry.branch_key.as_str(),
                entry.cutoff,
                entry.category.as_str(),
            )
        })
        .collect()
}

#[test]
fn open_category_search_picks_the_lowest_qualifying_category_per_branch() {
    let set = service()
        .recommend(&RecommendationRequest::for_rank(5_000))
        .expect("valid request");

    assert_eq!(set.band, RankBand::Medium);
    assert_eq!(
        summary(&set),
        vec![
            ("E001EC", 3_850, "GM"),
            ("E006EE", 6_000, "GM"),
            ("E020CS", 6_500, "GM"),
            ("E001CS", 9_100, "SCG"),
            ("E001ME", 13_200, "GM"),
            ("E041CS", 14_000, "GM"),
        ]
    );
    assert!(set.recommendations[0].eligibility_flag);
    assert!(set.recommendations[1..]
        .iter()
        .all(|entry| !entry.eligibility_flag));
}

#[test]
fn general_merit_search_excludes_reserved_rows() {
    let request = RecommendationRequest {
        category: Some("GM".to_string()),
        ..RecommendationRequest::for_rank(5_000)
    };
    let set = service().recommend(&request).expect("valid request");

    let keys: Vec<&str> = set
        .recommendations
        .iter()
        .map(|entry| entry.branch_key.as_str())
        .collect();
    assert_eq!(keys, vec!["E001EC", "E006EE", "E020CS", "E001ME", "E041CS"]);
}

#[test]
fn volatile_history_is_admitted_through_its_median() {
    let request = RecommendationRequest {
        cluster: Some("CE".to_string()),
        ..RecommendationRequest::for_rank(15_000)
    };
    let set = service().recommend(&request).expect("valid request");

    assert_eq!(set.band, RankBand::Wide);
    assert_eq!((set.opening_rank, set.closing_rank), (10_500, 52_500));
    // Hassan civil closed at 58000 in 2025 but swings year to year; its median is 51500.
    assert_eq!(
        summary(&set),
        vec![
            ("E001ME", 13_200, "GM"),
            ("E001CV", 21_000, "GM"),
            ("E020ME", 24_000, "GM"),
            ("E041CV", 51_500, "GM"),
        ]
    );
}

#[test]
fn missing_current_round_reports_the_fallback_source() {
    let request = RecommendationRequest {
        cluster: Some("CS".to_string()),
        ..RecommendationRequest::for_rank(15_000)
    };
    let set = service().recommend(&request).expect("valid request");

    assert_eq!(set.count, 1);
    let entry = &set.recommendations[0];
    assert_eq!(entry.branch_key.as_str(), "E041CS");
    assert_eq!(entry.source_round, Round::R2);
    assert_eq!(entry.cutoff, 14_000);
    assert_eq!(entry.college.location, "Hassan");
}

#[test]
fn top_ranks_stay_in_the_tight_band() {
    let request = RecommendationRequest {
        category: Some("2AG".to_string()),
        ..RecommendationRequest::for_rank(500)
    };
    let set = service().recommend(&request).expect("valid request");

    assert_eq!(set.band, RankBand::Tight);
    assert_eq!(
        summary(&set),
        vec![
            ("E005CS", 400, "GM"),
            ("E005AI", 820, "GM"),
            ("E006CS", 1_150, "GM"),
        ]
    );
}

#[test]
fn every_rank_yields_unique_sorted_in_window_entries() {
    let service = service();

    for rank in [100, 750, 2_000, 4_000, 8_000, 12_000, 30_000, 90_000] {
        let set = service
            .recommend(&RecommendationRequest::for_rank(rank))
            .expect("valid request");

        let mut pairs = HashSet::new();
        for entry in &set.recommendations {
            assert!(entry.cutoff >= set.opening_rank && entry.cutoff <= set.closing_rank);
            assert!(pairs.insert((entry.college.code.clone(), entry.branch.code.clone())));
        }
        assert!(set
            .recommendations
            .windows(2)
            .all(|pair| (pair[0].cutoff, &pair[0].branch_key) <= (pair[1].cutoff, &pair[1].branch_key)));
    }
}

#[test]
fn invalid_rank_is_rejected() {
    let error = service()
        .recommend(&RecommendationRequest::for_rank(-3))
        .expect_err("negative rank");
    assert!(matches!(error, CounsellingServiceError::Recommendation(_)));
}

#[test]
fn choice_placement_uses_category_then_general_merit() {
    let request = ChoicePlacementRequest {
        category: Some("2AG".to_string()),
        year: None,
        round: None,
        existing: vec![
            BranchKey::new("E005CS"),
            BranchKey::new("E001CS"),
            BranchKey::new("E041CV"),
        ],
        candidate: BranchKey::new("E006CS"),
    };
    let placement = service().place_choice(&request).expect("known candidate");

    // 2AG cutoffs: 640, 2150, then Hassan civil falls back to GM 58000.
    assert_eq!(placement.candidate_cutoff, Some(1_150));
    assert_eq!(placement.position, 2);
}
