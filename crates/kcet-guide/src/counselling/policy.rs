use serde::{Deserialize, Serialize};

use super::stabilizer::DEFAULT_STABILITY_THRESHOLD;
use crate::catalog::CUTOFF_YEARS;

/// Tunables for the recommendation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationPolicy {
    /// Years fed to the stabilizer, oldest first.
    pub years: Vec<String>,
    pub default_year: String,
    pub stability_threshold: f64,
    pub relaxation_factor: f64,
    pub relaxation_drop_pct: f64,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            years: CUTOFF_YEARS.iter().map(|year| year.to_string()).collect(),
            default_year: "2025".to_string(),
            stability_threshold: DEFAULT_STABILITY_THRESHOLD,
            relaxation_factor: 0.8,
            relaxation_drop_pct: 15.0,
        }
    }
}
