//! Admission recommendation core.
//!
//! Given a student's rank, category and preferences, the engine searches the
//! cutoff history of every candidate branch, resolving missing data through
//! category and round fallbacks, smoothing multi-year volatility, and returns
//! one ranked entry per branch whose cutoff falls inside the student's band.

pub mod category;
pub mod choices;
pub mod engine;
pub mod policy;
pub mod relaxation;
pub mod round;
pub mod router;
pub mod service;
pub mod stabilizer;
pub mod window;

#[cfg(test)]
mod tests;

pub use category::CategoryResolver;
pub use engine::{
    BranchSummary, Recommendation, RecommendationEngine, RecommendationError,
    RecommendationRequest, RecommendationSet,
};
pub use policy::RecommendationPolicy;
pub use round::fallback_order;
pub use router::counselling_router;
pub use service::{
    ChoicePlacement, ChoicePlacementRequest, CounsellingService, CounsellingServiceError,
};
pub use stabilizer::{stabilize, CutoffSeries};
pub use window::{RankBand, RankWindow};
