use chrono::Local;
use clap::Args;
use kcet_guide::config::AppConfig;
use kcet_guide::counselling::{RecommendationRequest, RecommendationSet};
use kcet_guide::error::AppError;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::infra::build_service;

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Student's KCET rank
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) rank: i64,
    /// Admission category code (e.g. GM, 2AG); omit to search every category
    #[arg(long)]
    pub(crate) category: Option<String>,
    /// Cutoff year to compare against (defaults to the latest year)
    #[arg(long)]
    pub(crate) year: Option<String>,
    /// Counselling round R1, R2 or R3
    #[arg(long)]
    pub(crate) round: Option<String>,
    /// Restrict results to one cluster code
    #[arg(long)]
    pub(crate) cluster: Option<String>,
    /// Explicit lower bound of the cutoff window
    #[arg(long)]
    pub(crate) opening: Option<u32>,
    /// Explicit upper bound of the cutoff window
    #[arg(long)]
    pub(crate) closing: Option<u32>,
    /// Directory holding the catalog CSV exports
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Print the raw JSON payload instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

impl RecommendArgs {
    fn request(&self) -> RecommendationRequest {
        RecommendationRequest {
            rank: self.rank,
            category: self.category.clone(),
            year: self.year.clone(),
            round: self.round.clone(),
            cluster: self.cluster.clone(),
            opening_rank: self.opening,
            closing_rank: self.closing,
        }
    }
}

pub(crate) fn run_recommend(mut args: RecommendArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(data_dir) = args.data_dir.take() {
        config.data.data_dir = data_dir;
    }

    let service = build_service(&config)?;
    let set = service.recommend(&args.request())?;

    if args.json {
        println!("{}", render_json(&set)?);
    } else {
        print!("{}", render_table(&set));
    }

    Ok(())
}

pub(crate) fn render_json(set: &RecommendationSet) -> Result<String, AppError> {
    let json = serde_json::to_string_pretty(set).map_err(std::io::Error::from)?;
    Ok(json)
}

pub(crate) fn render_table(set: &RecommendationSet) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Recommendations for rank {} ({:?} band, window {}-{})",
        set.rank, set.band, set.opening_rank, set.closing_rank
    );
    let _ = writeln!(
        out,
        "Year {} round {} | category {} | cluster {} | data loaded {}",
        set.year,
        set.round,
        set.category.as_deref().unwrap_or("any"),
        set.cluster.as_deref().unwrap_or("any"),
        set.data_loaded_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
    );

    if set.recommendations.is_empty() {
        let _ = writeln!(out, "No branches fall inside the window.");
        return out;
    }

    for (index, entry) in set.recommendations.iter().enumerate() {
        let marker = if entry.eligibility_flag { "eligible" } else { "stretch" };
        let _ = writeln!(
            out,
            "{:>3}. {:<8} {} - {} ({})",
            index + 1,
            entry.branch_key,
            entry.college.name,
            entry.branch.name,
            entry.college.location
        );
        let _ = writeln!(
            out,
            "     cutoff {} [{} {}] | distance {} | {}{}",
            entry.cutoff,
            entry.category,
            entry.source_round,
            entry.distance_from_rank,
            marker,
            if entry.may_relax { " | may relax" } else { "" }
        );
    }
    let _ = writeln!(out, "{} branch(es) listed", set.count);
    out
}
