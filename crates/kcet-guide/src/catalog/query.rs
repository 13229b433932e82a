use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::domain::{Branch, BranchKey, Category, Cluster, College, CutoffRow, Round, CUTOFF_YEARS};
use super::snapshot::CatalogSnapshot;
use crate::counselling::CategoryResolver;

/// Branch joined with its college and cluster, as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchView {
    pub unique_key: BranchKey,
    pub branch_id: String,
    pub branch_name: String,
    pub college: College,
    pub cluster: Cluster,
}

impl BranchView {
    pub(crate) fn from_branch(snapshot: &CatalogSnapshot, branch: &Branch) -> Option<Self> {
        Some(Self {
            unique_key: branch.key.clone(),
            branch_id: branch.code.clone(),
            branch_name: branch.name.clone(),
            college: snapshot.college(&branch.college_code)?.clone(),
            cluster: snapshot.cluster(&branch.cluster_code)?.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub colleges: Vec<College>,
    pub branches: Vec<BranchView>,
    pub locations: Vec<String>,
}

/// Raw cells of one cutoff row keyed year -> round (`r1`..`r3`).
pub type CutoffMatrixView = BTreeMap<String, BTreeMap<String, Option<String>>>;

/// Raw cutoff cells for one branch, grouped by category.
#[derive(Debug, Clone, Serialize)]
pub struct BranchCutoffView {
    pub branch: BranchView,
    pub categories: BTreeMap<String, CutoffMatrixView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollegeDetail {
    #[serde(flatten)]
    pub college: College,
    pub branches: Vec<BranchView>,
}

/// Case-insensitive search over colleges and branches.
pub fn search(snapshot: &CatalogSnapshot, query: &str, location: &str) -> SearchResults {
    let query = query.trim().to_lowercase();
    let location = location.trim().to_lowercase();
    let contains = |field: &str| query.is_empty() || field.to_lowercase().contains(&query);
    let at_location =
        |college: &College| location.is_empty() || college.location.to_lowercase() == location;

    let colleges = snapshot
        .colleges()
        .filter(|college| {
            contains(&college.name) || contains(&college.code) || contains(&college.location)
        })
        .filter(|college| at_location(college))
        .cloned()
        .collect();

    let branches = snapshot
        .branches()
        .filter_map(|branch| BranchView::from_branch(snapshot, branch))
        .filter(|view| {
            contains(&view.branch_name)
                || contains(&view.college.name)
                || contains(&view.college.code)
                || contains(&view.college.location)
        })
        .filter(|view| at_location(&view.college))
        .collect();

    SearchResults {
        colleges,
        branches,
        locations: locations(snapshot),
    }
}

/// Distinct, non-empty college locations in sorted order.
pub fn locations(snapshot: &CatalogSnapshot) -> Vec<String> {
    snapshot
        .colleges()
        .map(|college| college.location.trim())
        .filter(|location| !location.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn branches_for_college(snapshot: &CatalogSnapshot, college_code: &str) -> Vec<BranchView> {
    let mut branches: Vec<BranchView> = snapshot
        .branches()
        .filter(|branch| branch.college_code == college_code)
        .filter_map(|branch| BranchView::from_branch(snapshot, branch))
        .collect();
    branches.sort_by(|a, b| a.branch_name.cmp(&b.branch_name));
    branches
}

/// Cutoff matrix for a branch; with a category, only its resolved fallback set is kept.
pub fn branch_cutoffs(
    snapshot: &CatalogSnapshot,
    key: &BranchKey,
    category: Option<&str>,
) -> Option<BranchCutoffView> {
    let branch = BranchView::from_branch(snapshot, snapshot.branch(key)?)?;
    let allowed = category.map(|code| CategoryResolver::new(snapshot).resolve(Some(code)));

    let categories = snapshot
        .cutoff_rows_for(key)
        .filter(|row| {
            allowed
                .as_ref()
                .is_none_or(|allowed| allowed.contains(&row.category))
        })
        .map(|row| (row.category.clone(), cutoff_matrix(row)))
        .collect();

    Some(BranchCutoffView { branch, categories })
}

/// Every branch of a college that has cutoff history, keyed by branch key.
///
/// Returns `None` only when the college itself is unknown.
pub fn college_cutoffs(
    snapshot: &CatalogSnapshot,
    college_code: &str,
) -> Option<BTreeMap<BranchKey, BranchCutoffView>> {
    snapshot.college(college_code)?;

    let views = snapshot
        .branches()
        .filter(|branch| branch.college_code == college_code)
        .filter_map(|branch| branch_cutoffs(snapshot, &branch.key, None))
        .filter(|view| !view.categories.is_empty())
        .map(|view| (view.branch.unique_key.clone(), view))
        .collect();

    Some(views)
}

fn cutoff_matrix(row: &CutoffRow) -> CutoffMatrixView {
    CUTOFF_YEARS
        .iter()
        .map(|year| {
            let rounds: BTreeMap<String, Option<String>> = Round::ALL
                .iter()
                .map(|round| {
                    (
                        round.column_suffix().to_string(),
                        row.raw_cell(year, *round).map(str::to_string),
                    )
                })
                .collect();
            (year.to_string(), rounds)
        })
        .collect()
}

pub fn colleges(snapshot: &CatalogSnapshot) -> Vec<College> {
    snapshot.colleges().cloned().collect()
}

/// A college with its branches sorted by name.
pub fn college(snapshot: &CatalogSnapshot, code: &str) -> Option<CollegeDetail> {
    let college = snapshot.college(code)?.clone();
    let branches = branches_for_college(snapshot, code);
    Some(CollegeDetail { college, branches })
}

pub fn branch(snapshot: &CatalogSnapshot, key: &BranchKey) -> Option<BranchView> {
    BranchView::from_branch(snapshot, snapshot.branch(key)?)
}

pub fn categories(snapshot: &CatalogSnapshot) -> Vec<Category> {
    snapshot.categories().cloned().collect()
}

pub fn clusters(snapshot: &CatalogSnapshot) -> Vec<Cluster> {
    snapshot.clusters().cloned().collect()
}
