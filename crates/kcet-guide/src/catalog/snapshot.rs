use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use super::domain::{Branch, BranchKey, Category, Cluster, College, CutoffRow, Round};

/// Validation failures raised while assembling a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate college code '{0}'")]
    DuplicateCollege(String),
    #[error("duplicate cluster code '{0}'")]
    DuplicateCluster(String),
    #[error("duplicate branch key '{0}'")]
    DuplicateBranch(BranchKey),
    #[error("duplicate category code '{0}'")]
    DuplicateCategory(String),
    #[error("branch '{branch}' references unknown college '{college}'")]
    UnknownCollege { branch: BranchKey, college: String },
    #[error("branch '{branch}' references unknown cluster '{cluster}'")]
    UnknownCluster { branch: BranchKey, cluster: String },
    #[error("cutoff row references unknown branch '{0}'")]
    UnknownBranch(BranchKey),
    #[error("more than one cutoff row for branch '{branch}' and category '{category}'")]
    DuplicateCutoff { branch: BranchKey, category: String },
}

/// Raw tables handed to [`CatalogSnapshot::from_parts`].
#[derive(Debug, Clone, Default)]
pub struct CatalogParts {
    pub colleges: Vec<College>,
    pub clusters: Vec<Cluster>,
    pub branches: Vec<Branch>,
    pub categories: Vec<Category>,
    pub cutoffs: Vec<CutoffRow>,
}

/// Immutable, fully indexed view over the imported catalog.
///
/// Built once, then shared behind an `Arc` by every request. Cutoff rows are
/// indexed by (branch, category) at construction so lookups never scan.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    colleges: BTreeMap<String, College>,
    clusters: BTreeMap<String, Cluster>,
    branches: BTreeMap<BranchKey, Branch>,
    categories: BTreeMap<String, Category>,
    cutoffs: HashMap<BranchKey, BTreeMap<String, CutoffRow>>,
    loaded_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn from_parts(parts: CatalogParts) -> Result<Self, CatalogError> {
        let CatalogParts {
            colleges,
            clusters,
            branches,
            categories,
            cutoffs,
        } = parts;

        let mut college_index = BTreeMap::new();
        for college in colleges {
            if college_index.contains_key(&college.code) {
                return Err(CatalogError::DuplicateCollege(college.code));
            }
            college_index.insert(college.code.clone(), college);
        }

        let mut cluster_index = BTreeMap::new();
        for cluster in clusters {
            if cluster_index.contains_key(&cluster.code) {
                return Err(CatalogError::DuplicateCluster(cluster.code));
            }
            cluster_index.insert(cluster.code.clone(), cluster);
        }

        let mut branch_index = BTreeMap::new();
        for branch in branches {
            if !college_index.contains_key(&branch.college_code) {
                return Err(CatalogError::UnknownCollege {
                    branch: branch.key,
                    college: branch.college_code,
                });
            }
            if !cluster_index.contains_key(&branch.cluster_code) {
                return Err(CatalogError::UnknownCluster {
                    branch: branch.key,
                    cluster: branch.cluster_code,
                });
            }
            if branch_index.contains_key(&branch.key) {
                return Err(CatalogError::DuplicateBranch(branch.key));
            }
            branch_index.insert(branch.key.clone(), branch);
        }

        let mut category_index = BTreeMap::new();
        for category in categories {
            if category_index.contains_key(&category.code) {
                return Err(CatalogError::DuplicateCategory(category.code));
            }
            category_index.insert(category.code.clone(), category);
        }

        let mut cutoff_index: HashMap<BranchKey, BTreeMap<String, CutoffRow>> = HashMap::new();
        for row in cutoffs {
            if !branch_index.contains_key(&row.branch) {
                return Err(CatalogError::UnknownBranch(row.branch));
            }
            let per_branch = cutoff_index.entry(row.branch.clone()).or_default();
            if per_branch.contains_key(&row.category) {
                return Err(CatalogError::DuplicateCutoff {
                    branch: row.branch,
                    category: row.category,
                });
            }
            per_branch.insert(row.category.clone(), row);
        }

        Ok(Self {
            colleges: college_index,
            clusters: cluster_index,
            branches: branch_index,
            categories: category_index,
            cutoffs: cutoff_index,
            loaded_at: Utc::now(),
        })
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn colleges(&self) -> impl Iterator<Item = &College> {
        self.colleges.values()
    }

    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.values()
    }

    /// Branches ordered by branch key.
    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.values()
    }

    /// Categories ordered by code.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    pub fn college(&self, code: &str) -> Option<&College> {
        self.colleges.get(code)
    }

    pub fn cluster(&self, code: &str) -> Option<&Cluster> {
        self.clusters.get(code)
    }

    pub fn branch(&self, key: &BranchKey) -> Option<&Branch> {
        self.branches.get(key)
    }

    pub fn category(&self, code: &str) -> Option<&Category> {
        self.categories.get(code)
    }

    pub fn cutoff_row(&self, branch: &BranchKey, category: &str) -> Option<&CutoffRow> {
        self.cutoffs.get(branch)?.get(category)
    }

    /// Every cutoff row recorded for a branch, ordered by category code.
    pub fn cutoff_rows_for(&self, branch: &BranchKey) -> impl Iterator<Item = &CutoffRow> {
        self.cutoffs.get(branch).into_iter().flat_map(|rows| rows.values())
    }

    pub fn cell(&self, branch: &BranchKey, category: &str, year: &str, round: Round) -> Option<u32> {
        self.cutoff_row(branch, category)?.cell(year, round)
    }

    /// Present cutoffs for `years` at one round, in the order `years` is given.
    ///
    /// Absent years are skipped, not zero-filled.
    pub fn series<S: AsRef<str>>(
        &self,
        branch: &BranchKey,
        category: &str,
        years: &[S],
        round: Round,
    ) -> Vec<(String, u32)> {
        let Some(row) = self.cutoff_row(branch, category) else {
            return Vec::new();
        };

        years
            .iter()
            .filter_map(|year| {
                let year = year.as_ref();
                row.cell(year, round).map(|rank| (year.to_string(), rank))
            })
            .collect()
    }
}
