use std::io::Read;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::catalog::domain::{
    Branch, BranchKey, Category, Cluster, College, CutoffRow, Round, CUTOFF_YEARS,
};

pub(crate) fn read_rows<R, T>(reader: R) -> Result<Vec<T>, csv::Error>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader.deserialize::<T>().collect()
}

#[derive(Debug, Deserialize)]
pub(crate) struct CollegeRow {
    college_code: String,
    college_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
}

impl From<CollegeRow> for College {
    fn from(row: CollegeRow) -> Self {
        College {
            code: row.college_code,
            name: row.college_name,
            location: row.location.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClusterRow {
    cluster_code: String,
    cluster_name: String,
}

impl From<ClusterRow> for Cluster {
    fn from(row: ClusterRow) -> Self {
        Cluster {
            code: row.cluster_code,
            name: row.cluster_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BranchRow {
    unique_key: String,
    college_code: String,
    cluster_code: String,
    branch_id: String,
    branch_name: String,
}

impl From<BranchRow> for Branch {
    fn from(row: BranchRow) -> Self {
        Branch {
            key: BranchKey(row.unique_key),
            college_code: row.college_code,
            cluster_code: row.cluster_code,
            code: row.branch_id,
            name: row.branch_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryRow {
    category: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    fall_back: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category::from_stored(row.category, row.fall_back.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CutoffCsvRow {
    unique_key: String,
    category: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cutoff_2022_r1: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cutoff_2022_r2: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cutoff_2022_r3: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cutoff_2023_r1: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cutoff_2023_r2: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cutoff_2023_r3: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cutoff_2024_r1: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cutoff_2024_r2: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cutoff_2024_r3: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cutoff_2025_r1: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cutoff_2025_r2: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cutoff_2025_r3: Option<String>,
}

impl CutoffCsvRow {
    fn columns(&self) -> [&Option<String>; 12] {
        [
            &self.cutoff_2022_r1,
            &self.cutoff_2022_r2,
            &self.cutoff_2022_r3,
            &self.cutoff_2023_r1,
            &self.cutoff_2023_r2,
            &self.cutoff_2023_r3,
            &self.cutoff_2024_r1,
            &self.cutoff_2024_r2,
            &self.cutoff_2024_r3,
            &self.cutoff_2025_r1,
            &self.cutoff_2025_r2,
            &self.cutoff_2025_r3,
        ]
    }
}

impl From<CutoffCsvRow> for CutoffRow {
    fn from(row: CutoffCsvRow) -> Self {
        let mut cutoff = CutoffRow::new(BranchKey(row.unique_key.clone()), row.category.clone());
        let cells = CUTOFF_YEARS
            .iter()
            .flat_map(|year| Round::ALL.iter().map(move |round| (*year, *round)));

        for ((year, round), value) in cells.zip(row.columns()) {
            cutoff.set_cell(year, round, value.as_deref());
        }

        cutoff
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
