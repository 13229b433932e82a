mod parser;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use super::domain::{Branch, Category, Cluster, College, CutoffRow};
use super::snapshot::{CatalogError, CatalogParts, CatalogSnapshot};
use parser::{BranchRow, CategoryRow, ClusterRow, CollegeRow, CutoffCsvRow};

pub const COLLEGES_FILE: &str = "colleges.csv";
pub const CLUSTERS_FILE: &str = "clusters.csv";
pub const BRANCHES_FILE: &str = "branches.csv";
pub const CATEGORIES_FILE: &str = "categories.csv";
pub const CUTOFFS_FILE: &str = "cutoffs.csv";

#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid CSV data in {table}: {source}")]
    Csv {
        table: &'static str,
        source: csv::Error,
    },
    #[error("inconsistent catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// One reader per exported table.
pub struct CatalogReaders<R> {
    pub colleges: R,
    pub clusters: R,
    pub branches: R,
    pub categories: R,
    pub cutoffs: R,
}

/// Loads the batch-exported CSV tables into an immutable snapshot.
pub struct CatalogImporter;

impl CatalogImporter {
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<CatalogSnapshot, CatalogImportError> {
        let dir = dir.as_ref();
        let open = |name: &str| {
            let path = dir.join(name);
            File::open(&path).map_err(|source| CatalogImportError::Io { path, source })
        };

        Self::from_readers(CatalogReaders {
            colleges: open(COLLEGES_FILE)?,
            clusters: open(CLUSTERS_FILE)?,
            branches: open(BRANCHES_FILE)?,
            categories: open(CATEGORIES_FILE)?,
            cutoffs: open(CUTOFFS_FILE)?,
        })
    }

    pub fn from_readers<R: Read>(
        readers: CatalogReaders<R>,
    ) -> Result<CatalogSnapshot, CatalogImportError> {
        let colleges: Vec<College> = load_table::<_, CollegeRow, _>(readers.colleges, "colleges")?;
        let clusters: Vec<Cluster> = load_table::<_, ClusterRow, _>(readers.clusters, "clusters")?;
        let branches: Vec<Branch> = load_table::<_, BranchRow, _>(readers.branches, "branches")?;
        let categories: Vec<Category> =
            load_table::<_, CategoryRow, _>(readers.categories, "categories")?;
        let cutoffs: Vec<CutoffRow> =
            load_table::<_, CutoffCsvRow, _>(readers.cutoffs, "cutoffs")?;

        info!(
            colleges = colleges.len(),
            clusters = clusters.len(),
            branches = branches.len(),
            categories = categories.len(),
            cutoffs = cutoffs.len(),
            "catalog tables imported"
        );

        let snapshot = CatalogSnapshot::from_parts(CatalogParts {
            colleges,
            clusters,
            branches,
            categories,
            cutoffs,
        })?;
        Ok(snapshot)
    }
}

fn load_table<R, Row, T>(reader: R, table: &'static str) -> Result<Vec<T>, CatalogImportError>
where
    R: Read,
    Row: DeserializeOwned + Into<T>,
{
    let rows: Vec<Row> =
        parser::read_rows(reader).map_err(|source| CatalogImportError::Csv { table, source })?;
    Ok(rows.into_iter().map(Into::into).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::domain::{BranchKey, Round};
    use std::io::Cursor;

    const COLLEGES: &str = "college_code,college_name,location\n\
E001,University Visvesvaraya College of Engineering,Bangalore\n\
E020,National Institute of Engineering,\n";
    const CLUSTERS: &str = "cluster_code,cluster_name\nA,Computer Sciences\n";
    const BRANCHES: &str = "unique_key,college_code,cluster_code,branch_id,branch_name\n\
E001CS,E001,A,CS,Computer Science\n\
E020EC,E020,A,EC,Electronics and Communication\n";
    const CATEGORIES: &str = "category,fall_back\nGM,\n1G,\"1G, GM\"\n";
    const CUTOFF_HEADER: &str = "unique_key,category,cutoff_2022_r1,cutoff_2022_r2,cutoff_2022_r3,cutoff_2023_r1,cutoff_2023_r2,cutoff_2023_r3,cutoff_2024_r1,cutoff_2024_r2,cutoff_2024_r3,cutoff_2025_r1,cutoff_2025_r2,cutoff_2025_r3\n";

    fn readers(cutoffs: String) -> CatalogReaders<Cursor<Vec<u8>>> {
        CatalogReaders {
            colleges: Cursor::new(COLLEGES.as_bytes().to_vec()),
            clusters: Cursor::new(CLUSTERS.as_bytes().to_vec()),
            branches: Cursor::new(BRANCHES.as_bytes().to_vec()),
            categories: Cursor::new(CATEGORIES.as_bytes().to_vec()),
            cutoffs: Cursor::new(cutoffs.into_bytes()),
        }
    }

    #[test]
    fn importer_maps_matrix_columns_to_year_and_round() {
        let cutoffs = format!(
            "{CUTOFF_HEADER}E001CS,GM,1800,1900,2000,1750,NA,,1700,-,nan,1650,1700,1720\n"
        );
        let snapshot = CatalogImporter::from_readers(readers(cutoffs)).expect("import succeeds");
        let key = BranchKey::new("E001CS");

        assert_eq!(snapshot.cell(&key, "GM", "2022", Round::R3), Some(2000));
        assert_eq!(snapshot.cell(&key, "GM", "2023", Round::R1), Some(1750));
        assert_eq!(snapshot.cell(&key, "GM", "2023", Round::R2), None);
        assert_eq!(snapshot.cell(&key, "GM", "2023", Round::R3), None);
        assert_eq!(snapshot.cell(&key, "GM", "2024", Round::R2), None);
        assert_eq!(snapshot.cell(&key, "GM", "2025", Round::R2), Some(1700));

        let row = snapshot.cutoff_row(&key, "GM").expect("row present");
        assert_eq!(row.raw_cell("2024", Round::R3), Some("nan"));
    }

    #[test]
    fn importer_parses_fallback_lists_and_blank_locations() {
        let snapshot =
            CatalogImporter::from_readers(readers(CUTOFF_HEADER.to_string())).expect("import");

        let category = snapshot.category("1G").expect("category present");
        assert_eq!(category.fallback, vec!["1G".to_string(), "GM".to_string()]);
        assert!(snapshot.category("GM").expect("GM").fallback.is_empty());
        assert_eq!(snapshot.college("E020").expect("college").location, "");
    }

    #[test]
    fn importer_rejects_duplicate_cutoff_rows() {
        let cutoffs = format!(
            "{CUTOFF_HEADER}E001CS,GM,1,,,,,,,,,,,\nE001CS,GM,2,,,,,,,,,,,\n"
        );
        let error = CatalogImporter::from_readers(readers(cutoffs)).expect_err("duplicate");
        assert!(matches!(
            error,
            CatalogImportError::Catalog(CatalogError::DuplicateCutoff { .. })
        ));
    }

    #[test]
    fn importer_reports_malformed_csv_with_table_name() {
        let cutoffs = "category\nGM\n".to_string();
        let error = CatalogImporter::from_readers(readers(cutoffs)).expect_err("missing column");
        match error {
            CatalogImportError::Csv { table, .. } => assert_eq!(table, "cutoffs"),
            other => panic!("expected csv error, got {other:?}"),
        }
    }

    #[test]
    fn importer_from_dir_propagates_io_errors() {
        let error = CatalogImporter::from_dir("./does-not-exist").expect_err("expected io error");
        match error {
            CatalogImportError::Io { path, .. } => {
                assert!(path.ends_with(COLLEGES_FILE));
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
