//! Read-only catalog of colleges, clusters, branches, categories and cutoff history.
//!
//! The catalog is imported in one batch from CSV exports and frozen into a
//! [`CatalogSnapshot`]; nothing in this crate mutates it afterwards.

pub mod domain;
pub mod import;
pub mod query;
pub mod router;
pub mod snapshot;

pub use domain::{
    parse_cell, Branch, BranchKey, Category, Cluster, College, CutoffRow, Round, UnknownRound,
    CUTOFF_YEARS,
};
pub use import::{CatalogImportError, CatalogImporter, CatalogReaders};
pub use query::{BranchCutoffView, BranchView, CollegeDetail, CutoffMatrixView, SearchResults};
pub use router::catalog_router;
pub use snapshot::{CatalogError, CatalogParts, CatalogSnapshot};
