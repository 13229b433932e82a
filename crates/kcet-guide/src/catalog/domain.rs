use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Years covered by the imported cutoff matrix, oldest first.
pub const CUTOFF_YEARS: [&str; 4] = ["2022", "2023", "2024", "2025"];

/// Raw cell values that mean "no cutoff recorded".
const ABSENT_TOKENS: [&str; 3] = ["NA", "-", "nan"];

/// Composite unique key of a branch (college code + branch code, e.g. `E001CS`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchKey(pub String);

impl BranchKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct College {
    pub code: String,
    pub name: String,
    pub location: String,
}

/// Grouping used to scope recommendations (geographic or administrative).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub key: BranchKey,
    pub college_code: String,
    pub cluster_code: String,
    pub code: String,
    pub name: String,
}

/// Admission category plus the categories it may additionally draw eligibility from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub code: String,
    pub fallback: Vec<String>,
}

impl Category {
    /// Builds a category from the stored comma-separated fallback list.
    pub fn from_stored(code: impl Into<String>, fall_back: &str) -> Self {
        Self {
            code: code.into(),
            fallback: parse_fallback_list(fall_back),
        }
    }
}

pub fn parse_fallback_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sequential counselling round within one admission year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Round {
    R1,
    R2,
    R3,
}

impl Round {
    pub const ALL: [Round; 3] = [Round::R1, Round::R2, Round::R3];

    pub fn label(self) -> &'static str {
        match self {
            Round::R1 => "R1",
            Round::R2 => "R2",
            Round::R3 => "R3",
        }
    }

    /// Column suffix used by the stored matrix (`r1`, `r2`, `r3`).
    pub fn column_suffix(self) -> &'static str {
        match self {
            Round::R1 => "r1",
            Round::R2 => "r2",
            Round::R3 => "r3",
        }
    }

    /// Parses a round, falling back to `R1` for anything unrecognised.
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or(Round::R1)
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown counselling round '{0}' (expected R1, R2 or R3)")]
pub struct UnknownRound(pub String);

impl FromStr for Round {
    type Err = UnknownRound;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "R1" => Ok(Round::R1),
            "R2" => Ok(Round::R2),
            "R3" => Ok(Round::R3),
            _ => Err(UnknownRound(value.to_string())),
        }
    }
}

/// Cutoff history for one (branch, category): a sparse year x round matrix of raw cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutoffRow {
    pub branch: BranchKey,
    pub category: String,
    cells: BTreeMap<(String, Round), String>,
}

impl CutoffRow {
    pub fn new(branch: BranchKey, category: impl Into<String>) -> Self {
        Self {
            branch,
            category: category.into(),
            cells: BTreeMap::new(),
        }
    }

    /// Stores a raw cell. Empty values are not recorded.
    pub fn with_cell(mut self, year: &str, round: Round, raw: Option<&str>) -> Self {
        self.set_cell(year, round, raw);
        self
    }

    pub fn set_cell(&mut self, year: &str, round: Round, raw: Option<&str>) {
        match raw {
            Some(value) if !value.is_empty() => {
                self.cells
                    .insert((year.to_string(), round), value.to_string());
            }
            _ => {
                self.cells.remove(&(year.to_string(), round));
            }
        }
    }

    /// Raw cell text exactly as imported.
    pub fn raw_cell(&self, year: &str, round: Round) -> Option<&str> {
        self.cells
            .get(&(year.to_string(), round))
            .map(String::as_str)
    }

    /// Parsed rank for a cell, or `None` when the cell is absent or unusable.
    pub fn cell(&self, year: &str, round: Round) -> Option<u32> {
        parse_cell(self.raw_cell(year, round))
    }
}

/// Interprets a stored cutoff cell.
///
/// Sentinels, blanks, non-integers and non-positive values all read as absent.
pub fn parse_cell(raw: Option<&str>) -> Option<u32> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || ABSENT_TOKENS.contains(&trimmed) {
        return None;
    }

    match trimmed.parse::<u32>() {
        Ok(rank) if rank > 0 => Some(rank),
        _ => None,
    }
}
