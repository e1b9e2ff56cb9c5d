//! Static catalog: issue taxonomy, conflict table, candidate and measure rosters
//!
//! Loaded once at process start and shared read-only (`Arc<Catalog>`) by all
//! matchers. Loading validates cross-references so matchers never have to
//! handle dangling issue ids.

use crate::models::{BallotMeasure, Candidate, ConflictDefinition, Issue};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

const TAXONOMY_FILE: &str = "taxonomy.json";
const CONFLICTS_FILE: &str = "conflicts.json";
const CANDIDATES_FILE: &str = "candidates.json";
const MEASURES_FILE: &str = "measures.json";

const BUILTIN_TAXONOMY: &str = include_str!("../data/taxonomy.json");
const BUILTIN_CONFLICTS: &str = include_str!("../data/conflicts.json");
const BUILTIN_CANDIDATES: &str = include_str!("../data/candidates.json");
const BUILTIN_MEASURES: &str = include_str!("../data/measures.json");

/// Immutable static data consumed by the matching engine
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// Issues in declaration order; the first issue is the mapping fallback
    pub issues: Vec<Issue>,
    pub conflicts: Vec<ConflictDefinition>,
    pub candidates: Vec<Candidate>,
    pub measures: Vec<BallotMeasure>,
}

impl Catalog {
    /// Build and validate a catalog from already-parsed parts
    pub fn new(
        issues: Vec<Issue>,
        conflicts: Vec<ConflictDefinition>,
        candidates: Vec<Candidate>,
        measures: Vec<BallotMeasure>,
    ) -> Result<Self> {
        let catalog = Self {
            issues,
            conflicts,
            candidates,
            measures,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Catalog compiled into the binary
    pub fn builtin() -> Result<Self> {
        let catalog = Self::new(
            serde_json::from_str(BUILTIN_TAXONOMY)?,
            serde_json::from_str(BUILTIN_CONFLICTS)?,
            serde_json::from_str(BUILTIN_CANDIDATES)?,
            serde_json::from_str(BUILTIN_MEASURES)?,
        )?;
        info!(
            issues = catalog.issues.len(),
            conflicts = catalog.conflicts.len(),
            candidates = catalog.candidates.len(),
            measures = catalog.measures.len(),
            "Loaded built-in catalog"
        );
        Ok(catalog)
    }

    /// Load the four catalog files from `dir`
    ///
    /// # Errors
    /// Returns error if any file is missing, malformed, or fails validation
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let catalog = Self::new(
            read_json(&dir.join(TAXONOMY_FILE))?,
            read_json(&dir.join(CONFLICTS_FILE))?,
            read_json(&dir.join(CANDIDATES_FILE))?,
            read_json(&dir.join(MEASURES_FILE))?,
        )?;
        info!(
            dir = %dir.display(),
            issues = catalog.issues.len(),
            conflicts = catalog.conflicts.len(),
            candidates = catalog.candidates.len(),
            measures = catalog.measures.len(),
            "Loaded catalog from data directory"
        );
        Ok(catalog)
    }

    /// Load from `dir` when given, otherwise the built-in catalog
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::load_dir(dir),
            None => Self::builtin(),
        }
    }

    /// Look up an issue by id
    pub fn issue(&self, id: &str) -> Option<&Issue> {
        self.issues.iter().find(|issue| issue.id == id)
    }

    fn validate(&self) -> Result<()> {
        if self.issues.is_empty() {
            return Err(Error::Catalog("Issue taxonomy is empty".to_string()));
        }

        let mut ids = HashSet::new();
        for issue in &self.issues {
            if !ids.insert(issue.id.as_str()) {
                return Err(Error::Catalog(format!("Duplicate issue id: {}", issue.id)));
            }
            if !(0.0..=1.0).contains(&issue.weight) {
                return Err(Error::Catalog(format!(
                    "Issue {} weight out of range: {}",
                    issue.id, issue.weight
                )));
            }
        }

        for issue in &self.issues {
            for opposing in &issue.opposing_issues {
                if !ids.contains(opposing.as_str()) {
                    return Err(Error::Catalog(format!(
                        "Issue {} lists unknown opposing issue: {}",
                        issue.id, opposing
                    )));
                }
            }
        }

        for conflict in &self.conflicts {
            for id in [&conflict.issues.0, &conflict.issues.1] {
                if !ids.contains(id.as_str()) {
                    return Err(Error::Catalog(format!(
                        "Conflict references unknown issue: {}",
                        id
                    )));
                }
            }
        }

        let mut candidate_ids = HashSet::new();
        for candidate in &self.candidates {
            if !candidate_ids.insert(candidate.id.as_str()) {
                return Err(Error::Catalog(format!(
                    "Duplicate candidate id: {}",
                    candidate.id
                )));
            }
            for position in &candidate.positions {
                if !(0.0..=1.0).contains(&position.strength) {
                    return Err(Error::Catalog(format!(
                        "Candidate {} position '{}' strength out of range: {}",
                        candidate.id, position.issue, position.strength
                    )));
                }
            }
        }

        let mut measure_ids = HashSet::new();
        for measure in &self.measures {
            if !measure_ids.insert(measure.id.as_str()) {
                return Err(Error::Catalog(format!("Duplicate measure id: {}", measure.id)));
            }
        }

        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Catalog(format!("Read {} failed: {}", path.display(), e)))?;
    Ok(serde_json::from_str(&content)?)
}
