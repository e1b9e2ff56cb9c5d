//! Tests for loading the static catalog from a data directory

use std::path::Path;
use tempfile::TempDir;
use votematch_common::{Catalog, Error, IssueCategory};

const TAXONOMY: &str = r#"[
  {
    "id": "parks",
    "name": "Parks",
    "category": "ENVIRONMENT",
    "synonyms": ["parks", "green space"],
    "weight": 0.8
  },
  {
    "id": "libraries",
    "name": "Libraries",
    "category": "EDUCATION",
    "relatedTerms": ["library hours"],
    "weight": 0.6
  }
]"#;

const CONFLICTS: &str = r#"[
  {
    "issues": ["parks", "libraries"],
    "reason": "Both compete for the same discretionary budget",
    "severity": "low",
    "type": "resource",
    "compromises": ["Shared facilities"]
  }
]"#;

const CANDIDATES: &str = r#"[
  {
    "id": "cand-park",
    "name": "Pat Park",
    "party": "Independent",
    "office": "City Council",
    "positions": [{ "issue": "parks", "stance": "support", "strength": 0.9 }]
  }
]"#;

const MEASURES: &str = r#"[
  {
    "id": "measure-1",
    "title": "Park Renovation Levy",
    "description": "Renovates neighborhood parks.",
    "locations": ["12345"],
    "categories": ["ENVIRONMENT"]
  }
]"#;

fn write_catalog(dir: &Path, taxonomy: &str, conflicts: &str) {
    std::fs::write(dir.join("taxonomy.json"), taxonomy).unwrap();
    std::fs::write(dir.join("conflicts.json"), conflicts).unwrap();
    std::fs::write(dir.join("candidates.json"), CANDIDATES).unwrap();
    std::fs::write(dir.join("measures.json"), MEASURES).unwrap();
}

#[test]
fn test_load_dir() {
    let temp_dir = TempDir::new().unwrap();
    write_catalog(temp_dir.path(), TAXONOMY, CONFLICTS);

    let catalog = Catalog::load(Some(temp_dir.path())).unwrap();
    assert_eq!(catalog.issues.len(), 2);
    assert_eq!(catalog.issues[0].id, "parks");
    assert_eq!(catalog.issue("libraries").unwrap().category, IssueCategory::Education);
    assert_eq!(catalog.conflicts[0].compromises, vec!["Shared facilities"]);
    assert!(catalog.measures[0].applies_to("12345"));
}

#[test]
fn test_load_without_dir_uses_builtin() {
    let catalog = Catalog::load(None).unwrap();
    assert_eq!(catalog, Catalog::builtin().unwrap());
}

#[test]
fn test_missing_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    write_catalog(temp_dir.path(), TAXONOMY, CONFLICTS);
    std::fs::remove_file(temp_dir.path().join("measures.json")).unwrap();

    assert!(Catalog::load_dir(temp_dir.path()).is_err());
}

#[test]
fn test_dangling_conflict_reference_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let conflicts = CONFLICTS.replace("\"libraries\"]", "\"museums\"]");
    write_catalog(temp_dir.path(), TAXONOMY, &conflicts);

    assert!(matches!(
        Catalog::load_dir(temp_dir.path()),
        Err(Error::Catalog(_))
    ));
}

#[test]
fn test_empty_taxonomy_rejected() {
    let temp_dir = TempDir::new().unwrap();
    write_catalog(temp_dir.path(), "[]", "[]");

    assert!(matches!(
        Catalog::load_dir(temp_dir.path()),
        Err(Error::Catalog(_))
    ));
}
