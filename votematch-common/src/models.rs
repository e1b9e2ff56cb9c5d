//! Static domain models
//!
//! Everything in this module is loaded once from the static catalog and is
//! immutable for the lifetime of the process. Per-request types live in the
//! engine crate.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Issue Taxonomy
// ============================================================================

/// Policy domain an issue belongs to
///
/// Declaration order is significant: it breaks ties when ranking dominant
/// categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCategory {
    Economy,
    Education,
    Healthcare,
    Environment,
    Infrastructure,
    Housing,
    PublicSafety,
    CriminalJustice,
    Immigration,
    CivilRights,
    ForeignPolicy,
    Defense,
    Energy,
    Agriculture,
    Technology,
    Labor,
    SocialServices,
    GovernmentReform,
    Veterans,
    GunPolicy,
}

impl IssueCategory {
    /// All categories in declaration order
    pub const ALL: [IssueCategory; 20] = [
        IssueCategory::Economy,
        IssueCategory::Education,
        IssueCategory::Healthcare,
        IssueCategory::Environment,
        IssueCategory::Infrastructure,
        IssueCategory::Housing,
        IssueCategory::PublicSafety,
        IssueCategory::CriminalJustice,
        IssueCategory::Immigration,
        IssueCategory::CivilRights,
        IssueCategory::ForeignPolicy,
        IssueCategory::Defense,
        IssueCategory::Energy,
        IssueCategory::Agriculture,
        IssueCategory::Technology,
        IssueCategory::Labor,
        IssueCategory::SocialServices,
        IssueCategory::GovernmentReform,
        IssueCategory::Veterans,
        IssueCategory::GunPolicy,
    ];

    /// Lowercase human-readable label, used when matching measure categories
    /// against priority text
    pub fn label(self) -> &'static str {
        match self {
            Self::Economy => "economy",
            Self::Education => "education",
            Self::Healthcare => "healthcare",
            Self::Environment => "environment",
            Self::Infrastructure => "infrastructure",
            Self::Housing => "housing",
            Self::PublicSafety => "public safety",
            Self::CriminalJustice => "criminal justice",
            Self::Immigration => "immigration",
            Self::CivilRights => "civil rights",
            Self::ForeignPolicy => "foreign policy",
            Self::Defense => "defense",
            Self::Energy => "energy",
            Self::Agriculture => "agriculture",
            Self::Technology => "technology",
            Self::Labor => "labor",
            Self::SocialServices => "social services",
            Self::GovernmentReform => "government reform",
            Self::Veterans => "veterans",
            Self::GunPolicy => "gun policy",
        }
    }

    /// Position in declaration order
    pub fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Named policy approach attached to an issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyApproach {
    pub name: String,
    /// Names of approaches (on any issue) this one cannot coexist with
    #[serde(default)]
    pub conflicts_with: Vec<String>,
}

/// Political issue from the static taxonomy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub name: String,
    pub category: IssueCategory,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub related_terms: Vec<String>,
    /// Multiplier applied to match signal, in [0.0, 1.0]
    pub weight: f64,
    #[serde(default)]
    pub policy_approaches: Vec<PolicyApproach>,
    #[serde(default)]
    pub opposing_issues: Vec<String>,
}

// ============================================================================
// Conflicts
// ============================================================================

/// Conflict severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    Low,
    Medium,
    High,
}

/// Nature of a conflict between two issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictType {
    /// Competing for the same budget or resources
    Resource,
    /// Hard to implement both at once
    Implementation,
    /// Directly opposing policy goals
    Policy,
}

/// Known tension between a pair of issues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictDefinition {
    /// Issue id pair
    pub issues: (String, String),
    pub reason: String,
    pub severity: ConflictSeverity,
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    #[serde(default)]
    pub compromises: Vec<String>,
}

impl ConflictDefinition {
    /// True if both issues of the pair are in `present`
    pub fn applies_to(&self, present: &[&str]) -> bool {
        present.contains(&self.issues.0.as_str()) && present.contains(&self.issues.1.as_str())
    }
}

// ============================================================================
// Candidates and Ballot Measures
// ============================================================================

/// Candidate stance on an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Support,
    Oppose,
    Neutral,
}

impl Stance {
    /// Verb phrase used in rationale text
    pub fn as_phrase(self) -> &'static str {
        match self {
            Stance::Support => "supports",
            Stance::Oppose => "opposes",
            Stance::Neutral => "is neutral on",
        }
    }
}

/// Declared candidate position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Free-text issue label, e.g. "taxes"
    pub issue: String,
    pub stance: Stance,
    /// Strength of commitment, in [0.0, 1.0]
    pub strength: f64,
}

/// Candidate from the static roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub party: String,
    pub office: String,
    #[serde(default)]
    pub positions: Vec<Position>,
}

/// Ballot measure from the static roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotMeasure {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Location codes (e.g. ZIP codes) where the measure is on the ballot
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub supporters: Vec<String>,
    #[serde(default)]
    pub opposers: Vec<String>,
    #[serde(default)]
    pub categories: Vec<IssueCategory>,
}

impl BallotMeasure {
    /// Exact (unnormalized) location membership
    pub fn applies_to(&self, location: &str) -> bool {
        self.locations.iter().any(|l| l == location)
    }
}

// ============================================================================
// Request Mode
// ============================================================================

/// Which ballot data set the request is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Current,
    Demo,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Current => "current",
            Mode::Demo => "demo",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(Mode::Current),
            "demo" => Ok(Mode::Demo),
            other => Err(Error::Validation(format!(
                "Unknown mode '{}' (expected 'current' or 'demo')",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order_matches_declaration() {
        for (i, category) in IssueCategory::ALL.iter().enumerate() {
            assert_eq!(category.ordinal(), i);
        }
    }

    #[test]
    fn test_category_serializes_screaming_snake() {
        let json = serde_json::to_string(&IssueCategory::PublicSafety).unwrap();
        assert_eq!(json, "\"PUBLIC_SAFETY\"");
        let parsed: IssueCategory = serde_json::from_str("\"GUN_POLICY\"").unwrap();
        assert_eq!(parsed, IssueCategory::GunPolicy);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("current".parse::<Mode>().unwrap(), Mode::Current);
        assert_eq!("demo".parse::<Mode>().unwrap(), Mode::Demo);
        assert!(matches!("DEMO".parse::<Mode>(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_measure_location_is_exact() {
        let measure = BallotMeasure {
            id: "m".to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
            locations: vec!["94110".to_string()],
            supporters: vec![],
            opposers: vec![],
            categories: vec![],
        };
        assert!(measure.applies_to("94110"));
        assert!(!measure.applies_to(" 94110"));
        assert!(!measure.applies_to("9411"));
    }

    #[test]
    fn test_conflict_applies_only_when_pair_present() {
        let conflict = ConflictDefinition {
            issues: ("taxes".to_string(), "education".to_string()),
            reason: "r".to_string(),
            severity: ConflictSeverity::Medium,
            conflict_type: ConflictType::Resource,
            compromises: vec![],
        };
        assert!(conflict.applies_to(&["education", "taxes"]));
        assert!(!conflict.applies_to(&["taxes"]));
    }
}
