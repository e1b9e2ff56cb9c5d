//! Per-request types and data contracts between the matching stages
//!
//! Everything here is created fresh for a request and dropped once the
//! response is built (or cached). Static data types live in
//! `votematch_common::models`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use votematch_common::{
    BallotMeasure, Candidate, ConflictDefinition, Error, Issue, IssueCategory, Mode, Result,
};

/// Clamp a score into [0.0, 1.0]
///
/// NaN collapses to 0.0 so no score field can ever leave the unit range.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

// ============================================================================
// Priority Mapper Outputs
// ============================================================================

/// One issue matched by one priority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueMatch {
    pub issue: Issue,
    /// [0.0, 1.0]
    pub confidence: f64,
    pub matched_terms: Vec<String>,
}

/// A priority with its ranked issue matches (descending confidence)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedPriority {
    pub priority: String,
    pub matches: Vec<IssueMatch>,
}

/// Why a priority was set aside instead of mapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagType {
    Extreme,
    OutOfScope,
}

/// A priority rejected by a safety/scope pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlaggedPriority {
    pub priority: String,
    pub flag: FlagType,
    pub reason: String,
}

/// Complete result of analyzing a priority list
///
/// Every non-blank input priority appears in exactly one of
/// `mapped_priorities` or `flagged_priorities`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityAnalysis {
    pub mapped_priorities: Vec<MappedPriority>,
    /// At most 3, by descending frequency
    pub dominant_categories: Vec<IssueCategory>,
    pub potential_conflicts: Vec<ConflictDefinition>,
    pub flagged_priorities: Vec<FlaggedPriority>,
}

impl PriorityAnalysis {
    /// Original texts of mapped priorities, in input order
    pub fn priority_texts(&self) -> impl Iterator<Item = &str> {
        self.mapped_priorities.iter().map(|m| m.priority.as_str())
    }
}

// ============================================================================
// Matcher Outputs
// ============================================================================

/// Options shared by both matchers
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOptions {
    pub mode: Mode,
    pub location: String,
}

/// Candidate scored against a priority analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateMatch {
    pub candidate: Candidate,
    /// [0.0, 1.0]
    pub alignment_score: f64,
    pub matched_priorities: Vec<String>,
    pub rationale: String,
}

/// Impact statements for a ballot measure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactAnalysis {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub uncertain: Vec<String>,
}

/// Ballot measure scored against a priority analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotMeasureMatch {
    pub measure: BallotMeasure,
    /// [0.0, 1.0]
    pub relevance_score: f64,
    pub relevant_priorities: Vec<String>,
    pub explanation: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub impact_analysis: ImpactAnalysis,
    /// True when the location matched no measure and the whole roster was used
    pub is_fallback: bool,
}

// ============================================================================
// Orchestrator Input/Output
// ============================================================================

/// Recommendation request as it reaches the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub priorities: Vec<String>,
    pub location: String,
    #[serde(default)]
    pub mode: Mode,
    /// Skip the result cache (diagnostic/test traffic only)
    #[serde(default)]
    pub bypass_cache: bool,
}

impl RecommendationRequest {
    pub fn new(priorities: Vec<String>, location: impl Into<String>, mode: Mode) -> Self {
        Self {
            priorities,
            location: location.into(),
            mode,
            bypass_cache: false,
        }
    }

    /// Reject malformed requests before any matching runs
    ///
    /// # Errors
    /// `Error::Validation` if there is no non-blank priority or the location is blank
    pub fn validate(&self) -> Result<()> {
        if self.priorities.iter().all(|p| p.trim().is_empty()) {
            return Err(Error::Validation(
                "At least one non-empty priority is required".to_string(),
            ));
        }
        if self.location.trim().is_empty() {
            return Err(Error::Validation("Location is required".to_string()));
        }
        Ok(())
    }
}

/// Candidate as presented to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecommendation {
    pub id: String,
    pub name: String,
    pub party: String,
    pub office: String,
    pub alignment_score: f64,
    pub matched_priorities: Vec<String>,
    pub rationale: String,
}

impl From<CandidateMatch> for CandidateRecommendation {
    fn from(m: CandidateMatch) -> Self {
        Self {
            id: m.candidate.id,
            name: m.candidate.name,
            party: m.candidate.party,
            office: m.candidate.office,
            alignment_score: clamp_score(m.alignment_score),
            matched_priorities: m.matched_priorities,
            rationale: m.rationale,
        }
    }
}

/// Ballot measure as presented to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotMeasureRecommendation {
    pub id: String,
    pub title: String,
    pub description: String,
    pub relevance_score: f64,
    pub relevant_priorities: Vec<String>,
    pub explanation: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub impact_analysis: ImpactAnalysis,
    pub is_fallback: bool,
}

impl From<BallotMeasureMatch> for BallotMeasureRecommendation {
    fn from(m: BallotMeasureMatch) -> Self {
        Self {
            id: m.measure.id,
            title: m.measure.title,
            description: m.measure.description,
            relevance_score: clamp_score(m.relevance_score),
            relevant_priorities: m.relevant_priorities,
            explanation: m.explanation,
            pros: m.pros,
            cons: m.cons,
            impact_analysis: m.impact_analysis,
            is_fallback: m.is_fallback,
        }
    }
}

/// Thin derived view over the mapped priorities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRecommendations {
    pub top_policies: Vec<String>,
    pub explanation: String,
}

/// Final, always well-formed result of a recommendation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsResult {
    pub candidates: Vec<CandidateRecommendation>,
    pub ballot_measures: Vec<BallotMeasureRecommendation>,
    pub policy_recommendations: PolicyRecommendations,
    pub mode: Mode,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
