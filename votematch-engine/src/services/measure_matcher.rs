//! Measure Matcher Service
//!
//! Scores ballot measures against a priority analysis and a location.
//!
//! Location filtering is exact string equality. When no measure applies to
//! the location, the whole roster is scored instead and every match is marked
//! `is_fallback`, so callers never receive zero measures from a non-empty
//! roster. An empty roster is a `MatchError::Measure`.

use crate::error::MatchError;
use crate::types::{clamp_score, BallotMeasureMatch, ImpactAnalysis, MatchOptions, PriorityAnalysis};
use std::sync::Arc;
use votematch_common::{BallotMeasure, Catalog, IssueCategory};

/// Relevance every measure starts from
const BASE_RELEVANCE: f64 = 0.5;

/// Relevance added per (category, priority) hit
const RELEVANCE_INCREMENT: f64 = 0.1;

/// Seam for ballot measure scoring
pub trait MeasureMatching: Send + Sync {
    fn find_relevant_measures(
        &self,
        analysis: &PriorityAnalysis,
        location: &str,
        options: &MatchOptions,
    ) -> Result<Vec<BallotMeasureMatch>, MatchError>;
}

/// Roster-backed measure matcher
pub struct MeasureMatcher {
    catalog: Arc<Catalog>,
}

impl MeasureMatcher {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    fn score_measure(
        &self,
        measure: &BallotMeasure,
        priorities: &[&str],
        location: &str,
        is_fallback: bool,
    ) -> BallotMeasureMatch {
        let title = measure.title.to_lowercase();
        let description = measure.description.to_lowercase();

        let mut relevance = BASE_RELEVANCE;
        let mut matched_categories: Vec<IssueCategory> = Vec::new();
        let mut relevant: Vec<String> = Vec::new();

        for category in &measure.categories {
            for &priority in priorities {
                let lowered = priority.trim().to_lowercase();
                if lowered.is_empty() {
                    continue;
                }
                let hit = lowered.contains(category.label())
                    || title.contains(&lowered)
                    || description.contains(&lowered);
                if hit {
                    relevance = clamp_score(relevance + RELEVANCE_INCREMENT);
                    if !matched_categories.contains(category) {
                        matched_categories.push(*category);
                    }
                    if !relevant.iter().any(|r| r == priority) {
                        relevant.push(priority.to_string());
                    }
                }
            }
        }

        let explanation = explanation(
            matched_categories.first().copied(),
            relevant.first().map(String::as_str),
            priorities.first().copied(),
        );

        BallotMeasureMatch {
            measure: measure.clone(),
            relevance_score: clamp_score(relevance),
            pros: measure
                .supporters
                .iter()
                .map(|s| format!("Supported by {}", s))
                .collect(),
            cons: measure
                .opposers
                .iter()
                .map(|o| format!("Opposed by {}", o))
                .collect(),
            impact_analysis: impact_analysis(measure, &matched_categories, &relevant, location, is_fallback),
            relevant_priorities: relevant,
            explanation,
            is_fallback,
        }
    }
}

impl MeasureMatching for MeasureMatcher {
    fn find_relevant_measures(
        &self,
        analysis: &PriorityAnalysis,
        location: &str,
        options: &MatchOptions,
    ) -> Result<Vec<BallotMeasureMatch>, MatchError> {
        if self.catalog.measures.is_empty() {
            return Err(MatchError::Measure("Ballot measure roster is empty".to_string()));
        }

        let priorities: Vec<&str> = analysis.priority_texts().collect();

        let local: Vec<&BallotMeasure> = self
            .catalog
            .measures
            .iter()
            .filter(|m| m.applies_to(location))
            .collect();

        let is_fallback = local.is_empty();
        let pool: Vec<&BallotMeasure> = if is_fallback {
            tracing::warn!(
                location = %location,
                "No ballot measures for location, falling back to full roster"
            );
            self.catalog.measures.iter().collect()
        } else {
            local
        };

        let mut results: Vec<BallotMeasureMatch> = pool
            .into_iter()
            .map(|m| self.score_measure(m, &priorities, location, is_fallback))
            .collect();

        // Stable: ties keep roster order
        results.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));

        tracing::info!(
            mode = %options.mode,
            location = %location,
            measures = results.len(),
            is_fallback,
            "Ballot measure matching complete"
        );

        Ok(results)
    }
}

fn explanation(
    category: Option<IssueCategory>,
    matched_priority: Option<&str>,
    first_priority: Option<&str>,
) -> String {
    match (category, matched_priority, first_priority) {
        (Some(category), Some(priority), _) => format!(
            "This measure addresses {}, which relates to your priority \"{}\".",
            category, priority
        ),
        (_, _, Some(first)) => format!(
            "This measure has no direct connection to your priorities, but may still affect your priority \"{}\".",
            first
        ),
        _ => "This measure appears on the ballot; no specific priorities were provided to compare."
            .to_string(),
    }
}

fn impact_analysis(
    measure: &BallotMeasure,
    matched_categories: &[IssueCategory],
    relevant: &[String],
    location: &str,
    is_fallback: bool,
) -> ImpactAnalysis {
    let mut impact = ImpactAnalysis::default();

    for category in matched_categories {
        impact
            .positive
            .push(format!("Could advance {} goals you care about", category));
    }
    for priority in relevant {
        impact
            .positive
            .push(format!("Directly relevant to your priority \"{}\"", priority));
    }

    if !measure.opposers.is_empty() {
        impact.negative.push(format!(
            "Opponents ({}) cite costs or trade-offs",
            measure.opposers.join(", ")
        ));
    }

    if is_fallback {
        impact.uncertain.push(format!(
            "Not confirmed to appear on the ballot for location {}",
            location
        ));
    }
    if relevant.is_empty() {
        impact
            .uncertain
            .push("Limited connection to your stated priorities".to_string());
    }

    impact
}
