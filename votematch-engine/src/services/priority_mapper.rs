//! Priority Mapper Service
//!
//! Maps free-text voter priorities onto the static issue taxonomy.
//!
//! Per priority, in order:
//! 1. Skip if blank
//! 2. Screen against safety/scope patterns (flagged priorities are not mapped)
//! 3. Score every issue by synonym/related-term matching, weighted by issue weight
//! 4. Fall back to word overlap (then the first taxonomy issue) so no mapped
//!    priority ever has zero issues
//! 5. Apply compound-phrase category boosts
//!
//! Then aggregates dominant categories and detects conflicts across all
//! mapped issues.

use crate::services::conflict_detector::ConflictDetector;
use crate::services::scope_filter;
use crate::types::{clamp_score, IssueMatch, MappedPriority, PriorityAnalysis};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use votematch_common::{Catalog, Issue, IssueCategory};

/// Confidence assigned when no term matched and an issue was chosen by fallback
pub const FALLBACK_CONFIDENCE: f64 = 0.5;

/// Multiplier when a term matches at the very start of the priority
const START_BOOST: f64 = 1.2;

/// Maximum number of dominant categories reported
const MAX_DOMINANT_CATEGORIES: usize = 3;

/// Words ignored by the word-overlap fallback
const STOP_WORDS: &[&str] = &[
    "and", "the", "for", "with", "more", "less", "want", "need", "our", "their", "that", "this",
    "from", "into", "about", "should", "would", "better", "make", "stop", "all",
];

/// Multi-concept phrasings that add weight to categories beyond the matched
/// issues. A boost applies when every keyword appears in the priority.
const COMPOUND_BOOSTS: &[(&[&str], &[IssueCategory])] = &[
    (&["economic", "justice"], &[IssueCategory::Labor, IssueCategory::SocialServices]),
    (&["environmental", "health"], &[IssueCategory::Healthcare, IssueCategory::Environment]),
    (&["public", "health"], &[IssueCategory::Healthcare, IssueCategory::SocialServices]),
    (&["climate", "jobs"], &[IssueCategory::Labor, IssueCategory::Energy]),
    (&["rural", "broadband"], &[IssueCategory::Technology, IssueCategory::Agriculture]),
];

/// Priority mapper errors
#[derive(Debug, Error)]
pub enum MappingError {
    /// Taxonomy has no issues to map onto
    #[error("Issue taxonomy is empty")]
    EmptyTaxonomy,

    /// Mapping could not be completed
    #[error("Priority mapping failed: {0}")]
    Failed(String),
}

/// Seam for the first pipeline stage
pub trait PriorityMapping: Send + Sync {
    /// Analyze a list of free-text priorities
    fn analyze_priorities(&self, priorities: &[String]) -> Result<PriorityAnalysis, MappingError>;
}

/// Taxonomy-backed priority mapper
pub struct PriorityMapper {
    catalog: Arc<Catalog>,
}

impl PriorityMapper {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Map one (non-blank, unflagged) priority to ranked issue matches
    fn map_priority(&self, priority: &str) -> MappedPriority {
        let text = normalize(priority);

        let mut matches: Vec<IssueMatch> = self
            .catalog
            .issues
            .iter()
            .filter_map(|issue| score_issue(&text, issue))
            .collect();

        // Stable: equal confidences keep taxonomy order
        matches.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        if matches.is_empty() {
            let fallback = self.fallback_match(&text);
            tracing::debug!(
                priority = %priority,
                issue = %fallback.issue.id,
                "No term matched, using fallback issue"
            );
            matches.push(fallback);
        }

        tracing::debug!(
            priority = %priority,
            matches = matches.len(),
            top_issue = %matches[0].issue.id,
            top_confidence = matches[0].confidence,
            "Priority mapped"
        );

        MappedPriority {
            priority: priority.to_string(),
            matches,
        }
    }

    /// Issue with the most word overlap, else the first taxonomy issue
    fn fallback_match(&self, text: &str) -> IssueMatch {
        let words = significant_words(text);

        let mut best: Option<(&Issue, Vec<String>)> = None;
        for issue in &self.catalog.issues {
            let vocabulary = issue_vocabulary(issue);
            let overlap: Vec<String> = words
                .iter()
                .filter(|w| vocabulary.contains(*w))
                .cloned()
                .collect();
            let best_len = best.as_ref().map_or(0, |(_, o)| o.len());
            if overlap.len() > best_len {
                best = Some((issue, overlap));
            }
        }

        let (issue, matched_terms) = match best {
            Some((issue, overlap)) => (issue, overlap),
            None => (&self.catalog.issues[0], Vec::new()),
        };

        IssueMatch {
            issue: issue.clone(),
            confidence: FALLBACK_CONFIDENCE,
            matched_terms,
        }
    }

    /// Top categories by count, ties broken by declaration order
    fn dominant_categories(&self, mapped: &[MappedPriority]) -> Vec<IssueCategory> {
        let mut counts = [0usize; IssueCategory::ALL.len()];

        for entry in mapped {
            let mut seen = HashSet::new();
            for m in &entry.matches {
                if seen.insert(m.issue.category) {
                    counts[m.issue.category.ordinal()] += 1;
                }
            }

            // Boosts only reach categories this priority's issues did not cover
            let text = normalize(&entry.priority);
            for (keywords, categories) in COMPOUND_BOOSTS {
                if keywords.iter().all(|k| text.contains(k)) {
                    tracing::debug!(
                        priority = %entry.priority,
                        keywords = ?keywords,
                        "Compound phrase boost"
                    );
                    for category in *categories {
                        if seen.insert(*category) {
                            counts[category.ordinal()] += 1;
                        }
                    }
                }
            }
        }

        let mut ranked: Vec<IssueCategory> = IssueCategory::ALL
            .iter()
            .copied()
            .filter(|c| counts[c.ordinal()] > 0)
            .collect();
        // Stable: ALL is in declaration order
        ranked.sort_by(|a, b| counts[b.ordinal()].cmp(&counts[a.ordinal()]));
        ranked.truncate(MAX_DOMINANT_CATEGORIES);
        ranked
    }
}

impl PriorityMapping for PriorityMapper {
    fn analyze_priorities(&self, priorities: &[String]) -> Result<PriorityAnalysis, MappingError> {
        if self.catalog.issues.is_empty() {
            return Err(MappingError::EmptyTaxonomy);
        }

        let mut analysis = PriorityAnalysis::default();

        for priority in priorities {
            let trimmed = priority.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(flagged) = scope_filter::screen(trimmed) {
                tracing::warn!(
                    priority = %trimmed,
                    flag = ?flagged.flag,
                    reason = %flagged.reason,
                    "Priority flagged, excluded from mapping"
                );
                analysis.flagged_priorities.push(flagged);
                continue;
            }

            analysis.mapped_priorities.push(self.map_priority(trimmed));
        }

        analysis.dominant_categories = self.dominant_categories(&analysis.mapped_priorities);

        // Distinct issues in first-mapped order
        let mut seen = HashSet::new();
        let issues: Vec<&Issue> = analysis
            .mapped_priorities
            .iter()
            .flat_map(|m| m.matches.iter().map(|im| &im.issue))
            .filter(|issue| seen.insert(issue.id.as_str()))
            .collect();
        let conflicts = ConflictDetector::new(&self.catalog.conflicts).detect(&issues);
        analysis.potential_conflicts = conflicts;

        tracing::info!(
            mapped = analysis.mapped_priorities.len(),
            flagged = analysis.flagged_priorities.len(),
            dominant = ?analysis.dominant_categories,
            conflicts = analysis.potential_conflicts.len(),
            "Priority analysis complete"
        );

        Ok(analysis)
    }
}

/// Lowercase, trim, and drop trailing sentence punctuation
fn normalize(text: &str) -> String {
    text.trim()
        .trim_end_matches(|c: char| matches!(c, '.' | '!' | '?' | ','))
        .to_lowercase()
}

/// Score one issue against normalized priority text; `None` if nothing matched
///
/// Exact synonym match yields 1.0. Containment of a synonym or related term
/// yields term length / text length, boosted when the term starts the text,
/// so a related term equal to the whole text also reaches 1.0.
/// The best signal times the issue weight is the confidence.
fn score_issue(text: &str, issue: &Issue) -> Option<IssueMatch> {
    let text_len = text.chars().count();
    if text_len == 0 {
        return None;
    }

    let mut signal: f64 = 0.0;
    let mut matched_terms: Vec<String> = Vec::new();

    for synonym in &issue.synonyms {
        if synonym.to_lowercase() == text {
            signal = 1.0;
            matched_terms.push(synonym.clone());
        }
    }

    for term in issue.synonyms.iter().chain(issue.related_terms.iter()) {
        let lowered = term.to_lowercase();
        if lowered.is_empty() || !text.contains(&lowered) {
            continue;
        }
        let mut partial = lowered.chars().count() as f64 / text_len as f64;
        if text.starts_with(&lowered) {
            partial *= START_BOOST;
        }
        signal = signal.max(partial.min(1.0));
        if !matched_terms.contains(term) {
            matched_terms.push(term.clone());
        }
    }

    let confidence = clamp_score(signal * issue.weight);
    if confidence > 0.0 {
        Some(IssueMatch {
            issue: issue.clone(),
            confidence,
            matched_terms,
        })
    } else {
        None
    }
}

fn split_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
}

/// Words worth comparing in the overlap fallback
fn significant_words(text: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for word in split_words(text) {
        if word.chars().count() >= 3 && !STOP_WORDS.contains(&word.as_str()) && !words.contains(&word) {
            words.push(word);
        }
    }
    words
}

fn issue_vocabulary(issue: &Issue) -> HashSet<String> {
    std::iter::once(&issue.name)
        .chain(issue.synonyms.iter())
        .chain(issue.related_terms.iter())
        .flat_map(|term| split_words(term).collect::<Vec<_>>())
        .collect()
}
