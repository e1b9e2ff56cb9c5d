//! Candidate Matcher Service
//!
//! Scores the candidate roster against a priority analysis. Every candidate
//! gets an entry (unmatched candidates sit at the score floor), so a
//! non-empty roster never yields an empty result. An empty roster is a
//! `MatchError::Candidate`.

use crate::error::MatchError;
use crate::types::{clamp_score, CandidateMatch, MatchOptions, PriorityAnalysis};
use std::sync::Arc;
use votematch_common::{Candidate, Catalog, Position};

/// Score added per position hit, scaled by position strength
const POSITION_INCREMENT: f64 = 0.2;

/// Starting alignment for every candidate
const SCORE_FLOOR: f64 = 0.0;

/// Seam for candidate scoring
pub trait CandidateMatching: Send + Sync {
    fn find_matching_candidates(
        &self,
        analysis: &PriorityAnalysis,
        options: &MatchOptions,
    ) -> Result<Vec<CandidateMatch>, MatchError>;
}

/// Roster-backed candidate matcher
pub struct CandidateMatcher {
    catalog: Arc<Catalog>,
}

impl CandidateMatcher {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    fn score_candidate(&self, candidate: &Candidate, priorities: &[&str]) -> CandidateMatch {
        let mut score = SCORE_FLOOR;
        let mut matched: Vec<String> = Vec::new();
        let mut hits: Vec<(&Position, &str)> = Vec::new();

        for position in &candidate.positions {
            for &priority in priorities {
                if position_hits(&position.issue, priority) {
                    score = clamp_score(score + POSITION_INCREMENT * position.strength);
                    hits.push((position, priority));
                    if !matched.iter().any(|m| m == priority) {
                        matched.push(priority.to_string());
                    }
                }
            }
        }

        let rationale = rationale(candidate, &hits, priorities);

        if matched.is_empty() {
            if let Some(first) = priorities.first() {
                matched.push(first.to_string());
            }
        }

        CandidateMatch {
            candidate: candidate.clone(),
            alignment_score: clamp_score(score),
            matched_priorities: matched,
            rationale,
        }
    }
}

impl CandidateMatching for CandidateMatcher {
    fn find_matching_candidates(
        &self,
        analysis: &PriorityAnalysis,
        options: &MatchOptions,
    ) -> Result<Vec<CandidateMatch>, MatchError> {
        if self.catalog.candidates.is_empty() {
            return Err(MatchError::Candidate("Candidate roster is empty".to_string()));
        }

        let priorities: Vec<&str> = analysis.priority_texts().collect();

        let mut results: Vec<CandidateMatch> = self
            .catalog
            .candidates
            .iter()
            .map(|c| self.score_candidate(c, &priorities))
            .collect();

        // Stable: ties keep roster order
        results.sort_by(|a, b| b.alignment_score.total_cmp(&a.alignment_score));

        tracing::info!(
            mode = %options.mode,
            candidates = results.len(),
            top_score = ?results.first().map(|c| c.alignment_score),
            "Candidate matching complete"
        );

        Ok(results)
    }
}

/// Bidirectional, case-insensitive substring containment
fn position_hits(label: &str, priority: &str) -> bool {
    let label = label.trim().to_lowercase();
    let priority = priority.trim().to_lowercase();
    if label.is_empty() || priority.is_empty() {
        return false;
    }
    priority.contains(&label) || label.contains(&priority)
}

/// Rationale naming a supplied priority verbatim whenever one exists
fn rationale(candidate: &Candidate, hits: &[(&Position, &str)], priorities: &[&str]) -> String {
    if let Some((position, priority)) = hits.first() {
        let mut text = format!(
            "{} ({}, {}) {} {}, which aligns with your priority \"{}\"",
            candidate.name,
            candidate.party,
            candidate.office,
            position.stance.as_phrase(),
            position.issue,
            priority
        );
        if hits.len() > 1 {
            text.push_str(&format!(" and {} other position match(es)", hits.len() - 1));
        }
        text.push('.');
        return text;
    }

    match priorities.first() {
        Some(first) => format!(
            "{} ({}, {}) has no stated positions that directly address your priority \"{}\".",
            candidate.name, candidate.party, candidate.office, first
        ),
        None => format!(
            "{} ({}, {}) is on your ballot; no specific priorities were provided to compare.",
            candidate.name, candidate.party, candidate.office
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MappedPriority;
    use votematch_common::{Mode, Stance};

    fn options() -> MatchOptions {
        MatchOptions {
            mode: Mode::Current,
            location: "94110".to_string(),
        }
    }

    fn analysis(priorities: &[&str]) -> PriorityAnalysis {
        PriorityAnalysis {
            mapped_priorities: priorities
                .iter()
                .map(|p| MappedPriority {
                    priority: p.to_string(),
                    matches: vec![],
                })
                .collect(),
            ..Default::default()
        }
    }

    fn candidate(id: &str, positions: &[(&str, f64)]) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: id.to_uppercase(),
            party: "Independent".to_string(),
            office: "Mayor".to_string(),
            positions: positions
                .iter()
                .map(|(issue, strength)| Position {
                    issue: issue.to_string(),
                    stance: Stance::Support,
                    strength: *strength,
                })
                .collect(),
        }
    }

    fn matcher(candidates: Vec<Candidate>) -> CandidateMatcher {
        let mut catalog = Catalog::builtin().unwrap();
        catalog.candidates = candidates;
        CandidateMatcher::new(Arc::new(catalog))
    }

    #[test]
    fn test_position_hits_bidirectional() {
        assert!(position_hits("taxes", "I want lower taxes"));
        assert!(position_hits("public transit expansion", "Public Transit"));
        assert!(!position_hits("housing", "Fix the roads"));
        assert!(!position_hits("", "Fix the roads"));
    }

    #[test]
    fn test_score_accumulates_by_strength() {
        let m = matcher(vec![candidate("a", &[("taxes", 0.5), ("roads", 1.0)])]);
        let results = m
            .find_matching_candidates(&analysis(&["Lower taxes", "Fix the roads"]), &options())
            .unwrap();
        assert!((results[0].alignment_score - 0.3).abs() < 1e-9);
        assert_eq!(results[0].matched_priorities, vec!["Lower taxes", "Fix the roads"]);
    }

    #[test]
    fn test_score_clamped_to_one() {
        let positions: Vec<(&str, f64)> = vec![("taxes", 1.0); 8];
        let m = matcher(vec![candidate("a", &positions)]);
        let results = m
            .find_matching_candidates(&analysis(&["taxes"]), &options())
            .unwrap();
        assert_eq!(results[0].alignment_score, 1.0);
    }

    #[test]
    fn test_unmatched_candidate_still_listed() {
        let m = matcher(vec![candidate("a", &[("housing", 0.9)]), candidate("b", &[("roads", 0.9)])]);
        let results = m
            .find_matching_candidates(&analysis(&["Fix the roads"]), &options())
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].candidate.id, "b");
        assert_eq!(results[1].alignment_score, SCORE_FLOOR);
        assert_eq!(results[1].matched_priorities, vec!["Fix the roads"]);
        assert!(results[1].rationale.contains("Fix the roads"));
    }

    #[test]
    fn test_rationale_quotes_matched_priority() {
        let m = matcher(vec![candidate("a", &[("schools", 0.7)])]);
        let results = m
            .find_matching_candidates(&analysis(&["Fix the roads", "Better public schools"]), &options())
            .unwrap();
        assert!(results[0].rationale.contains("\"Better public schools\""));
    }

    #[test]
    fn test_empty_priorities_still_return_roster() {
        let m = matcher(vec![candidate("a", &[("taxes", 0.9)]), candidate("b", &[])]);
        let results = m.find_matching_candidates(&analysis(&[]), &options()).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.matched_priorities.is_empty()));
        assert!(results.iter().all(|r| !r.rationale.is_empty()));
    }

    #[test]
    fn test_empty_roster_is_match_error() {
        let m = matcher(vec![]);
        let result = m.find_matching_candidates(&analysis(&["Fix the roads"]), &options());
        assert!(matches!(result, Err(MatchError::Candidate(_))));
    }

    #[test]
    fn test_ties_keep_roster_order() {
        let m = matcher(vec![
            candidate("first", &[]),
            candidate("second", &[]),
            candidate("third", &[]),
        ]);
        let results = m
            .find_matching_candidates(&analysis(&["Fix the roads"]), &options())
            .unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.candidate.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_builtin_roster_sorted_descending() {
        let m = CandidateMatcher::new(Arc::new(Catalog::builtin().unwrap()));
        let results = m
            .find_matching_candidates(&analysis(&["I want lower taxes", "Fix the roads"]), &options())
            .unwrap();
        assert!(!results.is_empty());
        for pair in results.windows(2) {
            assert!(pair[0].alignment_score >= pair[1].alignment_score);
        }
        assert_eq!(results[0].candidate.id, "cand-chen");
    }
}
