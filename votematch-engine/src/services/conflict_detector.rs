//! Conflict detection across the issues mapped for one request
//!
//! Three independent sources are checked and every hit is reported, with no
//! deduplication between sources:
//! 1. Catalog conflict definitions whose issue pair is fully present
//! 2. Issue pairs whose policy approaches declare each other conflicting
//! 3. Issues whose declared opposing issue is also present
//!
//! Sources 2 and 3 are all-pairs checks, O(n²) in the number of mapped issues.
//! That is fine for tens of issues per request; revisit if requests start
//! mapping hundreds.

use votematch_common::{ConflictDefinition, ConflictSeverity, ConflictType, Issue};

/// Conflict detector over a fixed conflict table
pub struct ConflictDetector<'a> {
    table: &'a [ConflictDefinition],
}

impl<'a> ConflictDetector<'a> {
    pub fn new(table: &'a [ConflictDefinition]) -> Self {
        Self { table }
    }

    /// Detect conflicts among `issues` (distinct, in first-mapped order)
    pub fn detect(&self, issues: &[&Issue]) -> Vec<ConflictDefinition> {
        let mut conflicts = Vec::new();
        let ids: Vec<&str> = issues.iter().map(|i| i.id.as_str()).collect();

        // Source 1: declared pairs
        conflicts.extend(
            self.table
                .iter()
                .filter(|c| c.applies_to(&ids))
                .cloned(),
        );

        // Source 2: mutually conflicting policy approaches
        for (i, a) in issues.iter().enumerate() {
            for b in &issues[i + 1..] {
                if let Some((approach_a, approach_b)) = mutual_approach_conflict(a, b) {
                    conflicts.push(ConflictDefinition {
                        issues: (a.id.clone(), b.id.clone()),
                        reason: format!(
                            "{} favors '{}' while {} favors '{}'",
                            a.name, approach_a, b.name, approach_b
                        ),
                        severity: ConflictSeverity::Medium,
                        conflict_type: ConflictType::Policy,
                        compromises: Vec::new(),
                    });
                }
            }
        }

        // Source 3: declared opposition
        for issue in issues {
            for opposing in &issue.opposing_issues {
                if let Some(other) = issues.iter().find(|i| &i.id == opposing) {
                    conflicts.push(ConflictDefinition {
                        issues: (issue.id.clone(), other.id.clone()),
                        reason: format!("{} is generally opposed to {}", issue.name, other.name),
                        severity: ConflictSeverity::High,
                        conflict_type: ConflictType::Policy,
                        compromises: Vec::new(),
                    });
                }
            }
        }

        tracing::debug!(
            issues = issues.len(),
            conflicts = conflicts.len(),
            "Conflict detection complete"
        );

        conflicts
    }
}

/// First approach pair (one from each issue) that lists the other as conflicting
fn mutual_approach_conflict<'i>(a: &'i Issue, b: &'i Issue) -> Option<(&'i str, &'i str)> {
    a.policy_approaches.iter().find_map(|pa| {
        b.policy_approaches
            .iter()
            .find(|pb| pa.conflicts_with.contains(&pb.name) && pb.conflicts_with.contains(&pa.name))
            .map(|pb| (pa.name.as_str(), pb.name.as_str()))
    })
}
