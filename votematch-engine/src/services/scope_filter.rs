//! Safety and scope screening for free-text priorities
//!
//! Priorities advocating extra-judicial action, the abolition of core
//! government functions, or niche theories outside any policy domain are set
//! aside before mapping. Patterns are tested in order; first match wins.

use crate::types::{FlagType, FlaggedPriority};
use once_cell::sync::Lazy;
use regex::Regex;

struct ScopePattern {
    regex: Regex,
    flag: FlagType,
    reason: &'static str,
}

impl ScopePattern {
    fn new(pattern: &str, flag: FlagType, reason: &'static str) -> Self {
        Self {
            // Patterns are compile-time constants covered by unit tests
            regex: Regex::new(pattern).expect("invalid scope pattern"),
            flag,
            reason,
        }
    }
}

static PATTERNS: Lazy<Vec<ScopePattern>> = Lazy::new(|| {
    vec![
        ScopePattern::new(
            r"(?i)\b(vigilante\w*|lynch\w*)\b",
            FlagType::Extreme,
            "Advocates extra-judicial action",
        ),
        ScopePattern::new(
            r"(?i)\btake (the )?law into (our|my|their|your) own hands\b",
            FlagType::Extreme,
            "Advocates extra-judicial action",
        ),
        ScopePattern::new(
            r"(?i)\b(armed (uprising|revolution|insurrection)|violent(ly)? overthrow)\b",
            FlagType::Extreme,
            "Advocates violent action against the government",
        ),
        ScopePattern::new(
            r"(?i)\b(execute|hang|shoot)\b.*\b(politicians|officials|judges|journalists)\b",
            FlagType::Extreme,
            "Advocates violence against individuals",
        ),
        ScopePattern::new(
            r"(?i)\b(abolish|eliminate|get rid of)\b.*\b(all|the entire) (government|laws|courts)\b",
            FlagType::Extreme,
            "Calls for abolishing core government functions",
        ),
        ScopePattern::new(
            r"(?i)\bno government at all\b",
            FlagType::Extreme,
            "Calls for abolishing core government functions",
        ),
        ScopePattern::new(
            r"(?i)\b(flat earth|chemtrails?|lizard people|reptilians?)\b",
            FlagType::OutOfScope,
            "Not a recognized policy issue",
        ),
        ScopePattern::new(
            r"(?i)\bmoon landings?\b.*\b(fake|hoax|staged)\b",
            FlagType::OutOfScope,
            "Not a recognized policy issue",
        ),
        ScopePattern::new(
            r"(?i)\bbirds? (are|is) ?n[o']t real\b",
            FlagType::OutOfScope,
            "Not a recognized policy issue",
        ),
    ]
});

/// Screen a priority; `Some` means it must not be mapped
pub fn screen(priority: &str) -> Option<FlaggedPriority> {
    PATTERNS
        .iter()
        .find(|p| p.regex.is_match(priority))
        .map(|p| FlaggedPriority {
            priority: priority.to_string(),
            flag: p.flag,
            reason: p.reason.to_string(),
        })
}
