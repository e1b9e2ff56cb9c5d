//! Error types for the matching engine
//!
//! Mapping failures are fatal to a recommendation; matcher failures only
//! degrade their own branch. Request validation errors come from
//! `votematch_common::Error::Validation`.

use thiserror::Error;

pub use crate::services::priority_mapper::MappingError;

/// Matcher errors, shared by the candidate and measure matchers
#[derive(Debug, Error)]
pub enum MatchError {
    /// Candidate matching failed
    #[error("Candidate matching failed: {0}")]
    Candidate(String),

    /// Ballot measure matching failed
    #[error("Ballot measure matching failed: {0}")]
    Measure(String),

    /// Matcher panicked or its task was lost
    #[error("Matcher task failed: {0}")]
    Panicked(String),
}
