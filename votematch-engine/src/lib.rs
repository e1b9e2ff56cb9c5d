//! votematch-engine library interface
//!
//! Exposes the recommendation pipeline for the CLI and integration tests:
//! priority mapping, candidate and ballot measure matching, and the
//! orchestrator that composes them behind a result cache.

pub mod cache;
pub mod error;
pub mod orchestrator;
pub mod services;
pub mod types;

pub use crate::cache::{CacheKey, CacheStats, RecommendationCache};
pub use crate::error::{MappingError, MatchError};
pub use crate::orchestrator::{RecommendationOrchestrator, NO_POLICY_FOCUS};
pub use crate::types::{
    BallotMeasureMatch, BallotMeasureRecommendation, CandidateMatch, CandidateRecommendation,
    MatchOptions, PolicyRecommendations, PriorityAnalysis, RecommendationRequest,
    RecommendationsResult,
};
