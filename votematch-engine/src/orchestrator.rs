//! Recommendation Orchestrator
//!
//! Sequences the pipeline for one request:
//! 1. Cache lookup
//! 2. Priority mapping (fatal on failure)
//! 3. Candidate matching (failure isolated to its branch)
//! 4. Ballot measure matching (failure isolated to its branch)
//! 5. Policy summary derivation
//! 6. Assembly and cache write
//!
//! `generate_recommendations` never fails: every outcome is a well-formed
//! `RecommendationsResult`, with `error` populated when something went wrong.

use crate::cache::{CacheKey, RecommendationCache};
use crate::error::MatchError;
use crate::services::{
    CandidateMatcher, CandidateMatching, MeasureMatcher, MeasureMatching, PriorityMapper,
    PriorityMapping,
};
use crate::types::{
    BallotMeasureRecommendation, CandidateRecommendation, MatchOptions, PolicyRecommendations,
    PriorityAnalysis, RecommendationRequest, RecommendationsResult,
};
use chrono::Utc;
use std::sync::Arc;
use votematch_common::{Catalog, Mode};

/// Reported in `top_policies` when no priority could be mapped
pub const NO_POLICY_FOCUS: &str = "No specific policy focus identified";

/// Composes the three matching services with caching and failure isolation
pub struct RecommendationOrchestrator {
    mapper: Arc<dyn PriorityMapping>,
    candidate_matcher: Arc<dyn CandidateMatching>,
    measure_matcher: Arc<dyn MeasureMatching>,
    cache: Option<Arc<RecommendationCache>>,
}

impl RecommendationOrchestrator {
    /// Orchestrator over the catalog-backed services, with a fresh cache
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_components(
            Arc::new(PriorityMapper::new(Arc::clone(&catalog))),
            Arc::new(CandidateMatcher::new(Arc::clone(&catalog))),
            Arc::new(MeasureMatcher::new(catalog)),
        )
    }

    /// Orchestrator over arbitrary service implementations, with a fresh cache
    pub fn with_components(
        mapper: Arc<dyn PriorityMapping>,
        candidate_matcher: Arc<dyn CandidateMatching>,
        measure_matcher: Arc<dyn MeasureMatching>,
    ) -> Self {
        Self {
            mapper,
            candidate_matcher,
            measure_matcher,
            cache: Some(Arc::new(RecommendationCache::new())),
        }
    }

    /// Share an existing cache (e.g. one per process)
    pub fn with_cache(mut self, cache: Arc<RecommendationCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Disable result caching entirely
    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    pub fn cache(&self) -> Option<&Arc<RecommendationCache>> {
        self.cache.as_ref()
    }

    /// Produce recommendations for a (validated) request
    pub async fn generate_recommendations(&self, request: &RecommendationRequest) -> RecommendationsResult {
        let cache = if request.bypass_cache {
            None
        } else {
            self.cache.as_ref()
        };
        let key = CacheKey::new(request.priorities.iter().cloned(), &request.location, request.mode);

        if let Some(cache) = cache {
            if let Some(hit) = cache.get(&key).await {
                tracing::info!(
                    location = %request.location,
                    mode = %request.mode,
                    "Recommendation cache hit"
                );
                return hit;
            }
        }

        tracing::info!(
            priorities = request.priorities.len(),
            location = %request.location,
            mode = %request.mode,
            bypass_cache = request.bypass_cache,
            "Generating recommendations"
        );

        // Stage 1: mapping (fatal)
        let analysis = match self.run_mapping(request.priorities.clone()).await {
            Ok(analysis) => Arc::new(analysis),
            Err(message) => {
                tracing::error!(error = %message, "Priority mapping failed");
                return mapping_failure(message, request.mode);
            }
        };

        let options = MatchOptions {
            mode: request.mode,
            location: request.location.clone(),
        };
        let mut errors: Vec<String> = Vec::new();

        // Stage 2: candidates (isolated)
        let candidates = match self.run_candidates(Arc::clone(&analysis), options.clone()).await {
            Ok(matches) => matches.into_iter().map(CandidateRecommendation::from).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Candidate branch failed, continuing without candidates");
                errors.push(e.to_string());
                Vec::new()
            }
        };

        // Stage 3: measures (isolated)
        let ballot_measures = match self.run_measures(Arc::clone(&analysis), options).await {
            Ok(matches) => matches
                .into_iter()
                .map(BallotMeasureRecommendation::from)
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Measure branch failed, continuing without measures");
                errors.push(e.to_string());
                Vec::new()
            }
        };

        // Stage 4: policy summary
        let policy_recommendations = policy_summary(&analysis, request.mode);

        // Stage 5: assembly
        let result = RecommendationsResult {
            candidates,
            ballot_measures,
            policy_recommendations,
            mode: request.mode,
            generated_at: Utc::now(),
            error: if errors.is_empty() {
                None
            } else {
                Some(errors.join("; "))
            },
        };

        // Stage 6: cache write (partial failures are not cached)
        if let Some(cache) = cache {
            if result.error.is_none() {
                cache.put(key, result.clone()).await;
            }
        }

        tracing::info!(
            candidates = result.candidates.len(),
            ballot_measures = result.ballot_measures.len(),
            has_error = result.error.is_some(),
            "Recommendations generated"
        );

        result
    }

    async fn run_mapping(&self, priorities: Vec<String>) -> Result<PriorityAnalysis, String> {
        let mapper = Arc::clone(&self.mapper);
        match tokio::task::spawn_blocking(move || mapper.analyze_priorities(&priorities)).await {
            Ok(Ok(analysis)) => Ok(analysis),
            Ok(Err(e)) => Err(e.to_string()),
            Err(join) => Err(format!("Priority mapper task failed: {}", join)),
        }
    }

    async fn run_candidates(
        &self,
        analysis: Arc<PriorityAnalysis>,
        options: MatchOptions,
    ) -> Result<Vec<crate::types::CandidateMatch>, MatchError> {
        let matcher = Arc::clone(&self.candidate_matcher);
        tokio::task::spawn_blocking(move || matcher.find_matching_candidates(&analysis, &options))
            .await
            .map_err(|join| MatchError::Panicked(format!("candidate matcher: {}", join)))?
    }

    async fn run_measures(
        &self,
        analysis: Arc<PriorityAnalysis>,
        options: MatchOptions,
    ) -> Result<Vec<crate::types::BallotMeasureMatch>, MatchError> {
        let matcher = Arc::clone(&self.measure_matcher);
        tokio::task::spawn_blocking(move || {
            matcher.find_relevant_measures(&analysis, &options.location, &options)
        })
        .await
        .map_err(|join| MatchError::Panicked(format!("measure matcher: {}", join)))?
    }
}

/// Derived view: which priorities produced issue matches
fn policy_summary(analysis: &PriorityAnalysis, mode: Mode) -> PolicyRecommendations {
    let mut top_policies: Vec<String> = analysis
        .mapped_priorities
        .iter()
        .filter(|m| !m.matches.is_empty())
        .map(|m| m.priority.clone())
        .collect();

    if top_policies.is_empty() {
        top_policies.push(NO_POLICY_FOCUS.to_string());
    }

    let data = match mode {
        Mode::Current => "current",
        Mode::Demo => "demonstration",
    };

    PolicyRecommendations {
        top_policies,
        explanation: format!(
            "These policy areas reflect the priorities you shared and were used to match {} candidates and ballot measures.",
            data
        ),
    }
}

fn mapping_failure(message: String, mode: Mode) -> RecommendationsResult {
    RecommendationsResult {
        candidates: Vec::new(),
        ballot_measures: Vec::new(),
        policy_recommendations: PolicyRecommendations {
            top_policies: Vec::new(),
            explanation: format!(
                "Your priorities could not be analyzed, so no recommendations were produced: {}",
                message
            ),
        },
        mode,
        generated_at: Utc::now(),
        error: Some(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MappedPriority;

    #[test]
    fn test_policy_summary_preserves_order() {
        let analysis = PriorityAnalysis {
            mapped_priorities: vec![
                MappedPriority {
                    priority: "Fix the roads".to_string(),
                    matches: vec![],
                },
                MappedPriority {
                    priority: "Lower taxes".to_string(),
                    matches: vec![],
                },
            ],
            ..Default::default()
        };
        // Entries without matches are excluded
        let summary = policy_summary(&analysis, Mode::Current);
        assert_eq!(summary.top_policies, vec![NO_POLICY_FOCUS]);

        let catalog = Catalog::builtin().unwrap();
        let mapper = PriorityMapper::new(Arc::new(catalog));
        let analysis = mapper
            .analyze_priorities(&["Fix the roads".to_string(), "Lower taxes".to_string()])
            .unwrap();
        let summary = policy_summary(&analysis, Mode::Demo);
        assert_eq!(summary.top_policies, vec!["Fix the roads", "Lower taxes"]);
        assert!(summary.explanation.contains("demonstration"));
    }

    #[test]
    fn test_mapping_failure_shape() {
        let result = mapping_failure("boom".to_string(), Mode::Current);
        assert!(result.candidates.is_empty());
        assert!(result.ballot_measures.is_empty());
        assert!(result.policy_recommendations.explanation.contains("boom"));
        assert_eq!(result.error.as_deref(), Some("boom"));
    }
}
