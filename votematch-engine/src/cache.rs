//! Whole-request result cache
//!
//! Keyed by (priority set, location, mode). The priority set is order
//! independent and de-duplicated; strings are otherwise compared exactly.
//! Entries live for the process lifetime. Concurrent readers and writers are
//! safe; two requests that miss at the same time may both compute and both
//! insert, the last write wins.

use crate::types::RecommendationsResult;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use votematch_common::Mode;

/// Canonical cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    priorities: BTreeSet<String>,
    location: String,
    mode: Mode,
}

impl CacheKey {
    pub fn new<I, S>(priorities: I, location: &str, mode: Mode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            priorities: priorities.into_iter().map(Into::into).collect(),
            location: location.to_string(),
            mode,
        }
    }
}

/// Hit/miss counters snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Process-lifetime recommendation cache
#[derive(Debug, Default)]
pub struct RecommendationCache {
    entries: RwLock<HashMap<CacheKey, RecommendationsResult>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RecommendationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached result for `key`, if any
    pub async fn get(&self, key: &CacheKey) -> Option<RecommendationsResult> {
        let found = self.entries.read().await.get(key).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Insert or replace the result for `key`
    pub async fn put(&self, key: CacheKey, result: RecommendationsResult) {
        self.entries.write().await.insert(key, result);
    }

    /// Drop all entries (counters are kept)
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        let dropped = entries.len();
        entries.clear();
        tracing::info!(dropped, "Recommendation cache cleared");
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len().await,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
