use std::num::NonZeroUsize;

use lru::LruCache;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::MatchOutcome;

/// In-memory memoization of pipeline outcomes
///
/// The engine itself is pure; the host decides when its inputs changed and
/// bumps the data version it puts into the key.
pub struct ResultCache {
    entries: LruCache<String, MatchOutcome>,
    hit_count: u64,
    miss_count: u64,
}

impl ResultCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            hit_count: 0,
            miss_count: 0,
        }
    }

    pub fn get(&mut self, key: &str) -> Option<&MatchOutcome> {
        match self.entries.get(key) {
            Some(outcome) => {
                tracing::trace!("Cache hit: {}", key);
                self.hit_count += 1;
                Some(outcome)
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                self.miss_count += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: String, outcome: MatchOutcome) {
        tracing::trace!("Cache set: {}", key);
        self.entries.put(key, outcome);
    }

    /// Return the cached outcome for `key`, running `compute` on a miss.
    ///
    /// Errors are passed through and never cached.
    pub fn get_or_compute<F>(&mut self, key: String, compute: F) -> EngineResult<MatchOutcome>
    where
        F: FnOnce() -> EngineResult<MatchOutcome>,
    {
        if let Some(outcome) = self.get(&key) {
            return Ok(outcome.clone());
        }
        let outcome = compute()?;
        self.insert(key, outcome.clone());
        Ok(outcome)
    }

    /// Drop every entry computed for `viewer_id`
    pub fn invalidate_viewer(&mut self, viewer_id: &str) {
        let prefix = CacheKey::viewer_prefix(viewer_id);
        let stale: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            self.entries.pop(key);
        }
        tracing::debug!("Invalidated {} cached outcomes for {}", stale.len(), viewer_id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let lookups = self.hit_count + self.miss_count;
        CacheStats {
            size: self.entries.len(),
            capacity: self.entries.cap().get(),
            hit_count: self.hit_count,
            miss_count: self.miss_count,
            hit_rate: if lookups == 0 {
                0.0
            } else {
                self.hit_count as f64 / lookups as f64
            },
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hit_count: u64,
    pub miss_count: u64,
    pub hit_rate: f64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    fn viewer_prefix(viewer_id: &str) -> String {
        format!("matches:{}:", viewer_id)
    }

    /// Build a cache key for one page of a viewer's results
    pub fn outcome(viewer_id: &str, data_version: u64, query_fingerprint: u64, page: usize) -> String {
        format!(
            "{}{}:{:016x}:{}",
            Self::viewer_prefix(viewer_id),
            data_version,
            query_fingerprint,
            page
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn outcome(total_results: usize) -> MatchOutcome {
        MatchOutcome {
            page: Vec::new(),
            page_number: 1,
            total_results,
            total_pages: 0,
            active_filter_count: 0,
            diagnostics: None,
        }
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(CacheKey::outcome("user123", 4, 255, 2), "matches:user123:4:00000000000000ff:2");
    }

    #[test]
    fn test_get_or_compute_memoizes() {
        let mut cache = ResultCache::new(8);
        let key = CacheKey::outcome("viewer", 1, 7, 1);
        let mut calls = 0;

        for _ in 0..3 {
            let result = cache
                .get_or_compute(key.clone(), || {
                    calls += 1;
                    Ok(outcome(12))
                })
                .unwrap();
            assert_eq!(result.total_results, 12);
        }

        assert_eq!(calls, 1);
        let stats = cache.stats();
        assert_eq!(stats.hit_count, 2);
        assert_eq!(stats.miss_count, 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut cache = ResultCache::new(8);
        let key = CacheKey::outcome("viewer", 1, 7, 9);

        let err = cache.get_or_compute(key.clone(), || {
            Err(EngineError::PageOutOfRange {
                requested: 9,
                total_pages: 1,
            })
        });
        assert!(err.is_err());
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_invalidate_viewer() {
        let mut cache = ResultCache::new(8);
        cache.insert(CacheKey::outcome("a", 1, 1, 1), outcome(1));
        cache.insert(CacheKey::outcome("a", 1, 1, 2), outcome(1));
        cache.insert(CacheKey::outcome("ab", 1, 1, 1), outcome(2));

        cache.invalidate_viewer("a");
        assert_eq!(cache.stats().size, 1);
        assert!(cache.get(&CacheKey::outcome("ab", 1, 1, 1)).is_some());
    }

    #[test]
    fn test_capacity_evicts_least_recent() {
        let mut cache = ResultCache::new(2);
        cache.insert("k1".to_string(), outcome(1));
        cache.insert("k2".to_string(), outcome(2));
        cache.get("k1");
        cache.insert("k3".to_string(), outcome(3));

        assert!(cache.get("k2").is_none());
        assert!(cache.get("k1").is_some());
    }
}
