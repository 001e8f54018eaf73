use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::core::similarity::ComparisonDomain;

/// Cache key: the ordered text pair plus the domain it was compared in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimilarityKey {
    pub text_a: String,
    pub text_b: String,
    pub domain: ComparisonDomain,
}

impl SimilarityKey {
    pub fn new(text_a: &str, text_b: &str, domain: &ComparisonDomain) -> Self {
        Self {
            text_a: text_a.to_string(),
            text_b: text_b.to_string(),
            domain: domain.clone(),
        }
    }
}

/// In-memory memoization of embedding similarities
///
/// Owned by the similarity engine and created once at startup. Entries live
/// for the process lifetime unless a TTL is configured. Concurrent writers
/// racing on one key may both compute; readers never see a partial value.
pub struct SimilarityCache {
    entries: moka::future::Cache<SimilarityKey, f64>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SimilarityCache {
    /// Create a new cache holding at most `max_capacity` pairs
    pub fn new(max_capacity: u64, ttl: Option<Duration>) -> Self {
        let mut builder = moka::future::CacheBuilder::new(max_capacity);
        if let Some(ttl) = ttl {
            builder = builder.time_to_live(ttl);
        }

        Self {
            entries: builder.build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub async fn get(&self, key: &SimilarityKey) -> Option<f64> {
        let value = self.entries.get(key).await;
        if value.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("Similarity cache hit: {:?}", key);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        value
    }

    pub async fn insert(&self, key: SimilarityKey, value: f64) {
        self.entries.insert(key, value).await;
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Flush moka's pending maintenance so `stats` reflects recent writes
    pub async fn sync(&self) {
        self.entries.run_pending_tasks().await;
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        CacheStats {
            entries: self.entries.entry_count(),
            hit_count: hits,
            miss_count: misses,
            hit_rate: if lookups > 0 { hits as f64 / lookups as f64 } else { 0.0 },
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    pub hit_count: u64,
    pub miss_count: u64,
    pub hit_rate: f64,
}
