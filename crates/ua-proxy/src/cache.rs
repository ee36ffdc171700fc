// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Child node memoization.
//!
//! Each facade owns one [`NodeCache`]. An entry is keyed by the child's
//! namespace URI and browse name and is resolved at most once: concurrent
//! first accesses wait on the same [`tokio::sync::OnceCell`] and share one
//! remote call. Absent children are memoized as `None` unless negative
//! caching is disabled. Failed resolutions leave the entry empty so the
//! next access retries.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::ProxyResult;

// =============================================================================
// CacheKey
// =============================================================================

/// Identifies a child under its parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Namespace URI of the browse name.
    pub namespace_uri: String,
    /// Browse name.
    pub browse_name: String,
}

impl CacheKey {
    /// Creates a key.
    pub fn new(namespace_uri: impl Into<String>, browse_name: impl Into<String>) -> Self {
        Self {
            namespace_uri: namespace_uri.into(),
            browse_name: browse_name.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.namespace_uri, self.browse_name)
    }
}

// =============================================================================
// CacheStatistics
// =============================================================================

/// Counters for one cache.
#[derive(Debug, Default)]
pub struct CacheStatistics {
    resolutions: AtomicU64,
    hits: AtomicU64,
    not_found: AtomicU64,
    failures: AtomicU64,
}

impl CacheStatistics {
    /// Creates zeroed statistics.
    pub fn new() -> Self {
        Self::default()
    }

    fn record_resolution(&self) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
    }

    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Remote resolutions started.
    pub fn resolutions(&self) -> u64 {
        self.resolutions.load(Ordering::Relaxed)
    }

    /// Accesses served without starting a resolution.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Resolutions that found no child.
    pub fn not_found(&self) -> u64 {
        self.not_found.load(Ordering::Relaxed)
    }

    /// Resolutions that failed.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Returns the share of accesses served from the cache.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.resolutions();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

// =============================================================================
// NodeCache
// =============================================================================

/// Single-flight memoization of resolved children.
pub struct NodeCache<V> {
    entries: DashMap<CacheKey, Arc<OnceCell<Option<V>>>>,
    negative_caching: bool,
    stats: CacheStatistics,
}

impl<V> NodeCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates an empty cache.
    pub fn new(negative_caching: bool) -> Self {
        Self {
            entries: DashMap::new(),
            negative_caching,
            stats: CacheStatistics::new(),
        }
    }

    /// Returns the memoized outcome without resolving.
    ///
    /// `None` means the key has not been resolved yet. `Some(None)` is a
    /// memoized absence.
    pub fn peek(&self, key: &CacheKey) -> Option<Option<V>> {
        // Clone the cell out so no shard lock is held while reading it.
        let cell = self.entries.get(key).map(|entry| Arc::clone(entry.value()))?;
        let value = cell.get()?.clone();
        self.stats.record_hit();
        Some(value)
    }

    /// Returns the memoized outcome, resolving it with `resolve` on first access.
    ///
    /// Concurrent callers for the same key share a single call to `resolve`.
    pub async fn get_or_resolve<F, Fut>(&self, key: &CacheKey, resolve: F) -> ProxyResult<Option<V>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ProxyResult<Option<V>>>,
    {
        let cell = Arc::clone(self.entries.entry(key.clone()).or_default().value());

        if let Some(value) = cell.get() {
            self.stats.record_hit();
            return Ok(value.clone());
        }

        let resolved_here = AtomicBool::new(false);
        let stats = &self.stats;
        let flag = &resolved_here;
        let result = cell
            .get_or_try_init(|| async move {
                flag.store(true, Ordering::Relaxed);
                stats.record_resolution();
                resolve().await
            })
            .await;

        let resolved_here = resolved_here.load(Ordering::Relaxed);
        match result {
            Ok(Some(value)) => {
                if resolved_here {
                    debug!(key = %key, "Child resolved");
                } else {
                    self.stats.record_hit();
                }
                Ok(Some(value.clone()))
            }
            Ok(None) => {
                if resolved_here {
                    debug!(key = %key, negative_caching = self.negative_caching, "Child not found");
                    self.stats.record_not_found();
                    if !self.negative_caching {
                        self.entries.remove_if(key, |_, current| Arc::ptr_eq(current, &cell));
                    }
                } else {
                    self.stats.record_hit();
                }
                Ok(None)
            }
            Err(e) => {
                debug!(key = %key, error = %e, "Child resolution failed");
                self.stats.record_failure();
                Err(e)
            }
        }
    }

    /// Returns `true` if the key holds a memoized outcome.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries
            .get(key)
            .map(|entry| entry.value().initialized())
            .unwrap_or(false)
    }

    /// Returns the number of memoized outcomes.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().initialized())
            .count()
    }

    /// Returns `true` if nothing is memoized.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if absent children are memoized.
    pub fn negative_caching(&self) -> bool {
        self.negative_caching
    }

    /// Returns the statistics.
    pub fn statistics(&self) -> &CacheStatistics {
        &self.stats
    }
}

impl<V> fmt::Debug for NodeCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeCache")
            .field("entries", &self.entries.len())
            .field("negative_caching", &self.negative_caching)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use futures::future::join_all;

    use super::*;
    use crate::error::ProxyError;

    fn key(name: &str) -> CacheKey {
        CacheKey::new("http://opcfoundation.org/UA/", name)
    }

    #[tokio::test]
    async fn test_resolves_once() {
        let cache: NodeCache<u32> = NodeCache::new(true);
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_resolve(&key("ResourceUri"), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Some(7))
                })
                .await
                .unwrap();
            assert_eq!(value, Some(7));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.statistics().resolutions(), 1);
        assert_eq!(cache.statistics().hits(), 2);
        assert_eq!(cache.peek(&key("ResourceUri")), Some(Some(7)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_access_is_single_flight() {
        let cache: Arc<NodeCache<u32>> = Arc::new(NodeCache::new(true));
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks = (0..16).map(|_| {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                cache
                    .get_or_resolve(&key("EndpointUrls"), || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok(Some(42))
                    })
                    .await
            })
        });

        for result in join_all(tasks).await {
            assert_eq!(result.unwrap().unwrap(), Some(42));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_negative_caching() {
        let cache: NodeCache<u32> = NodeCache::new(true);
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value = cache
                .get_or_resolve(&key("Optional"), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(None)
                })
                .await
                .unwrap();
            assert_eq!(value, None);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.statistics().not_found(), 1);
        assert_eq!(cache.peek(&key("Optional")), Some(None));
    }

    #[tokio::test]
    async fn test_negative_caching_disabled() {
        let cache: NodeCache<u32> = NodeCache::new(false);
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            cache
                .get_or_resolve(&key("Optional"), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(None)
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!cache.contains(&key("Optional")));
        assert_eq!(cache.peek(&key("Optional")), None);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache: NodeCache<u32> = NodeCache::new(true);

        let err = cache
            .get_or_resolve(&key("State"), || async { Err(ProxyError::not_connected()) })
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(!cache.contains(&key("State")));
        assert_eq!(cache.statistics().failures(), 1);

        let value = cache
            .get_or_resolve(&key("State"), || async { Ok(Some(1)) })
            .await
            .unwrap();
        assert_eq!(value, Some(1));
        assert_eq!(cache.statistics().resolutions(), 2);
    }

    #[test]
    fn test_hit_rate() {
        let stats = CacheStatistics::new();
        assert_eq!(stats.hit_rate(), 0.0);
        stats.record_resolution();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    }
}
