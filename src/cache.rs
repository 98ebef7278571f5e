//! Time-bounded cache of fetched snapshot pages, keyed by lookup
//!
//! Pages are stored instead of assembled outcomes: the MC/DOT echo and
//! fallback fields depend on each request's own identifiers.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::identifiers::LookupKey;

#[derive(Debug)]
struct CachedSnapshot {
    html: String,
    fetched_at: Instant,
}

/// Only pages SAFER actually returned belong here; a failed fetch is
/// retried on the next request.
#[derive(Debug)]
pub struct SnapshotCache {
    ttl: Duration,
    cache: RwLock<HashMap<LookupKey, CachedSnapshot>>,
}

impl SnapshotCache {
    /// A zero `ttl` gives a cache that never stores anything.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub fn get(&self, key: &LookupKey) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }
        let cache = self.cache.read().ok()?;
        let cached = cache.get(key)?;
        if cached.fetched_at.elapsed() < self.ttl {
            Some(cached.html.clone())
        } else {
            None
        }
    }

    pub fn insert(&self, key: LookupKey, html: &str) {
        if !self.is_enabled() {
            return;
        }
        if let Ok(mut cache) = self.cache.write() {
            let ttl = self.ttl;
            cache.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
            cache.insert(
                key,
                CachedSnapshot {
                    html: html.to_string(),
                    fetched_at: Instant::now(),
                },
            );
        }
    }

    pub fn len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<html><body>Record Not Found</body></html>";

    fn key() -> LookupKey {
        LookupKey::Dot("1234567".to_string())
    }

    #[test]
    fn test_disabled_cache_stores_nothing() {
        let cache = SnapshotCache::default();
        cache.insert(key(), PAGE);
        assert!(cache.is_empty());
        assert!(cache.get(&key()).is_none());
    }

    #[test]
    fn test_hit_within_ttl() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        cache.insert(key(), PAGE);
        assert_eq!(cache.get(&key()).as_deref(), Some(PAGE));
        assert!(cache.get(&LookupKey::Mc("1234567".to_string())).is_none());
    }

    #[test]
    fn test_expired_entries() {
        let cache = SnapshotCache::new(Duration::from_millis(1));
        cache.insert(key(), PAGE);
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get(&key()).is_none());
    }

    #[test]
    fn test_expired_entries_pruned_on_insert() {
        let cache = SnapshotCache::new(Duration::from_millis(1));
        cache.insert(key(), PAGE);
        std::thread::sleep(Duration::from_millis(5));
        cache.insert(LookupKey::Mc("123456".to_string()), PAGE);
        assert_eq!(cache.len(), 1);
    }
}
