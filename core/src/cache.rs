//! Inventory snapshot cache port.
//!
//! The engine produces identical snapshots with or without a cache;
//! caching only saves recomputation between polls. Time is passed in
//! explicitly so expiry is as deterministic as everything else.

use crate::{snapshot::InventorySnapshot, types::Timestamp};
use chrono::Duration;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

pub const DEFAULT_TTL_SECS: i64 = 60;

pub trait SnapshotCache: Send + Sync {
    /// Cached value for `key` and its age, or `None` on miss/expiry.
    fn get(&self, key: &str, now: Timestamp) -> Option<(InventorySnapshot, Duration)>;

    fn put(&self, key: &str, value: InventorySnapshot, now: Timestamp);
}

/// Caching disabled: every lookup misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl SnapshotCache for NoCache {
    fn get(&self, _key: &str, _now: Timestamp) -> Option<(InventorySnapshot, Duration)> {
        None
    }

    fn put(&self, _key: &str, _value: InventorySnapshot, _now: Timestamp) {}
}

/// In-memory cache whose entries expire `ttl` after insertion.
pub struct TtlCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Timestamp, InventorySnapshot)>>,
}

impl TtlCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // a panic while holding the lock leaves the map itself intact
    fn lock(&self) -> MutexGuard<'_, HashMap<String, (Timestamp, InventorySnapshot)>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }
}

impl SnapshotCache for TtlCache {
    fn get(&self, key: &str, now: Timestamp) -> Option<(InventorySnapshot, Duration)> {
        let mut entries = self.lock();
        let age = now - entries.get(key)?.0;
        if age >= self.ttl || age < Duration::zero() {
            log::debug!("cache expired: {key} (age {}s)", age.num_seconds());
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|(_, value)| (value.clone(), age))
    }

    fn put(&self, key: &str, value: InventorySnapshot, now: Timestamp) {
        self.lock().insert(key.to_string(), (now, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::InventorySource;
    use chrono::{TimeZone, Utc};

    fn snapshot(at: Timestamp) -> InventorySnapshot {
        InventorySnapshot::new(Vec::new(), InventorySource::Mock, at)
    }

    #[test]
    fn no_cache_always_misses() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        NoCache.put("k", snapshot(now), now);
        assert!(NoCache.get("k", now).is_none());
    }

    #[test]
    fn ttl_cache_reports_age_then_expires() {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        let cache = TtlCache::default();
        cache.put("mock", snapshot(t0), t0);

        let (hit, age) = cache.get("mock", t0 + Duration::seconds(30)).unwrap();
        assert_eq!(hit.fetched_at, t0);
        assert_eq!(age, Duration::seconds(30));

        assert!(cache.get("mock", t0 + Duration::seconds(60)).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn keys_are_independent() {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        let cache = TtlCache::new(Duration::seconds(5));
        cache.put("a", snapshot(t0), t0);
        assert!(cache.get("b", t0).is_none());
        assert_eq!(cache.len(), 1);
    }
}
