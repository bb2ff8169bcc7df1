use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::types::DashboardSummary;

struct Entry<V> {
    value: V,
    /// `None` when the TTL runs past what `Instant` can represent.
    expires_at: Option<Instant>,
}

/// In-process TTL cache that owns its key set.
///
/// Owning the keys lets writers drop every entry under a prefix without
/// reaching into a backend's internals. No single-flight: concurrent misses
/// each recompute and the last `set` wins.
#[derive(Clone)]
pub struct TtlCache<V> {
    entries: Arc<Mutex<HashMap<String, Entry<V>>>>,
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live value for `key`; an expired entry is removed and reported as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match map.get(key) {
            Some(entry) if entry.expires_at.is_none_or(|at| at > Instant::now()) => {
                Some(entry.value.clone())
            }
            Some(_) => {
                map.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn set(&self, key: &str, value: V, ttl: Duration) {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        map.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Instant::now().checked_add(ttl),
            },
        );
    }

    /// Drop every key starting with `prefix`. Returns how many were removed.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let before = map.len();
        map.retain(|key, _| !key.starts_with(prefix));
        before - map.len()
    }

    /// Number of stored entries, expired ones included until next touched.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared snapshot cache used by every dashboard view.
pub type SummaryCache = TtlCache<Arc<DashboardSummary>>;

/// Key prefixes dropped when trees, sites or beneficiaries change.
pub const INVALIDATED_PREFIXES: &[&str] = &["dashboard", "insights"];

pub const SUMMARY_VIEW_PREFIX: &str = "dashboard_summary_view_";
pub const SUMMARY_API_PREFIX: &str = "dashboard_summary_";
pub const GUEST_VIEW_PREFIX: &str = "dashboard_guest_view_";
pub const INSIGHTS_VIEW_PREFIX: &str = "insights_summary_view_";
pub const BACKGROUND_KEY: &str = "dashboard_summary_background";

/// `{prefix}{user_id}` or `{prefix}anon`.
pub fn cache_key(prefix: &str, user_id: Option<i64>) -> String {
    match user_id {
        Some(id) => format!("{prefix}{id}"),
        None => format!("{prefix}anon"),
    }
}

/// Drop all summary snapshots after a write to the underlying data.
pub fn invalidate_summaries(cache: &SummaryCache) -> usize {
    let removed: usize = INVALIDATED_PREFIXES
        .iter()
        .map(|p| cache.invalidate_prefix(p))
        .sum();
    if removed > 0 {
        log::debug!("Invalidated {removed} cached dashboard summaries");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_derived_from_identity() {
        assert_eq!(cache_key(SUMMARY_VIEW_PREFIX, Some(42)), "dashboard_summary_view_42");
        assert_eq!(cache_key(SUMMARY_VIEW_PREFIX, None), "dashboard_summary_view_anon");
    }

    #[test]
    fn zero_ttl_entries_are_never_served() {
        let cache: TtlCache<u32> = TtlCache::new();
        cache.set("k", 1, Duration::ZERO);
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn prefix_invalidation_leaves_other_keys() {
        let cache: TtlCache<u32> = TtlCache::new();
        let ttl = Duration::from_secs(60);
        cache.set("dashboard_summary_view_1", 1, ttl);
        cache.set("insights_summary_view_1", 2, ttl);
        cache.set("weather_nairobi", 3, ttl);

        assert_eq!(cache.invalidate_prefix("dashboard"), 1);
        assert_eq!(cache.invalidate_prefix("insights"), 1);
        assert_eq!(cache.invalidate_prefix("insights"), 0);
        assert_eq!(cache.get("weather_nairobi"), Some(3));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn unrepresentable_ttl_never_expires() {
        let cache: TtlCache<u32> = TtlCache::new();
        cache.set("k", 1, Duration::MAX);
        cache.set("j", 2, Duration::from_secs(u64::MAX));
        assert_eq!(cache.get("k"), Some(1));
        assert_eq!(cache.get("j"), Some(2));
    }
}
