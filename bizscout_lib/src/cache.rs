//! In-memory TTL cache for provider responses, backed by `DashMap`.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::BizScoutError;

struct CacheEntry {
    json: String,
    expires_at: Instant,
}

/// Thread-safe response cache keyed by provider and request, e.g.
/// `apollo:org:5f2a9c1e`.
///
/// Values are stored as JSON. Expired entries are dropped when next read.
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Raw JSON for `key`, or `None` if missing or expired.
    pub fn get(&self, key: &str) -> Option<String> {
        let entry = self.entries.get(key)?;
        if Instant::now() > entry.expires_at {
            drop(entry);
            self.entries.remove(key);
            return None;
        }
        Some(entry.json.clone())
    }

    pub fn set(&self, key: String, json: String) {
        self.entries.insert(
            key,
            CacheEntry {
                json,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Decodes a cached value. A cached payload that no longer decodes is
    /// evicted and reported as a cache error.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, BizScoutError> {
        let Some(json) = self.get(key) else {
            return Ok(None);
        };
        match serde_json::from_str(&json) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                self.entries.remove(key);
                Err(BizScoutError::Cache(format!("{}: {}", key, e)))
            }
        }
    }

    /// Stores a value as JSON. Values that fail to serialize are not cached.
    pub fn set_json<T: Serialize>(&self, key: String, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.set(key, json),
            Err(e) => tracing::warn!("Not caching {}: {}", key, e),
        }
    }

    /// Drops every entry whose key starts with `prefix`, e.g. `"apollo:"`.
    pub fn invalidate_prefix(&self, prefix: &str) {
        self.entries.retain(|key, _| !key.starts_with(prefix));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set_json("linkedin:badger".to_string(), &vec!["Freight Carriers"]);
        let value: Option<Vec<String>> = cache.get_json("linkedin:badger").unwrap();
        assert_eq!(value, Some(vec!["Freight Carriers".to_string()]));
        assert_eq!(cache.get_json::<Vec<String>>("linkedin:missing").unwrap(), None);
    }

    #[test]
    fn entries_expire() {
        let cache = MemoryCache::new(Duration::from_millis(1));
        cache.set("yahoo:BADGER".to_string(), "{}".to_string());
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(cache.get("yahoo:BADGER"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn undecodable_entry_is_evicted() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set("apollo:org:1".to_string(), "not json".to_string());
        assert!(matches!(
            cache.get_json::<u32>("apollo:org:1"),
            Err(BizScoutError::Cache(_))
        ));
        assert_eq!(cache.get("apollo:org:1"), None);
    }

    #[test]
    fn invalidate_by_provider_prefix() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set("apollo:org:1".to_string(), "1".to_string());
        cache.set("apollo:search:x".to_string(), "2".to_string());
        cache.set("linkedin:badger".to_string(), "3".to_string());
        cache.invalidate_prefix("apollo:");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("linkedin:badger"), Some("3".to_string()));

        cache.clear();
        assert!(cache.is_empty());
    }
}
