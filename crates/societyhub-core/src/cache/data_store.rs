//! Keyed data store: namespaced payload cache addressed by
//! (namespace, type, page).
//!
//! Views and the background prefetcher write API responses here; the page
//! cache holds rendered-view state on top of it. The store also remembers
//! whether the one-time initial prefetch has completed.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::store::PageData;
use super::subscribers::lock;

/// Type segment used for paginated section listings.
pub const LIST_KIND: &str = "list";

/// Three-part address of a keyed payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataKey {
    pub namespace: String,
    pub kind: String,
    pub page: Option<u32>,
}

impl DataKey {
    pub fn new(namespace: &str, kind: &str, page: Option<u32>) -> Self {
        Self {
            namespace: namespace.to_string(),
            kind: kind.to_string(),
            page,
        }
    }
}

impl fmt::Display for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.page {
            Some(page) => write!(f, "{}/{}/{}", self.namespace, self.kind, page),
            None => write!(f, "{}/{}", self.namespace, self.kind),
        }
    }
}

/// Contract the navigation layer needs from a keyed data cache.
pub trait KeyedDataStore: Send + Sync {
    fn get_data(&self, namespace: &str, kind: &str, page: Option<u32>) -> Option<PageData>;

    fn set_data(&self, namespace: &str, kind: &str, payload: PageData, page: Option<u32>);

    fn is_initial_prefetch_done(&self) -> bool;

    fn has_data(&self, namespace: &str, kind: &str, page: Option<u32>) -> bool {
        self.get_data(namespace, kind, page).is_some()
    }
}

#[derive(Debug, Clone)]
struct StoredPayload {
    data: PageData,
    stored_at: DateTime<Utc>,
}

/// Process-lifetime `KeyedDataStore` backed by a hash map.
#[derive(Default)]
pub struct MemoryDataStore {
    entries: Mutex<HashMap<DataKey, StoredPayload>>,
    initial_prefetch_done: AtomicBool,
}

impl MemoryDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the one-time warm-up finished. Never reset by `clear`.
    pub fn mark_initial_prefetch_done(&self) {
        if !self.initial_prefetch_done.swap(true, Ordering::SeqCst) {
            debug!("Initial prefetch marked done");
        }
    }

    pub fn stored_at(&self, key: &DataKey) -> Option<DateTime<Utc>> {
        lock(&self.entries).get(key).map(|stored| stored.stored_at)
    }

    pub fn keys(&self) -> Vec<DataKey> {
        let mut keys: Vec<DataKey> = lock(&self.entries).keys().cloned().collect();
        keys.sort_by_key(|k| k.to_string());
        keys
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.entries).clear();
    }
}

impl KeyedDataStore for MemoryDataStore {
    fn get_data(&self, namespace: &str, kind: &str, page: Option<u32>) -> Option<PageData> {
        lock(&self.entries)
            .get(&DataKey::new(namespace, kind, page))
            .map(|stored| PageData::clone(&stored.data))
    }

    fn set_data(&self, namespace: &str, kind: &str, payload: PageData, page: Option<u32>) {
        let key = DataKey::new(namespace, kind, page);
        debug!(key = %key, "Keyed data stored");
        lock(&self.entries).insert(
            key,
            StoredPayload {
                data: payload,
                stored_at: Utc::now(),
            },
        );
    }

    fn is_initial_prefetch_done(&self) -> bool {
        self.initial_prefetch_done.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_pages_are_addressed_separately() {
        let store = MemoryDataStore::new();
        store.set_data("events", "list", Arc::new(json!([1])), Some(1));
        store.set_data("events", "list", Arc::new(json!([2])), Some(2));
        store.set_data("events", "list", Arc::new(json!("all")), None);

        assert_eq!(store.get_data("events", "list", Some(1)).as_deref(), Some(&json!([1])));
        assert_eq!(store.get_data("events", "list", Some(2)).as_deref(), Some(&json!([2])));
        assert_eq!(store.get_data("events", "list", None).as_deref(), Some(&json!("all")));
        assert!(store.get_data("events", "detail", Some(1)).is_none());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_has_data_default_method() {
        let store = MemoryDataStore::new();
        assert!(!store.has_data("projects", "list", Some(1)));
        store.set_data("projects", "list", Arc::new(json!([])), Some(1));
        assert!(store.has_data("projects", "list", Some(1)));
    }

    #[test]
    fn test_initial_prefetch_flag_survives_clear() {
        let store = MemoryDataStore::new();
        assert!(!store.is_initial_prefetch_done());

        store.mark_initial_prefetch_done();
        store.clear();

        assert!(store.is_initial_prefetch_done());
        assert!(store.is_empty());
    }

    #[test]
    fn test_data_key_display() {
        assert_eq!(DataKey::new("events", "list", Some(3)).to_string(), "events/list/3");
        assert_eq!(DataKey::new("events", "list", None).to_string(), "events/list");
    }

    #[test]
    fn test_keys_sorted_and_stamped() {
        let store = MemoryDataStore::new();
        store.set_data("b", "list", Arc::new(json!(1)), None);
        store.set_data("a", "list", Arc::new(json!(1)), None);

        let keys = store.keys();
        assert_eq!(keys[0].namespace, "a");
        assert!(store.stored_at(&keys[1]).is_some());
    }
}
