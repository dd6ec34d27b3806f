//! Page cache store: keeps recently visited views alive between navigations.
//!
//! Each page key maps to one entry holding the view's component token, its
//! data payload, a recency stamp and a staleness flag. Staleness hides an
//! entry's data from readers without deleting it; eviction deletes. Every
//! mutation notifies subscribers synchronously, after the state change is
//! complete and with no lock held.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use super::subscribers::{lock, SubscriberRegistry, Subscription};
use crate::utils::format::format_age;

/// Default number of pages kept once an eviction sweep has run.
pub const DEFAULT_PAGE_CACHE_CAPACITY: usize = 5;

/// Untyped page payload. Shared, so handing it to a reader is a refcount bump.
pub type PageData = Arc<Value>;

/// Opaque token for a renderable unit.
///
/// The cache stores and returns it verbatim and never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentRef(u64);

impl ComponentRef {
    pub const fn new(token: u64) -> Self {
        Self(token)
    }

    pub const fn token(self) -> u64 {
        self.0
    }
}

/// When the eviction sweep runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionTrigger {
    /// Only when `cleanup()` is called explicitly.
    Manual,
    /// After every Nth `register_page`, counted across all keys.
    EveryNthRegistration(NonZeroU32),
}

impl Default for EvictionTrigger {
    fn default() -> Self {
        EvictionTrigger::EveryNthRegistration(NonZeroU32::MIN)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCacheConfig {
    /// Entry ceiling enforced by the eviction sweep (minimum 1).
    pub capacity: usize,
    /// Whether a successful `get_page_data` counts as a touch for recency.
    pub touch_on_read: bool,
    pub eviction: EvictionTrigger,
}

impl Default for PageCacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_PAGE_CACHE_CAPACITY,
            touch_on_read: true,
            eviction: EvictionTrigger::default(),
        }
    }
}

impl PageCacheConfig {
    pub fn effective_capacity(&self) -> usize {
        self.capacity.max(1)
    }
}

/// What changed, delivered to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageChange {
    Registered(String),
    Visited(String),
    MarkedStale(String),
    Cleared(String),
    /// Keys removed by an eviction sweep, most recently touched first.
    Evicted(Vec<String>),
    /// Keys removed by `clear_all`.
    ClearedAll(Vec<String>),
}

impl PageChange {
    /// Whether this change may have altered what `key` reads back.
    pub fn affects(&self, key: &str) -> bool {
        match self {
            PageChange::Registered(k)
            | PageChange::Visited(k)
            | PageChange::MarkedStale(k)
            | PageChange::Cleared(k) => k == key,
            PageChange::Evicted(keys) | PageChange::ClearedAll(keys) => {
                keys.iter().any(|k| k == key)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageCacheEntry {
    pub component: ComponentRef,
    pub data: PageData,
    pub last_visited: DateTime<Utc>,
    pub is_stale: bool,
    /// Logical clock value of the last touch. Strictly increasing across
    /// the store, so eviction order never depends on timer resolution.
    touch: u64,
}

impl PageCacheEntry {
    pub fn age_display(&self) -> String {
        format_age(self.last_visited)
    }
}

/// Read-only snapshot of one entry, for status displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntryInfo {
    pub key: String,
    pub component: ComponentRef,
    pub is_stale: bool,
    pub last_visited: DateTime<Utc>,
    pub age: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCacheStats {
    pub hits: u64,
    /// Reads of unknown or stale keys.
    pub misses: u64,
    pub registrations: u64,
    pub evictions: u64,
    pub entries: usize,
}

#[derive(Default)]
struct PageCacheState {
    entries: HashMap<String, PageCacheEntry>,
    current_page: Option<String>,
    clock: u64,
    registrations_since_sweep: u32,
    stats: PageCacheStats,
}

impl PageCacheState {
    fn next_touch(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn keys_by_recency(&self) -> Vec<String> {
        let mut ranked: Vec<(&String, u64)> =
            self.entries.iter().map(|(k, e)| (k, e.touch)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.into_iter().map(|(k, _)| k.clone()).collect()
    }
}

/// Process-wide page cache, shared by every navigation binding.
pub struct PageCacheStore {
    config: PageCacheConfig,
    state: Mutex<PageCacheState>,
    subscribers: SubscriberRegistry<PageChange>,
}

impl Default for PageCacheStore {
    fn default() -> Self {
        Self::new(PageCacheConfig::default())
    }
}

impl PageCacheStore {
    pub fn new(config: PageCacheConfig) -> Self {
        Self {
            config,
            state: Mutex::new(PageCacheState::default()),
            subscribers: SubscriberRegistry::new(),
        }
    }

    pub fn config(&self) -> &PageCacheConfig {
        &self.config
    }

    // ===== Mutations =====

    /// Insert or overwrite the entry for `key` as fresh and just touched.
    ///
    /// Always notifies, even when the write repeats the existing state.
    pub fn register_page(&self, key: &str, component: ComponentRef, data: PageData) {
        let sweep_due = {
            let mut state = lock(&self.state);
            let touch = state.next_touch();
            state.entries.insert(
                key.to_string(),
                PageCacheEntry {
                    component,
                    data,
                    last_visited: Utc::now(),
                    is_stale: false,
                    touch,
                },
            );
            state.stats.registrations += 1;

            match self.config.eviction {
                EvictionTrigger::Manual => false,
                EvictionTrigger::EveryNthRegistration(n) => {
                    state.registrations_since_sweep += 1;
                    if state.registrations_since_sweep >= n.get() {
                        state.registrations_since_sweep = 0;
                        true
                    } else {
                        false
                    }
                }
            }
        };

        debug!(page = key, component = component.token(), "Page registered");
        self.subscribers.notify(&PageChange::Registered(key.to_string()));

        if sweep_due {
            self.cleanup();
        }
    }

    /// Record navigation to `key`. Revalidates the entry if one exists.
    pub fn visit_page(&self, key: &str) {
        {
            let mut state = lock(&self.state);
            state.current_page = Some(key.to_string());
            let touch = state.next_touch();
            if let Some(entry) = state.entries.get_mut(key) {
                entry.is_stale = false;
                entry.touch = touch;
                entry.last_visited = Utc::now();
            }
        }

        debug!(page = key, "Page visited");
        self.subscribers.notify(&PageChange::Visited(key.to_string()));
    }

    /// Hide the entry's data from readers until it is visited or re-registered.
    pub fn mark_page_stale(&self, key: &str) {
        let marked = {
            let mut state = lock(&self.state);
            match state.entries.get_mut(key) {
                Some(entry) => {
                    entry.is_stale = true;
                    true
                }
                None => false,
            }
        };

        if marked {
            debug!(page = key, "Page marked stale");
            self.subscribers.notify(&PageChange::MarkedStale(key.to_string()));
        }
    }

    /// Delete the entry if present. Notifies either way.
    pub fn clear_page(&self, key: &str) {
        let removed = lock(&self.state).entries.remove(key).is_some();

        debug!(page = key, removed, "Page cleared");
        self.subscribers.notify(&PageChange::Cleared(key.to_string()));
    }

    /// Evict everything beyond the `capacity` most recently touched entries.
    ///
    /// Returns the number of entries removed. Subscribers are only notified
    /// when at least one entry was removed.
    pub fn cleanup(&self) -> usize {
        let evicted = {
            let mut state = lock(&self.state);
            let capacity = self.config.effective_capacity();
            if state.entries.len() <= capacity {
                return 0;
            }

            let evicted: Vec<String> = state.keys_by_recency().split_off(capacity);
            for key in &evicted {
                state.entries.remove(key);
            }
            state.stats.evictions += evicted.len() as u64;
            evicted
        };

        debug!(evicted = ?evicted, "Evicted least recently touched pages");
        let count = evicted.len();
        self.subscribers.notify(&PageChange::Evicted(evicted));
        count
    }

    /// Drop every entry. Notifies only if something was removed.
    pub fn clear_all(&self) {
        let removed = {
            let mut state = lock(&self.state);
            let keys = state.keys_by_recency();
            state.entries.clear();
            keys
        };

        if !removed.is_empty() {
            debug!(count = removed.len(), "Page cache cleared");
            self.subscribers.notify(&PageChange::ClearedAll(removed));
        }
    }

    // ===== Reads =====

    /// Data for `key` if cached and not stale.
    ///
    /// A hit counts as a touch when `touch_on_read` is enabled.
    pub fn get_page_data(&self, key: &str) -> Option<PageData> {
        let mut guard = lock(&self.state);
        let PageCacheState {
            entries,
            clock,
            stats,
            ..
        } = &mut *guard;

        match entries.get_mut(key) {
            Some(entry) if !entry.is_stale => {
                if self.config.touch_on_read {
                    *clock += 1;
                    entry.touch = *clock;
                    entry.last_visited = Utc::now();
                }
                stats.hits += 1;
                Some(Arc::clone(&entry.data))
            }
            _ => {
                stats.misses += 1;
                None
            }
        }
    }

    /// Same visibility rule as `get_page_data`, without touching the entry.
    pub fn peek_page_data(&self, key: &str) -> Option<PageData> {
        lock(&self.state)
            .entries
            .get(key)
            .filter(|entry| !entry.is_stale)
            .map(|entry| Arc::clone(&entry.data))
    }

    /// Whether an entry exists for `key`, stale or not.
    pub fn contains(&self, key: &str) -> bool {
        lock(&self.state).entries.contains_key(key)
    }

    pub fn cached_component(&self, key: &str) -> Option<ComponentRef> {
        lock(&self.state).entries.get(key).map(|entry| entry.component)
    }

    pub fn entry_info(&self, key: &str) -> Option<PageEntryInfo> {
        lock(&self.state).entries.get(key).map(|entry| PageEntryInfo {
            key: key.to_string(),
            component: entry.component,
            is_stale: entry.is_stale,
            last_visited: entry.last_visited,
            age: entry.age_display(),
        })
    }

    pub fn get_current_page(&self) -> Option<String> {
        lock(&self.state).current_page.clone()
    }

    /// Cached keys, most recently touched first.
    pub fn get_cached_pages(&self) -> Vec<String> {
        lock(&self.state).keys_by_recency()
    }

    pub fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> PageCacheStats {
        let state = lock(&self.state);
        PageCacheStats {
            entries: state.entries.len(),
            ..state.stats.clone()
        }
    }

    // ===== Subscriptions =====

    pub fn subscribe<F>(&self, callback: F) -> Subscription<PageChange>
    where
        F: Fn(&PageChange) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
