//! Navigation binding: the per-view facade over the shared cache stores.
//!
//! A view mounts one `NavigationBinding` for its page key. The binding
//! subscribes to the page cache for as long as it lives, mirrors the
//! page's cached/loaded state into local flags, and forwards keyed-data and
//! prefetch calls so views never talk to those collaborators directly.
//! Dropping the binding unsubscribes, on every exit path.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use super::data_store::KeyedDataStore;
use super::prefetch::PrefetchCoordinator;
use super::store::{ComponentRef, PageCacheStore, PageChange, PageData};
use super::subscribers::Subscription;

/// The shared stores every binding works against.
///
/// Constructed once by the application and cloned into each binding, so a
/// test can build a fresh, isolated set per case.
#[derive(Clone)]
pub struct CacheContext {
    pub pages: Arc<PageCacheStore>,
    pub data: Arc<dyn KeyedDataStore>,
    pub prefetch: Arc<dyn PrefetchCoordinator>,
}

impl CacheContext {
    pub fn new(
        pages: Arc<PageCacheStore>,
        data: Arc<dyn KeyedDataStore>,
        prefetch: Arc<dyn PrefetchCoordinator>,
    ) -> Self {
        Self {
            pages,
            data,
            prefetch,
        }
    }

    /// Mount a binding for `page_key`.
    pub fn bind(&self, page_key: &str) -> NavigationBinding {
        NavigationBinding::mount(self.clone(), page_key)
    }
}

#[derive(Default)]
struct BindingFlags {
    page_cached: AtomicBool,
    data_loaded: AtomicBool,
    revision: AtomicU64,
}

impl BindingFlags {
    /// Re-read through non-touching accessors so refreshing never reorders eviction.
    fn refresh(&self, pages: &PageCacheStore, key: &str) {
        self.page_cached.store(pages.contains(key), Ordering::SeqCst);
        self.data_loaded
            .store(pages.peek_page_data(key).is_some(), Ordering::SeqCst);
    }
}

pub struct NavigationBinding {
    key: String,
    ctx: CacheContext,
    flags: Arc<BindingFlags>,
    subscription: Subscription<PageChange>,
}

impl NavigationBinding {
    pub fn mount(ctx: CacheContext, page_key: &str) -> Self {
        let flags = Arc::new(BindingFlags::default());
        flags.refresh(&ctx.pages, page_key);

        // Weak: the store owns this callback, so a strong handle would cycle
        let pages = Arc::downgrade(&ctx.pages);
        let callback_flags = Arc::clone(&flags);
        let callback_key = page_key.to_string();
        let subscription = ctx.pages.subscribe(move |change| {
            if !change.affects(&callback_key) {
                return;
            }
            if let Some(pages) = pages.upgrade() {
                callback_flags.refresh(&pages, &callback_key);
            }
            callback_flags.revision.fetch_add(1, Ordering::SeqCst);
        });

        debug!(page = page_key, "Navigation binding mounted");

        Self {
            key: page_key.to_string(),
            ctx,
            flags,
            subscription,
        }
    }

    pub fn page_key(&self) -> &str {
        &self.key
    }

    pub fn context(&self) -> &CacheContext {
        &self.ctx
    }

    // ===== Page cache =====

    pub fn mark_visited(&self) {
        self.ctx.pages.visit_page(&self.key);
    }

    /// Store this view's state. Local flags flip before the store notifies,
    /// so the view never renders an "unloaded" frame in between.
    pub fn cache_page(&self, component: ComponentRef, data: PageData) {
        self.flags.page_cached.store(true, Ordering::SeqCst);
        self.flags.data_loaded.store(true, Ordering::SeqCst);
        self.ctx.pages.register_page(&self.key, component, data);
    }

    pub fn get_cached_data(&self) -> Option<PageData> {
        self.ctx.pages.get_page_data(&self.key)
    }

    pub fn mark_stale(&self) {
        self.ctx.pages.mark_page_stale(&self.key);
    }

    /// Serialize `value` and cache it for this page.
    pub fn cache_page_as<T: Serialize>(&self, component: ComponentRef, value: &T) -> Result<()> {
        let data = serde_json::to_value(value)
            .with_context(|| format!("Failed to serialize page data for {}", self.key))?;
        self.cache_page(component, Arc::new(data));
        Ok(())
    }

    // ===== Keyed data store =====

    pub fn has_global_cache_data(&self, namespace: &str, kind: &str, page: Option<u32>) -> bool {
        self.ctx.data.has_data(namespace, kind, page)
    }

    pub fn get_global_cache_data(
        &self,
        namespace: &str,
        kind: &str,
        page: Option<u32>,
    ) -> Option<PageData> {
        self.ctx.data.get_data(namespace, kind, page)
    }

    pub fn store_in_global_cache(
        &self,
        namespace: &str,
        kind: &str,
        payload: PageData,
        page: Option<u32>,
    ) {
        self.ctx.data.set_data(namespace, kind, payload, page);
    }

    // ===== Prefetch =====

    /// Start the background prefetch unless one is running or the initial
    /// warm-up already completed. Returns whether a start was issued.
    pub fn ensure_prefetch(&self) -> bool {
        if self.ctx.prefetch.is_prefetching() || self.ctx.data.is_initial_prefetch_done() {
            return false;
        }
        debug!(page = %self.key, "Requesting background prefetch");
        self.ctx.prefetch.start_background_prefetch();
        true
    }

    // ===== Reactive flags =====

    /// An entry exists for this page, stale or not.
    pub fn is_page_cached(&self) -> bool {
        self.flags.page_cached.load(Ordering::SeqCst)
    }

    /// Fresh data is readable for this page.
    pub fn is_data_loaded(&self) -> bool {
        self.flags.data_loaded.load(Ordering::SeqCst)
    }

    pub fn is_prefetching(&self) -> bool {
        self.ctx.prefetch.is_prefetching()
    }

    pub fn is_initial_prefetch_done(&self) -> bool {
        self.ctx.data.is_initial_prefetch_done()
    }

    /// Bumped on every store change affecting this page.
    pub fn revision(&self) -> u64 {
        self.flags.revision.load(Ordering::SeqCst)
    }
}

impl Drop for NavigationBinding {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
        debug!(page = %self.key, "Navigation binding unmounted");
    }
}

// ============================================================================
// Tests
// ============================================================================
