//! In-memory page caching and navigation continuity.
//!
//! This module lets the client switch between previously visited views
//! without re-fetching their data. Nothing here survives a restart.
//!
//! - `PageCacheStore`: bounded, per-page cache with staleness and eviction
//! - `NavigationBinding`: per-view facade over the shared stores
//! - `KeyedDataStore` / `MemoryDataStore`: namespaced payload cache
//! - `PrefetchCoordinator` / `BackgroundPrefetcher`: speculative warm-up
//! - `PageSwitcher`, `ProgressiveImages`: navigation helpers

pub mod binding;
pub mod data_store;
pub mod images;
pub mod prefetch;
pub mod store;
pub mod subscribers;
pub mod switcher;

pub use binding::{CacheContext, NavigationBinding};
pub use data_store::{DataKey, KeyedDataStore, MemoryDataStore, LIST_KIND};
pub use images::{ImageState, ProgressiveImages};
pub use prefetch::{BackgroundPrefetcher, PrefetchCoordinator};
pub use store::{
    ComponentRef, EvictionTrigger, PageCacheConfig, PageCacheStats, PageCacheStore, PageChange,
    PageData, PageEntryInfo,
};
pub use subscribers::{SubscriberRegistry, Subscription};
pub use switcher::{PageSwitch, PageSwitcher};
