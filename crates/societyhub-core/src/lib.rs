//! SocietyHub Core Library
//!
//! Shared business logic for the SocietyHub student-society client:
//! the page-level cache that keeps previously visited views alive, the
//! per-view navigation bindings built on top of it, the keyed data store
//! and background prefetcher, plus the REST client and payload models.

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod utils;

// Re-export commonly used types at crate root
pub use api::{ApiClient, ApiError};
pub use cache::{
    BackgroundPrefetcher, CacheContext, ComponentRef, DataKey, EvictionTrigger, KeyedDataStore,
    MemoryDataStore, NavigationBinding, PageCacheConfig, PageCacheStore, PageChange, PageData,
    PageSwitch, PageSwitcher, PrefetchCoordinator, ProgressiveImages, Subscription,
};
pub use config::Config;
pub use models::Section;
