//! Background prefetch: speculative warm-up of the keyed data store.
//!
//! `PrefetchCoordinator` is the contract navigation bindings rely on.
//! `BackgroundPrefetcher` implements it with a tokio task that fetches the
//! first page of every section and stores the raw JSON.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::data_store::{KeyedDataStore, MemoryDataStore, LIST_KIND};
use crate::api::ApiClient;
use crate::models::Section;

/// Maximum concurrent section fetches during a prefetch run.
const MAX_CONCURRENT_PREFETCH: usize = 3;

/// Tracks and starts the speculative warm-up.
pub trait PrefetchCoordinator: Send + Sync {
    fn is_prefetching(&self) -> bool;

    /// Fire-and-forget. Calls while a run is in flight are ignored.
    fn start_background_prefetch(&self);
}

/// Clears the running flag when the task ends, however it ends.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct BackgroundPrefetcher {
    api: ApiClient,
    data: Arc<MemoryDataStore>,
    sections: Vec<Section>,
    running: Arc<AtomicBool>,
    runs_started: AtomicU64,
}

impl BackgroundPrefetcher {
    pub fn new(api: ApiClient, data: Arc<MemoryDataStore>) -> Self {
        Self {
            api,
            data,
            sections: Section::ALL.to_vec(),
            running: Arc::new(AtomicBool::new(false)),
            runs_started: AtomicU64::new(0),
        }
    }

    /// Restrict which sections a run warms.
    pub fn with_sections(mut self, sections: Vec<Section>) -> Self {
        self.sections = sections;
        self
    }

    pub fn runs_started(&self) -> u64 {
        self.runs_started.load(Ordering::SeqCst)
    }

    async fn run(api: ApiClient, data: Arc<MemoryDataStore>, sections: Vec<Section>) {
        info!(sections = sections.len(), "Background prefetch started");

        let results: Vec<(Section, bool)> = stream::iter(sections)
            .map(|section| {
                let api = api.clone();
                let data = Arc::clone(&data);
                async move {
                    match api.fetch_section_json(section, 1).await {
                        Ok(value) => {
                            data.set_data(section.namespace(), LIST_KIND, Arc::new(value), Some(1));
                            (section, true)
                        }
                        Err(e) => {
                            warn!(section = section.page_key(), error = %e, "Prefetch failed");
                            (section, false)
                        }
                    }
                }
            })
            .buffer_unordered(MAX_CONCURRENT_PREFETCH)
            .collect()
            .await;

        let warmed = results.iter().filter(|(_, ok)| *ok).count();
        if warmed == results.len() {
            data.mark_initial_prefetch_done();
            info!(warmed, "Background prefetch complete");
        } else {
            // Left undone so the next ensure_prefetch tries again
            warn!(warmed, total = results.len(), "Background prefetch incomplete");
        }
    }
}

impl PrefetchCoordinator for BackgroundPrefetcher {
    fn is_prefetching(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn start_background_prefetch(&self) {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Prefetch already running");
            return;
        }
        let guard = RunningGuard(Arc::clone(&self.running));

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "No async runtime, prefetch skipped");
                return;
            }
        };

        self.runs_started.fetch_add(1, Ordering::SeqCst);
        let api = self.api.clone();
        let data = Arc::clone(&self.data);
        let sections = self.sections.clone();

        handle.spawn(async move {
            let _guard = guard;
            Self::run(api, data, sections).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn prefetcher() -> BackgroundPrefetcher {
        // Nothing listens on the discard port, so fetches fail fast
        let api = ApiClient::new("http://127.0.0.1:9/api").unwrap();
        BackgroundPrefetcher::new(api, Arc::new(MemoryDataStore::new()))
    }

    #[test]
    fn test_start_outside_runtime_resets_flag() {
        let prefetcher = prefetcher();
        prefetcher.start_background_prefetch();

        assert!(!prefetcher.is_prefetching());
        assert_eq!(prefetcher.runs_started(), 0);
    }

    #[tokio::test]
    async fn test_repeated_start_spawns_once() {
        let prefetcher = prefetcher().with_sections(vec![Section::Events]);

        prefetcher.start_background_prefetch();
        prefetcher.start_background_prefetch();
        prefetcher.start_background_prefetch();

        assert!(prefetcher.is_prefetching());
        assert_eq!(prefetcher.runs_started(), 1);
    }

    #[tokio::test]
    async fn test_failed_run_clears_flag_and_stays_undone() {
        let data = Arc::new(MemoryDataStore::new());
        let api = ApiClient::new("http://127.0.0.1:9/api").unwrap();
        let prefetcher =
            BackgroundPrefetcher::new(api, Arc::clone(&data)).with_sections(vec![Section::Events]);

        prefetcher.start_background_prefetch();
        for _ in 0..200 {
            if !prefetcher.is_prefetching() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }

        assert!(!prefetcher.is_prefetching());
        assert!(!data.is_initial_prefetch_done());
        assert!(data.is_empty());
    }
}
