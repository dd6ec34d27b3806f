//! Application state management for the SocietyHub terminal client.
//!
//! `App` owns the shared cache stores and the navigation binding of the
//! section on screen. Switching sections tries the page cache first, then
//! the keyed data store, and only then the network. Fetches run on tokio
//! tasks and report back through an mpsc channel drained once per frame.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use societyhub_core::cache::LIST_KIND;
use societyhub_core::models::{ItemSummary, SectionPage};
use societyhub_core::utils::format_age;
use societyhub_core::{
    ApiClient, ApiError, BackgroundPrefetcher, CacheContext, Config, DataKey, MemoryDataStore,
    NavigationBinding, PageCacheStore, PageData, PageSwitch, PageSwitcher, ProgressiveImages,
    Section,
};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Full-size image downloads started per gallery page.
const MAX_IMAGE_LOADS: usize = 8;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// How the on-screen page relates to the page cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFreshness {
    Fresh,
    Stale,
    Loading,
    Uncached,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Messages sent from background fetch tasks back to the main loop.
enum FetchResult {
    /// One page of a section listing, as raw JSON
    Page {
        section: Section,
        page: u32,
        data: Value,
    },
    /// A full-size gallery image finished downloading (or failed)
    Image { url: String, ok: bool },
    Error {
        section: Section,
        page: u32,
        message: String,
        /// The same request may succeed later
        retryable: bool,
    },
}

/// What the page cache holds for a section: enough to redraw it exactly.
#[derive(Debug, Serialize, Deserialize)]
struct ViewState {
    page: u32,
    selection: usize,
    payload: Value,
}

pub struct App {
    pub config: Config,
    api: ApiClient,
    ctx: CacheContext,
    data: Arc<MemoryDataStore>,
    switcher: PageSwitcher,
    pub images: ProgressiveImages,
    binding: NavigationBinding,
    seen_revision: u64,

    pub state: AppState,
    pub current_section: Section,
    pub page_number: u32,
    pub view: SectionPage,
    payload: Option<PageData>,
    pub loading: bool,
    pub selection: usize,
    pub search_query: String,
    pub status_message: Option<String>,

    // Background task channel
    fetch_rx: mpsc::Receiver<FetchResult>,
    fetch_tx: mpsc::Sender<FetchResult>,
    in_flight: HashSet<(Section, u32)>,
    /// Fetches whose result must replace the cached view, fresh or not
    refreshing: HashSet<(Section, u32)>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Result<Self> {
        let api = ApiClient::new(&config.api_base_url)?;
        debug!(base_url = api.base_url(), "API client configured");

        let data = Arc::new(MemoryDataStore::new());
        let prefetch = Arc::new(BackgroundPrefetcher::new(api.clone(), Arc::clone(&data)));
        let pages = Arc::new(PageCacheStore::new(config.page_cache_config()));
        let ctx = CacheContext::new(Arc::clone(&pages), Arc::<MemoryDataStore>::clone(&data), prefetch);
        let switcher = PageSwitcher::new(pages);

        let section = config
            .last_tab
            .as_deref()
            .and_then(Section::from_page_key)
            .unwrap_or(Section::Events);
        let binding = ctx.bind(section.page_key());

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            config,
            api,
            ctx,
            data,
            switcher,
            images: ProgressiveImages::default(),
            binding,
            seen_revision: 0,

            state: AppState::Normal,
            current_section: section,
            page_number: 1,
            view: SectionPage::default(),
            payload: None,
            loading: false,
            selection: 0,
            search_query: String::new(),
            status_message: None,

            fetch_rx: rx,
            fetch_tx: tx,
            in_flight: HashSet::new(),
            refreshing: HashSet::new(),
        })
    }

    /// Kick off the one-time prefetch and show the opening section.
    pub fn start(&mut self) {
        if self.binding.ensure_prefetch() {
            info!("Background prefetch requested");
        }
        self.show_current();
    }

    /// Remember the open section for next launch.
    pub fn save_session(&mut self) {
        self.config.last_tab = Some(self.current_section.page_key().to_string());
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn switch_section(&mut self, section: Section) {
        if section == self.current_section {
            return;
        }
        self.remember_view();

        // Mounting the new binding drops the old one, which unsubscribes it
        self.binding = self.ctx.bind(section.page_key());
        self.seen_revision = self.binding.revision();

        self.current_section = section;
        self.page_number = 1;
        self.view = SectionPage::default();
        self.payload = None;
        self.loading = false;
        self.selection = 0;
        self.search_query.clear();
        self.status_message = None;

        self.show_current();
    }

    fn show_current(&mut self) {
        let section = self.current_section;
        // A refresh left pending: show the old view, then fetch again
        let refresh_pending = self
            .ctx
            .pages
            .entry_info(section.page_key())
            .is_some_and(|info| info.is_stale);

        match self.switcher.switch_to(section.page_key()) {
            PageSwitch::Instant { data, .. } => match ViewState::deserialize(&*data) {
                Ok(state) => {
                    debug!(section = section.page_key(), page = state.page, "Restored cached view");
                    self.selection = state.selection;
                    self.display(state.page, Arc::new(state.payload));
                    if refresh_pending {
                        self.refetch_current();
                    }
                    return;
                }
                Err(e) => {
                    warn!(section = section.page_key(), error = %e, "Cached view unreadable, reloading");
                }
            },
            PageSwitch::NeedsLoad => {}
        }
        self.load_page(1);
    }

    fn load_page(&mut self, page: u32) {
        let section = self.current_section;
        if let Some(payload) =
            self.binding
                .get_global_cache_data(section.namespace(), LIST_KIND, Some(page))
        {
            debug!(section = section.page_key(), page, "Page served from keyed data store");
            if self.display(page, payload) {
                self.cache_view();
            }
            return;
        }

        self.page_number = page;
        self.loading = true;
        self.status_message = Some(format!("Loading {}...", section.title()));
        self.spawn_fetch(section, page);
    }

    /// Decode and show a payload. Returns false if it could not be read.
    fn display(&mut self, page: u32, payload: PageData) -> bool {
        let section = self.current_section;
        self.loading = false;
        match section.decode(&payload) {
            Ok(view) => {
                self.view = view;
                self.page_number = page;
                self.payload = Some(payload);
                self.clamp_selection();
                self.queue_image_loads();
                true
            }
            Err(e) => {
                warn!(section = section.page_key(), page, error = %e, "Failed to decode page");
                self.status_message = Some(format!("Could not read {} data", section.title()));
                false
            }
        }
    }

    /// Save selection and page before leaving the section. A stale entry
    /// is left stale so its pending refresh still replaces it.
    fn remember_view(&self) {
        let key = self.current_section.page_key();
        if self.ctx.pages.entry_info(key).is_some_and(|info| info.is_stale) {
            debug!(section = key, "Keeping stale view for pending refresh");
            return;
        }
        self.cache_view();
    }

    /// Store the on-screen state in the page cache under the section key.
    fn cache_view(&self) {
        if let Some(payload) = &self.payload {
            let state = ViewState {
                page: self.page_number,
                selection: self.selection,
                payload: Value::clone(payload),
            };
            if let Err(e) = self
                .binding
                .cache_page_as(self.current_section.component(), &state)
            {
                warn!(error = %e, "Failed to cache view state");
            }
        }
    }

    pub fn next_page(&mut self) {
        if self.view.has_next && !self.loading {
            self.selection = 0;
            self.load_page(self.page_number + 1);
        }
    }

    pub fn prev_page(&mut self) {
        if self.page_number > 1 && !self.loading {
            self.selection = 0;
            self.load_page(self.page_number - 1);
        }
    }

    // =========================================================================
    // Cache actions
    // =========================================================================

    /// Mark the on-screen page stale and fetch it again. The old data stays
    /// visible until the new page arrives.
    pub fn refresh_current(&mut self) {
        self.binding.mark_stale();
        self.refetch_current();
    }

    fn refetch_current(&mut self) {
        self.refreshing.insert((self.current_section, self.page_number));
        self.loading = true;
        self.status_message = Some(format!("Refreshing {}...", self.current_section.title()));
        self.spawn_fetch(self.current_section, self.page_number);
    }

    /// Drop every cached view. Fetched payloads stay in the keyed store.
    pub fn clear_page_cache(&mut self) {
        let count = self.ctx.pages.len();
        self.ctx.pages.clear_all();
        info!(count, "Page cache cleared by user");
        self.status_message = Some(match count {
            0 => "Page cache already empty".to_string(),
            1 => "Cleared 1 cached page".to_string(),
            n => format!("Cleared {} cached pages", n),
        });
    }

    pub fn cleanup_cache(&mut self) {
        let evicted = self.ctx.pages.cleanup();
        self.status_message = Some(match evicted {
            0 => "Page cache within capacity".to_string(),
            1 => "Evicted 1 cached page".to_string(),
            n => format!("Evicted {} cached pages", n),
        });
    }

    pub fn page_freshness(&self) -> PageFreshness {
        match self.ctx.pages.entry_info(self.current_section.page_key()) {
            Some(info) if info.is_stale => PageFreshness::Stale,
            Some(_) => PageFreshness::Fresh,
            None if self.loading => PageFreshness::Loading,
            None => PageFreshness::Uncached,
        }
    }

    /// Status bar summary: current page freshness and cache fill.
    pub fn cache_status(&self) -> String {
        let page_state = match self.ctx.pages.entry_info(self.current_section.page_key()) {
            Some(info) if info.is_stale => "stale".to_string(),
            Some(info) => format!("cached {}", info.age),
            None if self.loading => "loading".to_string(),
            None => "not cached".to_string(),
        };

        let key = DataKey::new(
            self.current_section.namespace(),
            LIST_KIND,
            Some(self.page_number),
        );
        let fetched = match self.data.stored_at(&key) {
            Some(at) => format!(" | fetched {}", format_age(at)),
            None => String::new(),
        };

        format!(
            "{}{} | {}/{} pages",
            page_state,
            fetched,
            self.ctx.pages.len(),
            self.ctx.pages.config().effective_capacity(),
        )
    }

    pub fn is_prefetching(&self) -> bool {
        self.binding.is_prefetching()
    }

    pub fn prefetch_label(&self) -> Option<&'static str> {
        if self.binding.is_prefetching() {
            Some("prefetching")
        } else if self.binding.is_initial_prefetch_done() {
            Some("prefetched")
        } else {
            None
        }
    }

    pub fn cache_stats_line(&self) -> String {
        let stats = self.ctx.pages.stats();
        format!(
            "hits {} · misses {} · evictions {}",
            stats.hits, stats.misses, stats.evictions
        )
    }

    /// Sections with at least one payload in the keyed store, in tab order.
    pub fn stored_sections(&self) -> Vec<Section> {
        let keys = self.data.keys();
        Section::ALL
            .into_iter()
            .filter(|section| keys.iter().any(|key| key.namespace == section.namespace()))
            .collect()
    }

    // =========================================================================
    // Background tasks
    // =========================================================================

    async fn send_result(tx: &mpsc::Sender<FetchResult>, result: FetchResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send fetch result");
        }
    }

    fn spawn_fetch(&mut self, section: Section, page: u32) {
        if !self.in_flight.insert((section, page)) {
            debug!(section = section.page_key(), page, "Fetch already in flight");
            return;
        }

        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = match api.fetch_section_json(section, page).await {
                Ok(data) => FetchResult::Page {
                    section,
                    page,
                    data,
                },
                Err(e) => FetchResult::Error {
                    section,
                    page,
                    retryable: e
                        .downcast_ref::<ApiError>()
                        .is_some_and(ApiError::is_transient),
                    message: e.to_string(),
                },
            };
            Self::send_result(&tx, result).await;
        });
    }

    fn queue_image_loads(&self) {
        if self.current_section != Section::Gallery {
            return;
        }

        let urls = self
            .view
            .items
            .iter()
            .flat_map(|item| item.photos.iter())
            .map(|photo| photo.url.as_str());

        for url in self.images.pending(urls).into_iter().take(MAX_IMAGE_LOADS) {
            if !self.images.begin_load(&url) {
                continue;
            }
            let api = self.api.clone();
            let tx = self.fetch_tx.clone();
            tokio::spawn(async move {
                let ok = match api.fetch_image(&url).await {
                    Ok(bytes) => {
                        debug!(url = %url, bytes, "Image loaded");
                        true
                    }
                    Err(e) => {
                        warn!(url = %url, error = %e, "Image load failed");
                        false
                    }
                };
                Self::send_result(&tx, FetchResult::Image { url, ok }).await;
            });
        }
    }

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.fetch_rx.try_recv() {
            results.push(result);
        }

        for result in results {
            self.process_fetch_result(result);
        }

        self.sync_binding();
    }

    fn process_fetch_result(&mut self, result: FetchResult) {
        match result {
            FetchResult::Page {
                section,
                page,
                data,
            } => {
                self.in_flight.remove(&(section, page));
                let refreshed = self.refreshing.remove(&(section, page));
                let payload: PageData = Arc::new(data);
                self.binding.store_in_global_cache(
                    section.namespace(),
                    LIST_KIND,
                    Arc::clone(&payload),
                    Some(page),
                );

                if section == self.current_section && page == self.page_number {
                    if self.display(page, payload) {
                        self.cache_view();
                        self.status_message = None;
                    }
                } else if refreshed || page == 1 {
                    // Landed after the user moved on; keep it for the way back
                    let state = ViewState {
                        page,
                        selection: 0,
                        payload: Value::clone(&payload),
                    };
                    match serde_json::to_value(&state) {
                        Ok(value) if refreshed => {
                            debug!(section = section.page_key(), page, "Refreshed view replaces cached one");
                            self.ctx.pages.register_page(
                                section.page_key(),
                                section.component(),
                                Arc::new(value),
                            );
                        }
                        Ok(value) => {
                            self.switcher
                                .warm(section.page_key(), section.component(), Arc::new(value));
                        }
                        Err(e) => warn!(error = %e, "Failed to encode view state"),
                    }
                }
            }
            FetchResult::Image { url, ok } => {
                self.images.finish_load(&url, ok);
            }
            FetchResult::Error {
                section,
                page,
                message,
                retryable,
            } => {
                self.in_flight.remove(&(section, page));
                self.refreshing.remove(&(section, page));
                error!(section = section.page_key(), page, retryable, error = %message, "Background fetch error");
                if section == self.current_section {
                    self.loading = false;
                    self.status_message = Some(user_message(&message, retryable));
                }
            }
        }
    }

    /// React to page cache changes that touched the on-screen section.
    fn sync_binding(&mut self) {
        let revision = self.binding.revision();
        if revision == self.seen_revision {
            return;
        }
        self.seen_revision = revision;

        if self.payload.is_some() && !self.binding.is_page_cached() && !self.loading {
            debug!(section = self.current_section.page_key(), "On-screen page left the cache");
            self.status_message = Some("Page evicted from cache; [r] to reload".to_string());
        }
    }

    // =========================================================================
    // List selection
    // =========================================================================

    /// Items of the current page that match the search query.
    pub fn visible_items(&self) -> Vec<&ItemSummary> {
        self.view
            .items
            .iter()
            .filter(|item| item.matches(&self.search_query))
            .collect()
    }

    pub fn selected_item(&self) -> Option<&ItemSummary> {
        self.visible_items().get(self.selection).copied()
    }

    pub fn select_next(&mut self, step: usize) {
        self.selection = self.selection.saturating_add(step);
        self.clamp_selection();
    }

    pub fn select_prev(&mut self, step: usize) {
        self.selection = self.selection.saturating_sub(step);
    }

    pub fn select_last(&mut self) {
        self.selection = usize::MAX;
        self.clamp_selection();
    }

    pub fn clamp_selection(&mut self) {
        let len = self.visible_items().len();
        self.selection = self.selection.min(len.saturating_sub(1));
    }
}

/// Simplify common error messages for the user. Transient failures get a
/// retry hint.
fn user_message(msg: &str, retryable: bool) -> String {
    let lower = msg.to_lowercase();
    let text = if lower.contains("rate limit") {
        "Server is busy. Please wait a moment and try again.".to_string()
    } else if lower.contains("network") || lower.contains("connect") {
        "Network error. Check your connection.".to_string()
    } else if lower.contains("not found") {
        "This section is not available on the server.".to_string()
    } else {
        format!("Error: {}", msg)
    };
    if retryable {
        format!("{} [r] to retry", text)
    } else {
        text
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) fn offline_app() -> App {
    // Nothing listens on the discard port, so fetches fail fast
    let config = Config {
        api_base_url: "http://127.0.0.1:9/api".to_string(),
        ..Config::default()
    };
    App::new(config).unwrap()
}

#[cfg(test)]
impl App {
    /// Put a page straight into the keyed store, as if fetched earlier.
    pub(crate) fn seed_page(&self, section: Section, page: u32, payload: Value) {
        use societyhub_core::KeyedDataStore;
        self.data
            .set_data(section.namespace(), LIST_KIND, Arc::new(payload), Some(page));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use societyhub_core::KeyedDataStore;

    fn projects_payload() -> Value {
        json!({
            "count": 2,
            "next": null,
            "previous": null,
            "results": [
                {"id": 1, "title": "Rover", "tech_stack": ["rust"]},
                {"id": 2, "title": "Campus Map", "tech_stack": ["svelte"]}
            ]
        })
    }

    fn seed(app: &App, section: Section, page: u32, payload: Value) {
        app.seed_page(section, page, payload);
    }

    #[tokio::test]
    async fn test_keyed_store_page_shown_without_fetch() {
        let mut app = offline_app();
        seed(&app, Section::Projects, 1, projects_payload());

        app.switch_section(Section::Projects);

        assert!(!app.loading);
        assert!(app.in_flight.is_empty());
        assert_eq!(app.view.items.len(), 2);
        assert!(app.ctx.pages.contains("projects"));
    }

    #[tokio::test]
    async fn test_returning_restores_view_state() {
        let mut app = offline_app();
        seed(&app, Section::Projects, 1, projects_payload());
        app.switch_section(Section::Projects);
        app.select_next(1);

        app.switch_section(Section::Resources);
        assert!(app.loading);
        app.switch_section(Section::Projects);

        assert!(!app.loading);
        assert_eq!(app.selection, 1);
        assert_eq!(app.selected_item().map(|i| i.headline.as_str()), Some("Campus Map"));
        assert_eq!(app.ctx.pages.stats().hits, 1);
    }

    #[tokio::test]
    async fn test_refresh_marks_page_stale() {
        let mut app = offline_app();
        seed(&app, Section::Projects, 1, projects_payload());
        app.switch_section(Section::Projects);

        app.refresh_current();

        assert!(app.loading);
        assert!(app.cache_status().starts_with("stale"));
        assert_eq!(app.page_freshness(), PageFreshness::Stale);
        // Old data stays on screen while the refetch runs
        assert_eq!(app.view.items.len(), 2);
    }

    #[tokio::test]
    async fn test_late_fetch_warms_other_section() {
        let mut app = offline_app();
        app.process_fetch_result(FetchResult::Page {
            section: Section::Gallery,
            page: 1,
            data: json!([{
                "title": "Hack Night",
                "photos": [{"url": "https://cdn.example.org/1.jpg"}]
            }]),
        });

        assert!(app.switcher.can_switch_instantly("gallery"));
        assert!(app.ctx.data.has_data("gallery", LIST_KIND, Some(1)));

        app.switch_section(Section::Gallery);
        assert_eq!(app.view.items.len(), 1);
        assert!(app.in_flight.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_error_for_current_section() {
        let mut app = offline_app();
        app.loading = true;
        app.process_fetch_result(FetchResult::Error {
            section: app.current_section,
            page: 1,
            message: "error sending request: connection refused".to_string(),
            retryable: true,
        });

        assert!(!app.loading);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Network error. Check your connection. [r] to retry")
        );
    }

    fn titled(title: &str) -> Value {
        json!({"count": 1, "next": null, "previous": null, "results": [{"id": 7, "title": title}]})
    }

    fn headlines(app: &App) -> Vec<String> {
        app.view.items.iter().map(|item| item.headline.clone()).collect()
    }

    #[tokio::test]
    async fn test_refresh_result_after_switching_away_replaces_view() {
        let mut app = offline_app();
        seed(&app, Section::Projects, 1, titled("Old"));
        app.switch_section(Section::Projects);

        app.refresh_current();
        app.switch_section(Section::Resources);
        assert_eq!(app.ctx.pages.entry_info("projects").map(|i| i.is_stale), Some(true));

        app.process_fetch_result(FetchResult::Page {
            section: Section::Projects,
            page: 1,
            data: titled("New"),
        });
        assert_eq!(app.ctx.pages.entry_info("projects").map(|i| i.is_stale), Some(false));

        app.switch_section(Section::Projects);
        assert_eq!(headlines(&app), vec!["New".to_string()]);
        assert!(!app.loading);
    }

    #[tokio::test]
    async fn test_failed_refresh_refetches_on_return() {
        let mut app = offline_app();
        seed(&app, Section::Projects, 1, titled("Old"));
        app.switch_section(Section::Projects);

        app.refresh_current();
        app.switch_section(Section::Resources);
        app.process_fetch_result(FetchResult::Error {
            section: Section::Projects,
            page: 1,
            message: "Server error: 502".to_string(),
            retryable: true,
        });
        assert_eq!(app.ctx.pages.entry_info("projects").map(|i| i.is_stale), Some(true));

        // Old data comes back on screen while the refresh is retried
        app.switch_section(Section::Projects);
        assert_eq!(headlines(&app), vec!["Old".to_string()]);
        assert!(app.loading);
        assert!(app.in_flight.contains(&(Section::Projects, 1)));
    }

    #[tokio::test]
    async fn test_clear_page_cache() {
        let mut app = offline_app();
        seed(&app, Section::Projects, 1, projects_payload());
        app.switch_section(Section::Projects);
        assert_eq!(app.ctx.pages.len(), 1);

        app.clear_page_cache();
        assert!(app.ctx.pages.is_empty());
        assert_eq!(app.status_message.as_deref(), Some("Cleared 1 cached page"));
        // Fetched payloads survive
        assert!(app.ctx.data.has_data("projects", LIST_KIND, Some(1)));
    }

    #[tokio::test]
    async fn test_status_reports_keyed_store() {
        let mut app = offline_app();
        seed(&app, Section::Projects, 1, projects_payload());
        seed(&app, Section::Gallery, 1, json!([]));
        app.switch_section(Section::Projects);

        assert!(app.cache_status().contains("fetched just now"));
        assert_eq!(app.stored_sections(), vec![Section::Projects, Section::Gallery]);
    }

    #[tokio::test]
    async fn test_search_limits_selection() {
        let mut app = offline_app();
        seed(&app, Section::Projects, 1, projects_payload());
        app.switch_section(Section::Projects);

        app.search_query = "rover".to_string();
        app.select_next(PAGE_SCROLL_SIZE);

        assert_eq!(app.visible_items().len(), 1);
        assert_eq!(app.selection, 0);
    }

    #[tokio::test]
    async fn test_cleanup_reports_evictions() {
        let mut app = offline_app();
        app.cleanup_cache();
        assert_eq!(app.status_message.as_deref(), Some("Page cache within capacity"));
    }

    #[test]
    fn test_user_message() {
        assert_eq!(
            user_message("Rate limited - please wait", false),
            "Server is busy. Please wait a moment and try again."
        );
        assert_eq!(
            user_message("Not found", false),
            "This section is not available on the server."
        );
        assert_eq!(user_message("boom", false), "Error: boom");
        assert_eq!(user_message("boom", true), "Error: boom [r] to retry");
    }
}
