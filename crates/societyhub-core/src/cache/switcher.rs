//! Instant page switching backed by the page cache.

use std::sync::Arc;

use tracing::debug;

use super::store::{ComponentRef, PageCacheStore, PageData};

/// Outcome of navigating to a page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageSwitch {
    /// Cached view state is available; render it without fetching.
    Instant {
        component: ComponentRef,
        data: PageData,
    },
    /// Nothing usable cached; the view must load its data.
    NeedsLoad,
}

impl PageSwitch {
    pub fn is_instant(&self) -> bool {
        matches!(self, PageSwitch::Instant { .. })
    }
}

pub struct PageSwitcher {
    pages: Arc<PageCacheStore>,
}

impl PageSwitcher {
    pub fn new(pages: Arc<PageCacheStore>) -> Self {
        Self { pages }
    }

    /// Record the visit, then hand back cached state if there is any.
    ///
    /// Visiting revalidates a stale entry, so its previous data is shown
    /// again while the caller decides whether to refetch.
    pub fn switch_to(&self, key: &str) -> PageSwitch {
        self.pages.visit_page(key);

        match (self.pages.get_page_data(key), self.pages.cached_component(key)) {
            (Some(data), Some(component)) => {
                debug!(page = key, "Instant page switch");
                PageSwitch::Instant { component, data }
            }
            _ => PageSwitch::NeedsLoad,
        }
    }

    /// Whether `switch_to(key)` would currently be instant, without visiting.
    pub fn can_switch_instantly(&self, key: &str) -> bool {
        self.pages.contains(key)
    }

    /// Populate a page ahead of navigation. Fresh entries are left alone.
    /// Returns whether the page was registered.
    pub fn warm(&self, key: &str, component: ComponentRef, data: PageData) -> bool {
        if self.pages.peek_page_data(key).is_some() {
            return false;
        }
        self.pages.register_page(key, component, data);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const VIEW: ComponentRef = ComponentRef::new(9);

    fn switcher() -> (Arc<PageCacheStore>, PageSwitcher) {
        let pages = Arc::new(PageCacheStore::default());
        let switcher = PageSwitcher::new(Arc::clone(&pages));
        (pages, switcher)
    }

    #[test]
    fn test_unknown_page_needs_load() {
        let (pages, switcher) = switcher();
        assert_eq!(switcher.switch_to("events"), PageSwitch::NeedsLoad);
        assert_eq!(pages.get_current_page(), Some("events".to_string()));
        assert!(pages.is_empty());
    }

    #[test]
    fn test_cached_page_switches_instantly() {
        let (pages, switcher) = switcher();
        pages.register_page("events", VIEW, Arc::new(json!([1])));

        match switcher.switch_to("events") {
            PageSwitch::Instant { component, data } => {
                assert_eq!(component, VIEW);
                assert_eq!(*data, json!([1]));
            }
            PageSwitch::NeedsLoad => panic!("expected instant switch"),
        }
    }

    #[test]
    fn test_stale_page_revalidated_on_switch() {
        let (pages, switcher) = switcher();
        pages.register_page("events", VIEW, Arc::new(json!([1])));
        pages.mark_page_stale("events");

        assert!(switcher.can_switch_instantly("events"));
        assert!(switcher.switch_to("events").is_instant());
    }

    #[test]
    fn test_warm_skips_fresh_pages() {
        let (pages, switcher) = switcher();
        assert!(switcher.warm("projects", VIEW, Arc::new(json!(1))));
        assert!(!switcher.warm("projects", VIEW, Arc::new(json!(2))));
        assert_eq!(pages.peek_page_data("projects").as_deref(), Some(&json!(1)));

        pages.mark_page_stale("projects");
        assert!(switcher.warm("projects", VIEW, Arc::new(json!(3))));
        assert_eq!(pages.peek_page_data("projects").as_deref(), Some(&json!(3)));
    }
}
