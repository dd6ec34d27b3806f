use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page envelope returned by every list endpoint.
///
/// Some endpoints return a bare JSON array instead; that is read as a single
/// page holding every item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "PageEnvelope<T>")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Paginated<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageEnvelope<T> {
    Paged {
        #[serde(default)]
        count: Option<usize>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        results: Vec<T>,
    },
    Bare(Vec<T>),
}

impl<T> From<PageEnvelope<T>> for Paginated<T> {
    fn from(envelope: PageEnvelope<T>) -> Self {
        match envelope {
            PageEnvelope::Paged {
                count,
                next,
                previous,
                results,
            } => Self {
                count: count.unwrap_or(results.len()),
                next,
                previous,
                results,
            },
            PageEnvelope::Bare(results) => Self {
                count: results.len(),
                next: None,
                previous: None,
                results,
            },
        }
    }
}

impl<T> Paginated<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

/// Image reference for progressive loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRef {
    pub url: String,
    pub thumbnail: Option<String>,
    pub caption: String,
}

/// Display-ready flattening of one list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSummary {
    pub headline: String,
    pub meta: String,
    pub details: Vec<(&'static str, String)>,
    pub description: Option<String>,
    pub photos: Vec<PhotoRef>,
}

impl ItemSummary {
    /// Case-insensitive match against headline, meta and detail values.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        self.headline.to_lowercase().contains(&query)
            || self.meta.to_lowercase().contains(&query)
            || self
                .details
                .iter()
                .any(|(_, value)| value.to_lowercase().contains(&query))
    }
}

/// Implemented by every model that shows up in a section list.
pub trait Summary {
    fn summarize(&self) -> ItemSummary;
}

/// One decoded page of a section, ready to render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionPage {
    pub items: Vec<ItemSummary>,
    pub count: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

impl SectionPage {
    /// Decode a cached JSON payload as a page of `T`.
    pub fn from_value<T>(value: &Value) -> Result<Self>
    where
        T: DeserializeOwned + Summary,
    {
        let page: Paginated<T> = Paginated::deserialize(value)
            .context("Failed to decode cached page payload")?;

        Ok(Self {
            count: page.count,
            has_next: page.has_next(),
            has_previous: page.has_previous(),
            items: page.results.iter().map(Summary::summarize).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Item {
        name: String,
    }

    impl Summary for Item {
        fn summarize(&self) -> ItemSummary {
            ItemSummary {
                headline: self.name.clone(),
                meta: String::new(),
                details: vec![("Kind", "demo".to_string())],
                description: None,
                photos: vec![],
            }
        }
    }

    #[test]
    fn test_paginated_envelope() {
        let value = json!({
            "count": 12,
            "next": "http://host/api/events/?page=2",
            "previous": null,
            "results": [{"name": "a"}, {"name": "b"}]
        });
        let page: Paginated<Item> = serde_json::from_value(value).unwrap();

        assert_eq!(page.count, 12);
        assert!(page.has_next());
        assert!(!page.has_previous());
        assert_eq!(page.results.len(), 2);
    }

    #[test]
    fn test_bare_array_is_single_page() {
        let page: Paginated<Item> =
            serde_json::from_value(json!([{"name": "a"}, {"name": "b"}, {"name": "c"}])).unwrap();

        assert_eq!(page.count, 3);
        assert!(!page.has_next());
    }

    #[test]
    fn test_section_page_from_value() {
        let page = SectionPage::from_value::<Item>(&json!({"results": [{"name": "x"}]})).unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.items[0].headline, "x");
    }

    #[test]
    fn test_section_page_rejects_garbage() {
        assert!(SectionPage::from_value::<Item>(&json!({"oops": true})).is_err());
    }

    #[test]
    fn test_summary_matches_case_insensitive() {
        let summary = Item { name: "RustConf Workshop".to_string() }.summarize();
        assert!(summary.matches("rustconf"));
        assert!(summary.matches("DEMO"));
        assert!(summary.matches(""));
        assert!(!summary.matches("python"));
    }
}
