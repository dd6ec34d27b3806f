//! Progressive image loading for galleries.
//!
//! Each image shows a low-resolution thumbnail until its full version has
//! been fetched. Loaded URLs are remembered for the process lifetime, so a
//! gallery revisited later renders full images straight away.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use super::subscribers::lock;

/// Thumbnail width requested when the API supplies no thumbnail URL.
const DEFAULT_THUMBNAIL_WIDTH: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    Placeholder,
    Loading,
    Loaded,
    Failed,
}

/// Derive a resized-image URL by adding a `w` query parameter.
pub fn thumbnail_url(url: &str, width: u32) -> String {
    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    };
    let separator = if base.contains('?') { '&' } else { '?' };

    match fragment {
        Some(fragment) => format!("{}{}w={}#{}", base, separator, width, fragment),
        None => format!("{}{}w={}", base, separator, width),
    }
}

pub struct ProgressiveImages {
    states: Mutex<HashMap<String, ImageState>>,
    thumbnail_width: u32,
}

impl Default for ProgressiveImages {
    fn default() -> Self {
        Self::new(DEFAULT_THUMBNAIL_WIDTH)
    }
}

impl ProgressiveImages {
    pub fn new(thumbnail_width: u32) -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            thumbnail_width,
        }
    }

    pub fn state(&self, url: &str) -> ImageState {
        lock(&self.states)
            .get(url)
            .copied()
            .unwrap_or(ImageState::Placeholder)
    }

    /// Claim `url` for loading. Returns `false` if it is already loading or
    /// loaded, so each image is fetched at most once at a time.
    pub fn begin_load(&self, url: &str) -> bool {
        let mut states = lock(&self.states);
        match states.get(url) {
            Some(ImageState::Loading) | Some(ImageState::Loaded) => false,
            _ => {
                states.insert(url.to_string(), ImageState::Loading);
                true
            }
        }
    }

    pub fn finish_load(&self, url: &str, success: bool) {
        let state = if success {
            ImageState::Loaded
        } else {
            ImageState::Failed
        };
        debug!(url, ?state, "Image load finished");
        lock(&self.states).insert(url.to_string(), state);
    }

    /// URL to display right now: the full image once loaded, else a thumbnail.
    pub fn display_source(&self, url: &str, thumbnail: Option<&str>) -> String {
        if self.state(url) == ImageState::Loaded {
            return url.to_string();
        }
        match thumbnail {
            Some(thumb) => thumb.to_string(),
            None => thumbnail_url(url, self.thumbnail_width),
        }
    }

    /// Filter `urls` down to those still worth fetching.
    pub fn pending<'a, I>(&self, urls: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let states = lock(&self.states);
        urls.into_iter()
            .filter(|url| {
                !matches!(
                    states.get(*url),
                    Some(ImageState::Loading) | Some(ImageState::Loaded)
                )
            })
            .map(str::to_string)
            .collect()
    }

    pub fn loaded_count(&self) -> usize {
        lock(&self.states)
            .values()
            .filter(|state| **state == ImageState::Loaded)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "https://cdn.example.org/hack.jpg";

    #[test]
    fn test_thumbnail_url() {
        assert_eq!(thumbnail_url(FULL, 64), "https://cdn.example.org/hack.jpg?w=64");
        assert_eq!(
            thumbnail_url("https://cdn.example.org/a.jpg?v=2", 32),
            "https://cdn.example.org/a.jpg?v=2&w=32"
        );
        assert_eq!(
            thumbnail_url("https://cdn.example.org/a.jpg#top", 32),
            "https://cdn.example.org/a.jpg?w=32#top"
        );
    }

    #[test]
    fn test_thumbnail_until_loaded() {
        let images = ProgressiveImages::default();
        assert_eq!(images.state(FULL), ImageState::Placeholder);
        assert_eq!(images.display_source(FULL, None), format!("{}?w=64", FULL));
        assert_eq!(images.display_source(FULL, Some("thumb.jpg")), "thumb.jpg");

        assert!(images.begin_load(FULL));
        assert_eq!(images.state(FULL), ImageState::Loading);
        images.finish_load(FULL, true);

        assert_eq!(images.display_source(FULL, Some("thumb.jpg")), FULL);
        assert_eq!(images.loaded_count(), 1);
    }

    #[test]
    fn test_begin_load_is_idempotent() {
        let images = ProgressiveImages::default();
        assert!(images.begin_load(FULL));
        assert!(!images.begin_load(FULL));

        images.finish_load(FULL, true);
        assert!(!images.begin_load(FULL));
    }

    #[test]
    fn test_failed_load_can_retry() {
        let images = ProgressiveImages::default();
        images.begin_load(FULL);
        images.finish_load(FULL, false);

        assert_eq!(images.state(FULL), ImageState::Failed);
        assert_eq!(images.pending([FULL]), vec![FULL.to_string()]);
        assert!(images.begin_load(FULL));
    }

    #[test]
    fn test_pending_skips_loading_and_loaded() {
        let images = ProgressiveImages::default();
        images.begin_load("a");
        images.begin_load("b");
        images.finish_load("b", true);

        assert_eq!(images.pending(["a", "b", "c"]), vec!["c".to_string()]);
    }
}
