use serde::{Deserialize, Serialize};

use super::page::{ItemSummary, PhotoRef, Summary};
use crate::utils::format::format_date;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub id: i64,
    #[serde(alias = "image", alias = "src")]
    pub url: String,
    #[serde(alias = "thumbnailUrl", alias = "thumbnail", default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gallery {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    #[serde(alias = "eventName", default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(alias = "images", default)]
    pub photos: Vec<Photo>,
}

impl Summary for Gallery {
    fn summarize(&self) -> ItemSummary {
        let date = self
            .date
            .as_deref()
            .map(format_date)
            .unwrap_or_else(|| "Undated".to_string());

        let mut details = vec![
            ("Date", date.clone()),
            ("Photos", self.photos.len().to_string()),
        ];
        if let Some(ref event) = self.event_name {
            details.push(("Event", event.clone()));
        }

        let photos = self
            .photos
            .iter()
            .map(|photo| PhotoRef {
                url: photo.url.clone(),
                thumbnail: photo.thumbnail_url.clone(),
                caption: photo.caption.clone().unwrap_or_else(|| self.title.clone()),
            })
            .collect();

        ItemSummary {
            headline: self.title.clone(),
            meta: format!("{} · {} photos", date, self.photos.len()),
            details,
            description: None,
            photos,
        }
    }
}
