use serde::{Deserialize, Serialize};

use super::page::{ItemSummary, Summary};
use crate::utils::format::{format_date, strip_html};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(alias = "resourceType", alias = "type", default)]
    pub resource_type: Option<String>,
    #[serde(alias = "url", default)]
    pub link: Option<String>,
    #[serde(alias = "uploadedBy", default)]
    pub uploaded_by: Option<String>,
    #[serde(alias = "createdAt", default)]
    pub created_at: Option<String>,
}

impl Resource {
    pub fn kind_display(&self) -> &str {
        match self.resource_type.as_deref() {
            Some("pdf") | Some("PDF") => "PDF",
            Some("video") | Some("Video") => "Video",
            Some("link") | Some("Link") => "Link",
            Some(other) if !other.is_empty() => other,
            _ => "Other",
        }
    }
}

impl Summary for Resource {
    fn summarize(&self) -> ItemSummary {
        let mut details = vec![("Kind", self.kind_display().to_string())];
        if let Some(ref category) = self.category {
            details.push(("Category", category.clone()));
        }
        if let Some(ref author) = self.uploaded_by {
            details.push(("Shared by", author.clone()));
        }
        if let Some(ref created) = self.created_at {
            details.push(("Added", format_date(created)));
        }
        if let Some(ref link) = self.link {
            details.push(("Link", link.clone()));
        }

        ItemSummary {
            headline: self.title.clone(),
            meta: format!(
                "{} · {}",
                self.kind_display(),
                self.category.as_deref().unwrap_or("General")
            ),
            details,
            description: self.description.as_deref().map(strip_html),
            photos: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_kind_display() {
        let resource: Resource = serde_json::from_value(json!({
            "title": "DSA Notes",
            "type": "pdf",
            "category": "Algorithms"
        }))
        .unwrap();

        assert_eq!(resource.kind_display(), "PDF");
        assert_eq!(resource.summarize().meta, "PDF · Algorithms");
    }

    #[test]
    fn test_resource_defaults() {
        let resource: Resource = serde_json::from_value(json!({"title": "Misc"})).unwrap();
        assert_eq!(resource.kind_display(), "Other");
        assert_eq!(resource.summarize().meta, "Other · General");
    }
}
