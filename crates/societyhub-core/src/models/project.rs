use serde::{Deserialize, Serialize};

use super::page::{ItemSummary, PhotoRef, Summary};
use crate::utils::format::strip_html;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(alias = "techStack", alias = "technologies", default)]
    pub tech_stack: Vec<String>,
    #[serde(alias = "githubUrl", alias = "repo", default)]
    pub github_url: Option<String>,
    #[serde(alias = "demoUrl", default)]
    pub demo_url: Option<String>,
    #[serde(alias = "members", default)]
    pub team: Vec<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(alias = "imageUrl", alias = "image", default)]
    pub image_url: Option<String>,
}

impl Project {
    pub fn tech_display(&self) -> String {
        if self.tech_stack.is_empty() {
            "-".to_string()
        } else {
            self.tech_stack.join(", ")
        }
    }
}

impl Summary for Project {
    fn summarize(&self) -> ItemSummary {
        let mut details = vec![("Stack", self.tech_display())];
        if !self.team.is_empty() {
            details.push(("Team", self.team.join(", ")));
        }
        if let Some(year) = self.year {
            details.push(("Year", year.to_string()));
        }
        if let Some(ref repo) = self.github_url {
            details.push(("Repo", repo.clone()));
        }
        if let Some(ref demo) = self.demo_url {
            details.push(("Demo", demo.clone()));
        }

        let photos = self
            .image_url
            .iter()
            .map(|url| PhotoRef {
                url: url.clone(),
                thumbnail: None,
                caption: self.title.clone(),
            })
            .collect();

        ItemSummary {
            headline: self.title.clone(),
            meta: self.tech_display(),
            details,
            description: self.description.as_deref().map(strip_html),
            photos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_aliases_and_summary() {
        let project: Project = serde_json::from_value(json!({
            "title": "Campus Map",
            "techStack": ["Rust", "Leptos"],
            "members": ["Asha", "Ravi"],
            "image": "https://cdn.example.org/map.png"
        }))
        .unwrap();

        let summary = project.summarize();
        assert_eq!(summary.meta, "Rust, Leptos");
        assert!(summary.details.contains(&("Team", "Asha, Ravi".to_string())));
        assert_eq!(summary.photos.len(), 1);
    }

    #[test]
    fn test_empty_stack_display() {
        let project: Project = serde_json::from_value(json!({"title": "Untitled"})).unwrap();
        assert_eq!(project.tech_display(), "-");
    }
}
