use anyhow::Result;
use serde_json::Value;

use super::page::SectionPage;
use super::{Event, Gallery, Placement, Project, Resource};
use crate::cache::ComponentRef;

/// Top-level views of the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Events,
    Resources,
    Projects,
    Placements,
    Gallery,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Events,
        Section::Resources,
        Section::Projects,
        Section::Placements,
        Section::Gallery,
    ];

    /// Page cache key. Unique per view.
    pub fn page_key(&self) -> &'static str {
        match self {
            Section::Events => "events",
            Section::Resources => "resources",
            Section::Projects => "projects",
            Section::Placements => "placements",
            Section::Gallery => "gallery",
        }
    }

    /// Keyed data store namespace.
    pub fn namespace(&self) -> &'static str {
        self.page_key()
    }

    /// REST collection path under the API base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Section::Events => "events",
            Section::Resources => "resources",
            Section::Projects => "projects",
            Section::Placements => "placements",
            Section::Gallery => "galleries",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Events => "Events",
            Section::Resources => "Resources",
            Section::Projects => "Projects",
            Section::Placements => "Placements",
            Section::Gallery => "Gallery",
        }
    }

    /// Stable component token for the view rendering this section.
    pub fn component(&self) -> ComponentRef {
        ComponentRef::new(*self as u64 + 1)
    }

    pub fn from_page_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.page_key() == key)
    }

    /// Get the next section (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Section::Events => Section::Resources,
            Section::Resources => Section::Projects,
            Section::Projects => Section::Placements,
            Section::Placements => Section::Gallery,
            Section::Gallery => Section::Events,
        }
    }

    /// Get the previous section (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Section::Events => Section::Gallery,
            Section::Resources => Section::Events,
            Section::Projects => Section::Resources,
            Section::Placements => Section::Projects,
            Section::Gallery => Section::Placements,
        }
    }

    /// Decode a cached payload for this section into display rows.
    pub fn decode(&self, value: &Value) -> Result<SectionPage> {
        match self {
            Section::Events => SectionPage::from_value::<Event>(value),
            Section::Resources => SectionPage::from_value::<Resource>(value),
            Section::Projects => SectionPage::from_value::<Project>(value),
            Section::Placements => SectionPage::from_value::<Placement>(value),
            Section::Gallery => SectionPage::from_value::<Gallery>(value),
        }
    }
}
