//! Data models for the society portal's REST payloads.
//!
//! This module contains the data structures returned by the API:
//!
//! - `Event`: workshops, talks and hackathons
//! - `Resource`: shared study material and links
//! - `Project`: member project showcase
//! - `Placement`: internship and job offers
//! - `Gallery`, `Photo`: event photo albums
//! - `Paginated<T>`: page envelope shared by every list endpoint
//!
//! `Section` names the portal's top-level views, and `Summary` flattens any
//! of the above into display rows.

pub mod event;
pub mod gallery;
pub mod page;
pub mod placement;
pub mod project;
pub mod resource;
pub mod section;

pub use event::Event;
pub use gallery::{Gallery, Photo};
pub use page::{ItemSummary, Paginated, PhotoRef, SectionPage, Summary};
pub use placement::{Placement, PlacementKind};
pub use project::Project;
pub use resource::Resource;
pub use section::Section;
