//! REST API client module for the society portal backend.
//!
//! This module provides the `ApiClient` used by views and the background
//! prefetcher to fetch paginated section listings and gallery images.
//! Failures surface as `ApiError` wrapped in `anyhow::Error`; callers that
//! cache results simply skip the write when a fetch fails.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
