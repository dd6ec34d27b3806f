//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the API base URL, page cache tuning, and the last open section.
//!
//! Configuration is stored at `~/.config/societyhub/config.json`.
//! `SOCIETYHUB_API_URL` in the environment (or a `.env` file) overrides the
//! stored base URL.

use std::num::NonZeroU32;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::cache::{EvictionTrigger, PageCacheConfig};

/// Application name used for config/log directory paths
const APP_NAME: &str = "societyhub";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding `api_base_url`
pub const API_URL_ENV: &str = "SOCIETYHUB_API_URL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub page_cache_capacity: usize,
    pub touch_on_read: bool,
    /// Run the eviction sweep after every Nth page registration; 0 = manual only.
    pub cleanup_every: u32,
    pub last_tab: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let cache = PageCacheConfig::default();
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_cache_capacity: cache.capacity,
            touch_on_read: cache.touch_on_read,
            cleanup_every: 1,
            last_tab: None,
        }
    }
}

impl Config {
    /// Load from disk, falling back to defaults, then apply the environment.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_base_url = url.trim().to_string();
            }
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for log files. Page data itself is never written to disk.
    pub fn log_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn page_cache_config(&self) -> PageCacheConfig {
        PageCacheConfig {
            capacity: self.page_cache_capacity,
            touch_on_read: self.touch_on_read,
            eviction: match NonZeroU32::new(self.cleanup_every) {
                Some(n) => EvictionTrigger::EveryNthRegistration(n),
                None => EvictionTrigger::Manual,
            },
        }
    }
}
