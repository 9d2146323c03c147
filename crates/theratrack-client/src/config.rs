//! # Client Configuration
//!
//! Defaults match a local development backend. [`ClientConfig::from_env`]
//! overlays:
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `THERATRACK_API_URL` | `base_url` | `http://localhost:8081/api` |
//! | `THERATRACK_SESSION_FILE` | `session_file` | none (token kept in memory) |
//! | `THERATRACK_PAGE_SIZE` | `page_size` | `10` |
//! | `THERATRACK_CHANNEL_CAPACITY` | `channel_capacity` | `32` |

use crate::error::ConfigError;
use crate::resource::DEFAULT_PAGE_SIZE;
use crate::session::{JsonFileStorage, SessionStore};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8081/api";
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// Where the session token survives restarts. `None` keeps it in memory.
    pub session_file: Option<PathBuf>,
    pub page_size: u32,
    /// Request buffer of each controller.
    pub channel_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_file: None,
            page_size: DEFAULT_PAGE_SIZE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup("THERATRACK_API_URL") {
            config.base_url = url;
        }
        if let Some(path) = lookup("THERATRACK_SESSION_FILE").filter(|p| !p.is_empty()) {
            config.session_file = Some(PathBuf::from(path));
        }
        if let Some(size) = lookup("THERATRACK_PAGE_SIZE") {
            config.page_size = parse_positive("THERATRACK_PAGE_SIZE", &size)?;
        }
        if let Some(capacity) = lookup("THERATRACK_CHANNEL_CAPACITY") {
            config.channel_capacity = parse_positive("THERATRACK_CHANNEL_CAPACITY", &capacity)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.base_url)
            .map_err(|e| ConfigError::BaseUrl(self.base_url.clone(), e.to_string()))?;
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "page_size",
                value: "0".to_string(),
            });
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "channel_capacity",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Opens the session store this config describes.
    pub fn session_store(&self) -> Result<SessionStore, crate::error::StorageError> {
        match &self.session_file {
            Some(path) => Ok(SessionStore::new(Arc::new(JsonFileStorage::open(path)?))),
            None => Ok(SessionStore::in_memory()),
        }
    }
}

fn parse_positive<N>(key: &'static str, value: &str) -> Result<N, ConfigError>
where
    N: std::str::FromStr + PartialEq + Default,
{
    match value.trim().parse::<N>() {
        Ok(n) if n != N::default() => Ok(n),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}
