use crate::settings::RetrievalSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the retrieval service, without a trailing slash.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Overrides the platform data directory for session snapshots.
    pub data_dir: Option<PathBuf>,
    /// Retrieval settings a fresh client starts with.
    pub defaults: RetrievalSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            data_dir: None,
            defaults: RetrievalSettings::default(),
        }
    }
}

impl ClientConfig {
    /// Replaces the base URL, dropping any trailing slashes.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Returns the config with out-of-range retrieval defaults clamped.
    pub fn normalized(mut self) -> Self {
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();
        self.defaults = self.defaults.clamped();
        self
    }
}
