//! Client configuration loading.
//!
//! Reads `~/.config/docqa/config.toml`; a missing file yields defaults.
//! `DOCQA_API_URL` overrides the base URL from the file.

use crate::paths::DocqaPaths;
use docqa_core::config::ClientConfig;
use docqa_core::error::Result;
use std::fs;
use std::path::PathBuf;

/// Environment variable overriding `api_base_url`.
pub const API_URL_ENV: &str = "DOCQA_API_URL";

pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses the platform configuration file.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(DocqaPaths::config_file()?))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the file, then applies the environment override.
    pub fn load(&self) -> Result<ClientConfig> {
        let config = self.load_file()?;
        Ok(apply_env_override(config, std::env::var(API_URL_ENV).ok()))
    }

    fn load_file(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            tracing::debug!(
                "[ConfigService] no config at {}, using defaults",
                self.path.display()
            );
            return Ok(ClientConfig::default());
        }
        let content = fs::read_to_string(&self.path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config.normalized())
    }
}

fn apply_env_override(config: ClientConfig, api_url: Option<String>) -> ClientConfig {
    match api_url.filter(|url| !url.trim().is_empty()) {
        Some(url) => config.with_api_base_url(url.trim()),
        None => config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));
        assert_eq!(service.load_file().unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_reads_and_normalizes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
api_base_url = "http://qa.internal:9000/"
request_timeout_secs = 30

[defaults]
max_branches = 0
"#,
        )
        .unwrap();

        let config = ConfigService::with_path(&path).load_file().unwrap();
        assert_eq!(config.api_base_url, "http://qa.internal:9000");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.defaults.max_branches, 1);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "api_base_url = [").unwrap();

        let err = ConfigService::with_path(&path).load_file().unwrap_err();
        assert!(err.is_serialization());
    }

    #[test]
    fn test_env_override_replaces_base_url() {
        let config = apply_env_override(
            ClientConfig::default(),
            Some("https://qa.example.com/".to_string()),
        );
        assert_eq!(config.api_base_url, "https://qa.example.com");

        let untouched = apply_env_override(ClientConfig::default(), Some("  ".to_string()));
        assert_eq!(untouched.api_base_url, "http://localhost:8000");
    }
}
