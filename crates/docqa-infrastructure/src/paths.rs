//! Unified path management for docqa configuration and data files.
//!
//! This ensures consistency across all platforms (Linux, macOS, Windows).

use docqa_core::session::SESSIONS_STORAGE_KEY;
use std::path::PathBuf;

const APP_DIR_NAME: &str = "docqa";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for docqa_core::DocqaError {
    fn from(e: PathError) -> Self {
        docqa_core::DocqaError::config(e.to_string())
    }
}

/// Unified path management for docqa.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/docqa/             # Config directory
/// ├── config.toml              # Client configuration
/// └── logs/                    # Application logs
///     └── docqa.log.YYYY-MM-DD
///
/// ~/.local/share/docqa/        # Data directory
/// └── chat_sessions.json       # Session snapshot
/// ```
pub struct DocqaPaths;

impl DocqaPaths {
    /// Returns the docqa configuration directory (e.g., `~/.config/docqa/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the docqa data directory (e.g., `~/.local/share/docqa/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }

    /// Path of the session snapshot inside `data_dir`.
    pub fn sessions_file_in(data_dir: impl Into<PathBuf>) -> PathBuf {
        data_dir.into().join(format!("{SESSIONS_STORAGE_KEY}.json"))
    }
}
