/// Runtime configuration
///
/// Values come from environment variables, falling back to per-user
/// defaults:
/// - `PHOTO_LAYOUT_DB`  - catalog database file
///   (default: `<data dir>/photo-layout/catalog.db`)
/// - `PHOTO_LAYOUT_LOG` - tracing filter directive (default: `info`)
use std::path::PathBuf;

use crate::error::{LayoutError, Result};

pub const DB_PATH_VAR: &str = "PHOTO_LAYOUT_DB";
pub const LOG_FILTER_VAR: &str = "PHOTO_LAYOUT_LOG";

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to the SQLite catalog
    pub db_path: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Config {
    /// Resolve configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = match lookup(DB_PATH_VAR).filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => Self::default_db_path()?,
        };

        let log_filter = lookup(LOG_FILTER_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Config { db_path, log_filter })
    }

    /// Get the path where the catalog should be stored
    ///
    /// - Linux: ~/.local/share/photo-layout/catalog.db
    /// - macOS: ~/Library/Application Support/photo-layout/catalog.db
    /// - Windows: %APPDATA%\photo-layout\catalog.db
    fn default_db_path() -> Result<PathBuf> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(LayoutError::NoDataDir)?;

        path.push("photo-layout");
        path.push("catalog.db");
        Ok(path)
    }
}
