// src/config.rs
//
// Startup configuration.
// The only thing that varies between installs is where the database lives.

use std::path::{Path, PathBuf};

use crate::db::get_database_path;
use crate::error::AppResult;

/// Environment variable that overrides the database location
pub const DATABASE_PATH_ENV: &str = "WISHLIST_DB_PATH";

/// Max pooled connections (reasonable for a desktop app)
const DEFAULT_POOL_MAX_SIZE: u32 = 8;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub pool_max_size: u32,
}

impl AppConfig {
    /// Config for an explicit database file
    pub fn with_database_path(path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: path.into(),
            pool_max_size: DEFAULT_POOL_MAX_SIZE,
        }
    }

    /// Resolve the config from the environment.
    ///
    /// `WISHLIST_DB_PATH` wins when set and non-empty; otherwise the database
    /// goes to `{APP_DATA}/wishlist/wish.db`.
    pub fn from_env() -> AppResult<Self> {
        Self::resolve(std::env::var_os(DATABASE_PATH_ENV).map(PathBuf::from))
    }

    fn resolve(override_path: Option<PathBuf>) -> AppResult<Self> {
        let path = match override_path.filter(|p| !p.as_os_str().is_empty()) {
            Some(path) => {
                ensure_parent_dir(&path)?;
                path
            }
            None => get_database_path()?,
        };
        Ok(Self::with_database_path(path))
    }
}

fn ensure_parent_dir(path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
