//! # Configuration
//!
//! Configuration is loaded with [`confique`] from two layers, highest priority
//! first:
//!
//! 1. **Environment variables**: `TODOTABLE_SOURCE_URL`, `TODOTABLE_PAGE_SIZE`, etc.
//! 2. **Config file**: `todotable.toml` in the OS config directory (via the
//!    `directories` crate), or the file passed with `--config`.
//!
//! Anything left unset falls back to the compiled defaults below. A missing
//! config file is not an error.
//!
//! ## Available Settings
//!
//! | Key | Env | Default |
//! |-----|-----|---------|
//! | `source_url` | `TODOTABLE_SOURCE_URL` | `https://jsonplaceholder.typicode.com/todos` |
//! | `cache_key` | `TODOTABLE_CACHE_KEY` | `cache` |
//! | `cache_dir` | `TODOTABLE_CACHE_DIR` | OS cache directory |
//! | `timeout_secs` | `TODOTABLE_TIMEOUT_SECS` | `10` |
//! | `page_size` | `TODOTABLE_PAGE_SIZE` | `10` |
//! | `page_size_options` | | `[10, 20, 50, 100]` |
//! | `group_size` | | `5` (1 to 25) |

use crate::error::{Result, TableError};
use crate::paginate::{DEFAULT_GROUP_SIZE, DEFAULT_LIMIT, DEFAULT_LIMIT_OPTIONS};
use crate::session::TableOptions;
use crate::source::DEFAULT_SOURCE_URL;
use confique::Config;
use directories::ProjectDirs;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "todotable.toml";

/// Upper bound for `group_size`; wider windows stop being readable.
pub const MAX_GROUP_SIZE: usize = 25;

/// Configuration for todotable, stored in `todotable.toml`.
#[derive(Config, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// URL returning the JSON array of records.
    #[config(env = "TODOTABLE_SOURCE_URL", default = "https://jsonplaceholder.typicode.com/todos")]
    pub source_url: String,

    /// Cache entry name; stored as `<cache_dir>/<cache_key>.json`.
    #[config(env = "TODOTABLE_CACHE_KEY", default = "cache")]
    pub cache_key: String,

    /// Directory for the record cache. Defaults to the OS cache directory.
    #[config(env = "TODOTABLE_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Seconds to wait for the record source before giving up.
    #[config(env = "TODOTABLE_TIMEOUT_SECS", default = 10)]
    pub timeout_secs: u64,

    /// Rows per page on startup and after a reset.
    #[config(env = "TODOTABLE_PAGE_SIZE", default = 10)]
    pub page_size: usize,

    /// Page sizes offered by the limit selector ("ALL" is always added).
    #[config(default = [10, 20, 50, 100])]
    pub page_size_options: Vec<usize>,

    /// Number of page links in the pagination window.
    #[config(default = 5)]
    pub group_size: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            cache_key: "cache".to_string(),
            cache_dir: None,
            timeout_secs: 10,
            page_size: DEFAULT_LIMIT,
            page_size_options: DEFAULT_LIMIT_OPTIONS.to_vec(),
            group_size: DEFAULT_GROUP_SIZE,
        }
    }
}

impl TableConfig {
    /// Loads env over `path` over defaults, then validates.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = path {
            builder = builder.file(path);
        }
        Self::finish(builder.load())
    }

    /// Like [`TableConfig::load`] but ignores the environment.
    pub fn load_file(path: &Path) -> Result<Self> {
        Self::finish(Self::builder().file(path).load())
    }

    fn finish(loaded: std::result::Result<Self, confique::Error>) -> Result<Self> {
        let config = loaded.map_err(|e| TableError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(TableError::Config("timeout_secs must be at least 1".into()));
        }
        if !(1..=MAX_GROUP_SIZE).contains(&self.group_size) {
            return Err(TableError::Config(format!(
                "group_size must be between 1 and {}",
                MAX_GROUP_SIZE
            )));
        }
        if self.page_size_options.contains(&0) {
            return Err(TableError::Config("page_size_options cannot contain 0".into()));
        }
        if !self.page_size_options.contains(&self.page_size) {
            return Err(TableError::Config(format!(
                "page_size {} is not one of page_size_options {:?}",
                self.page_size, self.page_size_options
            )));
        }
        if crate::store::validate_key(&self.cache_key).is_err() {
            return Err(TableError::Config(format!(
                "cache_key '{}' is not a valid file name",
                self.cache_key
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The configured cache directory, else the OS default.
    pub fn resolved_cache_dir(&self) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_cache_dir()
                .ok_or_else(|| TableError::Config("no cache directory available".into())),
        }
    }

    pub fn table_options(&self) -> TableOptions {
        TableOptions {
            default_limit: self.page_size,
            limit_options: self.page_size_options.clone(),
            group_size: self.group_size,
        }
    }

    /// Key/value pairs in declaration order, for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let cache_dir = match self.resolved_cache_dir() {
            Ok(dir) => dir.display().to_string(),
            Err(_) => "(none)".to_string(),
        };
        vec![
            ("source_url", self.source_url.clone()),
            ("cache_key", self.cache_key.clone()),
            ("cache_dir", cache_dir),
            ("timeout_secs", self.timeout_secs.to_string()),
            ("page_size", self.page_size.to_string()),
            ("page_size_options", format!("{:?}", self.page_size_options)),
            ("group_size", self.group_size.to_string()),
        ]
    }

    /// A commented sample `todotable.toml`.
    pub fn template() -> String {
        confique::toml::template::<Self>(confique::toml::FormatOptions::default())
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "todotable")
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub fn default_cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}
