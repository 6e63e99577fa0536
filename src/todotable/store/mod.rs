//! # Cache Layer
//!
//! The record cache is a plain key-value store: the raw JSON payload returned by
//! the record source is kept under a fixed label and handed back verbatim on the
//! next start. There is no expiry and no invalidation; an entry, once written,
//! is trusted until someone deletes it.
//!
//! ## Implementations
//!
//! - [`fs::FileCache`]: Production cache, one `<key>.json` file per entry
//!   inside the cache directory.
//! - [`memory::InMemoryCache`]: In-memory cache for testing. Counts writes so
//!   tests can assert the "fetch once, cache once" contract.
//!
//! ## Storage Format
//!
//! For `FileCache`:
//! ```text
//! ~/.cache/todotable/
//! └── cache.json          # Raw JSON array, exactly as fetched
//! ```

use crate::error::{Result, TableError};
use serde_json::Value;

pub mod fs;
pub mod memory;

/// Abstract interface for the record cache.
pub trait CacheStore {
    /// Returns the cached payload for `key`, or `None` when nothing is stored.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous entry.
    fn set(&mut self, key: &str, value: &Value) -> Result<()>;
}

/// Cache keys double as file names, so they are restricted to a safe alphabet.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(TableError::Cache(format!("Invalid cache key: {:?}", key)))
    }
}
