//! # API Facade
//!
//! The API layer is a **thin facade**: it owns the cache and the record source,
//! loads sessions, and dispatches queries to [`crate::commands`]. It is the
//! single entry point for every UI.
//!
//! The API does no business logic and no terminal I/O. It returns structured
//! values (`Result<CmdResult>`, [`TableSession`]) and leaves presentation to
//! the caller.
//!
//! ## Generic Over Cache and Source
//!
//! `TableApi<C: CacheStore, S: RecordSource>`:
//! - Production: `TableApi<FileCache, HttpSource>`
//! - Testing: `TableApi<InMemoryCache, StaticSource>`

use crate::commands::{self, CmdResult, ListQuery};
use crate::error::Result;
use crate::records::RecordStore;
use crate::session::{TableOptions, TableSession};
use crate::source::RecordSource;
use crate::store::CacheStore;

pub use crate::commands::{CmdMessage, MessageLevel};

pub struct TableApi<C: CacheStore, S: RecordSource> {
    cache: C,
    source: S,
    cache_key: String,
    options: TableOptions,
}

impl<C: CacheStore, S: RecordSource> TableApi<C, S> {
    pub fn new(cache: C, source: S, cache_key: impl Into<String>, options: TableOptions) -> Self {
        Self {
            cache,
            source,
            cache_key: cache_key.into(),
            options,
        }
    }

    /// Loads the dataset (cache first) and starts a fresh session on it.
    pub fn load_session(&mut self) -> Result<TableSession> {
        let store = RecordStore::load(&mut self.cache, &self.source, &self.cache_key)?;
        Ok(TableSession::new(store, self.options.clone()))
    }

    pub fn list(&mut self, query: &ListQuery) -> Result<CmdResult> {
        let mut session = self.load_session()?;
        commands::run_query(&mut session, query)
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }
}
