//! # Record Store
//!
//! Owns the original dataset, exactly as loaded, and hands out independent
//! working copies. Nothing downstream ever gets a mutable handle on the
//! original: every transform works on its own copy.
//!
//! ## Loading
//!
//! [`load_records`] is cache-first:
//! 1. If the cache holds a decodable entry under the key, use it. No fetch.
//! 2. Otherwise fetch from the source, write the raw payload to the cache,
//!    and use it.
//!
//! A cache entry that cannot be decoded counts as a miss. A source failure is
//! returned as an error value; there is no retry.

use crate::error::{Result, TableError};
use crate::model::{self, Record};
use crate::source::RecordSource;
use crate::store::CacheStore;
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    original: Vec<Record>,
}

impl RecordStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self { original: records }
    }

    pub fn load<C: CacheStore, S: RecordSource>(
        cache: &mut C,
        source: &S,
        key: &str,
    ) -> Result<Self> {
        load_records(cache, source, key).map(Self::new)
    }

    pub fn original(&self) -> &[Record] {
        &self.original
    }

    /// A fresh copy of the original dataset.
    pub fn working_copy(&self) -> Vec<Record> {
        deep_copy(&self.original)
    }

    pub fn columns(&self) -> Vec<String> {
        model::columns(&self.original)
    }

    pub fn len(&self) -> usize {
        self.original.len()
    }

    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }
}

/// Fully independent copy of `records`.
pub fn deep_copy(records: &[Record]) -> Vec<Record> {
    records.to_vec()
}

pub fn load_records<C: CacheStore, S: RecordSource>(
    cache: &mut C,
    source: &S,
    key: &str,
) -> Result<Vec<Record>> {
    match cache.get(key) {
        Ok(Some(payload)) => match parse_records(&payload) {
            Ok(records) => {
                tracing::info!(key, count = records.len(), "loaded records from cache");
                return Ok(records);
            }
            Err(e) => tracing::warn!(key, error = %e, "ignoring unusable cache entry"),
        },
        Ok(None) => tracing::debug!(key, "cache miss"),
        Err(TableError::Serialization(e)) => {
            tracing::warn!(key, error = %e, "ignoring corrupt cache entry")
        }
        Err(e) => return Err(e),
    }

    let payload = source.fetch()?;
    let records = parse_records(&payload)?;
    tracing::info!(
        source = %source.describe(),
        count = records.len(),
        "fetched records"
    );

    if let Err(e) = cache.set(key, &payload) {
        tracing::warn!(key, error = %e, "failed to write record cache");
    }

    Ok(records)
}

/// Decodes a raw payload: it must be a JSON array of objects.
pub fn parse_records(payload: &Value) -> Result<Vec<Record>> {
    let items = payload
        .as_array()
        .ok_or_else(|| TableError::Fetch("expected a JSON array of records".to_string()))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(fields) => Ok(Record::new(fields.clone())),
            _ => Err(TableError::Fetch(format!("record {} is not an object", i))),
        })
        .collect()
}
