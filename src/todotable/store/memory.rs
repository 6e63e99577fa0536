use super::{validate_key, CacheStore};
use crate::error::Result;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: HashMap<String, Value>,
    writes: usize,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls served so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl CacheStore for InMemoryCache {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        validate_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &Value) -> Result<()> {
        validate_key(key)?;
        self.entries.insert(key.to_string(), value.clone());
        self.writes += 1;
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::Record;

    /// `count` todos with ids `1..=count`; every third one is completed.
    pub fn sample_records(count: usize) -> Vec<Record> {
        (1..=count)
            .map(|i| {
                let title = format!("todo number {}", i);
                Record::todo(i as i64, &title, i % 3 == 0, (i as i64 - 1) / 10 + 1)
            })
            .collect()
    }

    pub fn records_payload(records: &[Record]) -> Value {
        serde_json::to_value(records).unwrap()
    }

    pub struct CacheFixture {
        pub cache: InMemoryCache,
    }

    impl Default for CacheFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl CacheFixture {
        pub fn new() -> Self {
            Self {
                cache: InMemoryCache::new(),
            }
        }

        pub fn with_records(mut self, key: &str, records: &[Record]) -> Self {
            let payload = records_payload(records);
            self.cache.entries.insert(key.to_string(), payload);
            self
        }

        pub fn with_raw(mut self, key: &str, payload: Value) -> Self {
            self.cache.entries.insert(key.to_string(), payload);
            self
        }
    }
}
