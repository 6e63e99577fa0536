//! Remote record sources.
//!
//! The table reads its data from a single `GET` of a fixed URL returning a JSON
//! array. No query parameters are sent: searching, filtering and paging all
//! happen client side. Sources never retry; a failure is reported once and the
//! caller decides what to show.

use crate::error::{Result, TableError};
use serde_json::Value;
use std::cell::Cell;
use std::time::Duration;

pub const DEFAULT_SOURCE_URL: &str = "https://jsonplaceholder.typicode.com/todos";

/// Anything that can produce the raw record payload.
pub trait RecordSource {
    fn fetch(&self) -> Result<Value>;

    /// Human-readable origin, used in log lines and messages.
    fn describe(&self) -> String;
}

/// Blocking HTTP source bounded by a global timeout.
pub struct HttpSource {
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn map_error(&self, err: ureq::Error) -> TableError {
        match err {
            ureq::Error::Timeout(_) => TableError::Timeout(self.timeout.as_secs()),
            ureq::Error::StatusCode(code) => {
                TableError::Fetch(format!("HTTP {} from {}", code, self.url))
            }
            other => TableError::Fetch(format!("{} ({})", other, self.url)),
        }
    }
}

impl RecordSource for HttpSource {
    fn fetch(&self) -> Result<Value> {
        tracing::debug!(url = %self.url, timeout = ?self.timeout, "fetching records");

        let config = ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .build();
        let agent = ureq::Agent::new_with_config(config);

        let mut response = agent
            .get(&self.url)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| self.map_error(e))?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| self.map_error(e))?;

        serde_json::from_str(&body)
            .map_err(|e| TableError::Fetch(format!("invalid JSON from {}: {}", self.url, e)))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// A canned source: hands out a fixed payload (or a fixed failure) and counts calls.
#[derive(Debug)]
pub struct StaticSource {
    payload: std::result::Result<Value, String>,
    calls: Cell<usize>,
}

impl StaticSource {
    pub fn new(payload: Value) -> Self {
        Self {
            payload: Ok(payload),
            calls: Cell::new(0),
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            payload: Err(reason.into()),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl RecordSource for StaticSource {
    fn fetch(&self) -> Result<Value> {
        self.calls.set(self.calls.get() + 1);
        match &self.payload {
            Ok(value) => Ok(value.clone()),
            Err(reason) => Err(TableError::Fetch(reason.clone())),
        }
    }

    fn describe(&self) -> String {
        "static payload".to_string()
    }
}
