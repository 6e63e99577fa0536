use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to fetch records: {0}")]
    Fetch(String),

    #[error("Timed out after {0}s waiting for the record source")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Page size {requested} is unavailable for {available} records")]
    LimitUnavailable { requested: usize, available: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Render error: {0}")]
    Render(String),
}

impl TableError {
    /// True for failures of the initial load, the only errors users are told about at startup.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, TableError::Fetch(_) | TableError::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, TableError>;
