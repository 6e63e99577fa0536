use super::{validate_key, CacheStore};
use crate::error::{Result, TableError};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(TableError::Io)?;
        }
        Ok(())
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        validate_key(key)?;
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(TableError::Io)?;
        let value = serde_json::from_str(&content).map_err(TableError::Serialization)?;
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: &Value) -> Result<()> {
        validate_key(key)?;
        self.ensure_dir()?;

        // Write to a sibling temp file first so a crash never leaves half an entry.
        let path = self.entry_path(key);
        let tmp = self.root.join(format!(".{}.json.tmp", key));
        let content = serde_json::to_string(value).map_err(TableError::Serialization)?;
        fs::write(&tmp, content).map_err(TableError::Io)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(TableError::Io(e));
        }
        Ok(())
    }
}
