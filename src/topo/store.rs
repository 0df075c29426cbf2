use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{HeatmapError, Result};
use crate::utils::write_atomically;


/// Key-value storage for raw payloads, keyed by [`super::TopoQuery::cache_key`].
pub trait PayloadStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, payload: &str) -> Result<()>;
}

/// One file per key inside a directory. Entries never expire.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: &Path) -> Self {
        FileStore { dir: dir.to_path_buf() }
    }

    pub fn path_of(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl PayloadStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_of(key);
        match fs::read_to_string(&path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(HeatmapError::io(path, e)),
        }
    }

    fn put(&self, key: &str, payload: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| HeatmapError::io(&self.dir, e))?;
        write_atomically(&self.path_of(key), payload.as_bytes())
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    entries: std::cell::RefCell<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl PayloadStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn put(&self, key: &str, payload: &str) -> Result<()> {
        self.entries.borrow_mut().insert(key.to_string(), payload.to_string());
        Ok(())
    }
}
