//! Persisted preference storage.
//!
//! A [`PreferenceStore`] is a string key-value store with the semantics of
//! browser `localStorage`: reads return `None` when nothing was saved and
//! writes are assumed to succeed. The engine stores a single key.
//!
//! - [`MemoryStore`]: shared in-memory map; clones see the same data, which is
//!   how tests model a page reload
//! - [`FileStore`]: JSON object on disk, surviving process restarts

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::ThemeError;

/// Durable key-value storage for the persisted theme mode.
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Option<String>;

    fn save(&mut self, key: &str, value: &str);
}

/// In-memory store. Clones share their contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `key = value`.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.entries.borrow_mut().insert(key.into(), value.into());
        store
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries.borrow_mut().remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.get(key)
    }

    fn save(&mut self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

/// Store backed by a JSON object file.
///
/// The file is read on every load and rewritten on every save. A missing file
/// reads as empty. Save failures are logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a JSON
    /// object of strings.
    pub fn entries(&self) -> Result<BTreeMap<String, String>, ThemeError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(ThemeError::io(&self.path, e)),
        }
    }

    /// Writes `key = value`, keeping other entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing file is unreadable or the write fails.
    pub fn write(&self, key: &str, value: &str) -> Result<(), ThemeError> {
        let mut entries = self.entries()?;
        entries.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&entries)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ThemeError::io(parent, e))?;
        }
        std::fs::write(&self.path, json).map_err(|e| ThemeError::io(&self.path, e))
    }
}

impl PreferenceStore for FileStore {
    fn load(&self, key: &str) -> Option<String> {
        match self.entries() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                log::warn!("ignoring unreadable preference file: {}", e);
                None
            }
        }
    }

    fn save(&mut self, key: &str, value: &str) {
        if let Err(e) = self.write(key, value) {
            log::warn!("failed to persist theme preference: {}", e);
        }
    }
}
