//! Durable storage of the confirmed endpoint (the persisted override).
//!
//! The file-backed store keeps a small JSON key/value document and writes it
//! atomically (temp file + rename). The override lives under a single key as
//! a plain URL string.

use crate::core::endpoint::debug_logger::get_debug_logger;
use crate::core::endpoint::types::{Endpoint, EndpointError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Key holding the persisted override
pub const STORE_KEY: &str = "api_base_url";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Rejected endpoint: {0}")]
    InvalidEndpoint(#[from] EndpointError),
    #[error("Home directory not found")]
    HomeDirNotFound,
    #[error("Store file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Narrow read/write interface over the persisted override
///
/// `set` validates before touching storage; an invalid value leaves the
/// previous override in place.
pub trait EndpointStore: Send + Sync {
    fn get(&self) -> Option<Endpoint>;
    fn set(&self, raw: &str) -> Result<Endpoint, StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// JSON file store, default `~/.apiscout/apiscout-store.json`
#[derive(Debug, Clone)]
pub struct FileEndpointStore {
    path: PathBuf,
}

impl FileEndpointStore {
    /// Create a store at `path`, or at the default location when `None`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::HomeDirNotFound` if the default location is
    /// requested and the home directory cannot be determined.
    pub fn new(path: Option<PathBuf>) -> Result<Self, StoreError> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        Ok(Self { path })
    }

    pub fn default_path() -> Result<PathBuf, StoreError> {
        let home = dirs::home_dir().ok_or(StoreError::HomeDirNotFound)?;
        Ok(home.join(".apiscout").join("apiscout-store.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or corrupt documents read as empty
    fn load_entries(&self) -> BTreeMap<String, String> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    fn write_entries_atomic(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("tmp");
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl EndpointStore for FileEndpointStore {
    fn get(&self) -> Option<Endpoint> {
        let raw = self.load_entries().remove(STORE_KEY)?;
        match Endpoint::parse(&raw) {
            Ok(endpoint) => Some(endpoint),
            Err(e) => {
                get_debug_logger().error_sync(
                    "EndpointStore",
                    "invalid_persisted_value",
                    &format!("Ignoring stored value {:?}: {}", raw, e),
                );
                None
            }
        }
    }

    fn set(&self, raw: &str) -> Result<Endpoint, StoreError> {
        let endpoint = Endpoint::parse(raw)?;

        let mut entries = self.load_entries();
        entries.insert(STORE_KEY.to_string(), endpoint.as_str().to_string());
        self.write_entries_atomic(&entries)?;

        get_debug_logger().store_write(STORE_KEY, endpoint.as_str());
        Ok(endpoint)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.load_entries();
        if entries.remove(STORE_KEY).is_some() {
            self.write_entries_atomic(&entries)?;
        }

        get_debug_logger().store_clear(STORE_KEY);
        Ok(())
    }
}

/// In-process store for tests and embedders without a filesystem
#[derive(Debug, Default)]
pub struct MemoryEndpointStore {
    value: Mutex<Option<Endpoint>>,
}

impl MemoryEndpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(endpoint: Endpoint) -> Self {
        Self {
            value: Mutex::new(Some(endpoint)),
        }
    }
}

impl EndpointStore for MemoryEndpointStore {
    fn get(&self) -> Option<Endpoint> {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, raw: &str) -> Result<Endpoint, StoreError> {
        let endpoint = Endpoint::parse(raw)?;
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(endpoint.clone());
        Ok(endpoint)
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
