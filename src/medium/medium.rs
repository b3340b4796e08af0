use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

/// Failure at the storage-medium boundary.
///
/// Stores collapse these to the default-value fallback; the typed error
/// exists so media can report what actually went wrong and so callers
/// constructing a medium can surface setup problems.
#[derive(Debug, Error)]
pub enum MediumError {
    /// The underlying I/O operation failed.
    #[error("storage i/o failed for key `{key}`: {source}")]
    Io {
        /// Physical key the operation targeted.
        key: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
    /// No per-user data directory could be resolved on this platform.
    #[error("no local data directory available")]
    NoDataDir,
}

/// A durable string-keyed, string-valued scratch space.
///
/// The contract mirrors web local storage: `get_item` returns the payload
/// last written for a key or `None`, `set_item` overwrites, `remove_item`
/// is a no-op for absent keys. Implementations must be safe to share
/// across threads; cubby stores call them behind their own write lock.
pub trait StorageMedium: Send + Sync + 'static {
    /// Read the payload stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>, MediumError>;

    /// Store `value` under `key`, replacing any previous payload.
    fn set_item(&self, key: &str, value: &str) -> Result<(), MediumError>;

    /// Delete the payload under `key`; absent keys are not an error.
    fn remove_item(&self, key: &str) -> Result<(), MediumError>;
}

/// An in-process medium with no durability.
///
/// Useful for tests and for running the durable-store code path without
/// touching the filesystem. Cloning shares the underlying map, which is
/// how a test simulates a restart: build a second store over a clone of
/// the same medium.
#[derive(Clone, Default)]
pub struct MemoryMedium {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryMedium {
    /// Create an empty medium.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored, across all namespaces.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// True if no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

impl StorageMedium for MemoryMedium {
    fn get_item(&self, key: &str) -> Result<Option<String>, MediumError> {
        Ok(self.entries.read().unwrap().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), MediumError> {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), MediumError> {
        self.entries.write().unwrap().remove(key);
        Ok(())
    }
}
