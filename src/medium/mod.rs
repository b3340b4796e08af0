//! Durable key-value media.
//!
//! A [`StorageMedium`] is the persistence surface behind [`LocalStore`]:
//! string payloads stored under flat string keys. The store namespaces its
//! keys, so several stores can share one medium without colliding.
//!
//! Two implementations ship with the crate:
//! - [`MemoryMedium`] - in-process map, for tests and ephemeral namespaces
//! - [`FileMedium`] - one file per key under a root directory
//!
//! [`LocalStore`]: crate::store::LocalStore

mod file;
mod medium;

pub use file::FileMedium;
pub use medium::{MediumError, MemoryMedium, StorageMedium};
