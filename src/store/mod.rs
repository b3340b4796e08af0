//! Keyed observable stores.
//!
//! A store multiplexes many independent values behind string identifiers
//! and pushes every mutation to the subscribers of that identifier only.
//! Both backends share the [`KeyedStore`] contract:
//!
//! - [`MemoryStore`] - in-process, values last for the store's lifetime
//! - [`LocalStore`] - persisted through a [`StorageMedium`], values
//!   survive restarts
//!
//! [`StorageMedium`]: crate::medium::StorageMedium

mod binding;
mod local;
mod memory;
mod store;

pub use binding::Binding;
pub use local::LocalStore;
pub use memory::MemoryStore;
pub use store::{KeyedStore, Setter};
