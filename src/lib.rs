//! # Cubby
//!
//! Keyed observable stores for Rust.
//!
//! A store multiplexes many independent values behind string identifiers
//! and notifies subscribers of mutations with per-identifier granularity:
//!
//! - `MemoryStore<T>` - In-process store, values live for the store's lifetime
//! - `LocalStore<T, M>` - Durable store, values survive restarts through a
//!   pluggable [`StorageMedium`]
//!
//! ## Bindings
//!
//! Consumers observe a single identifier through a [`Binding`], which
//! snapshots the current value, receives pushed updates, and unsubscribes
//! when dropped. Write-only consumers take a [`Setter`] instead, which
//! holds no subscription.
//!
//! ```
//! use cubby::{KeyedStore, MemoryStore};
//!
//! let store = MemoryStore::new(0u32);
//! store.set("clicks", 1);
//! store.update("clicks", |n| n + 1);
//! assert_eq!(store.get("clicks"), 2);
//! assert_eq!(store.get("untouched"), 0);
//! ```

pub mod action;
pub mod medium;
pub mod observe;
pub mod store;

// Re-export main types for convenience
pub use action::StoreAction;
pub use medium::{FileMedium, MediumError, MemoryMedium, StorageMedium};
pub use observe::{Notifier, Subscription};
pub use store::{Binding, KeyedStore, LocalStore, MemoryStore, Setter};
