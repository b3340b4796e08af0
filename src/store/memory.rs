use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::action::StoreAction;
use crate::observe::{Notifier, Subscription};

use super::KeyedStore;

/// An in-process keyed store with no persistence.
///
/// Values live for the lifetime of the store (typically the process).
/// Reads and writes are synchronous; a read-modify-write through
/// [`update`](KeyedStore::update) holds the entry table's write lock
/// while the derivation runs, so same-identifier writers never interleave.
///
/// # Examples
///
/// ```
/// use cubby::{KeyedStore, MemoryStore};
///
/// let store = MemoryStore::new(0u32);
/// store.set("count", 2);
/// store.update("count", |n| n + 1);
/// assert_eq!(store.get("count"), 3);
///
/// store.remove("count");
/// assert_eq!(store.get("count"), 0);
/// ```
pub struct MemoryStore<T> {
    entries: Arc<RwLock<HashMap<String, T>>>,
    default: Arc<T>,
    notifier: Notifier<T>,
}

impl<T: Clone> MemoryStore<T> {
    /// Create a store whose unwritten identifiers read as `default`.
    pub fn new(default: T) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            default: Arc::new(default),
            notifier: Notifier::new(),
        }
    }

    /// The default value served for absent identifiers.
    pub fn default_value(&self) -> T {
        (*self.default).clone()
    }
}

impl<T: Clone> KeyedStore<T> for MemoryStore<T> {
    fn get(&self, id: &str) -> T {
        self.entries
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .unwrap_or_else(|| (*self.default).clone())
    }

    fn apply(&self, id: &str, action: StoreAction<T>) -> T {
        let next = {
            let mut entries = self.entries.write().unwrap();
            let current = entries
                .get(id)
                .cloned()
                .unwrap_or_else(|| (*self.default).clone());
            let next = action.resolve(current);
            entries.insert(id.to_string(), next.clone());
            next
        };
        // Lock released before fan-out so listeners may read or write back.
        self.notifier.notify(id, &next);
        next
    }

    fn remove(&self, id: &str) {
        self.entries.write().unwrap().remove(id);
    }

    fn subscribe<F>(&self, id: &str, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.notifier.subscribe(id, listener)
    }

    fn unsubscribe(&self, subscription: &Subscription) {
        self.notifier.unsubscribe(subscription);
    }
}

impl<T> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            default: Arc::clone(&self.default),
            notifier: self.notifier.clone(),
        }
    }
}
