use std::sync::{Arc, RwLock};

use crate::action::StoreAction;
use crate::observe::Subscription;

use super::KeyedStore;

/// A live view of one identifier's value.
///
/// Created by [`KeyedStore::bind`]. On creation the binding snapshots the
/// store's current value for the identifier and subscribes for pushed
/// updates, so [`value`](Self::value) always reflects the latest write.
/// Rebinding to a different identifier re-fetches and re-subscribes;
/// dropping the binding unsubscribes.
///
/// # Examples
///
/// ```
/// use cubby::{KeyedStore, MemoryStore};
///
/// let store = MemoryStore::new(0u32);
/// let mut binding = store.bind("count");
/// assert_eq!(binding.value(), 0);
///
/// store.set("count", 3);
/// assert_eq!(binding.value(), 3);
///
/// binding.rebind("other");
/// assert_eq!(binding.value(), 0);
/// ```
pub struct Binding<S, T>
where
    S: KeyedStore<T>,
    T: Clone,
{
    store: S,
    id: String,
    current: Arc<RwLock<T>>,
    subscription: Option<Subscription>,
}

impl<S, T> Binding<S, T>
where
    S: KeyedStore<T>,
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(store: S, id: &str) -> Self {
        let current = Arc::new(RwLock::new(store.get(id)));
        let subscription = Some(Self::track(&store, id, &current));
        Self {
            store,
            id: id.to_string(),
            current,
            subscription,
        }
    }

    fn track(store: &S, id: &str, current: &Arc<RwLock<T>>) -> Subscription {
        let cell = Arc::clone(current);
        store.subscribe(id, move |value| {
            *cell.write().unwrap() = value.clone();
        })
    }

    /// The identifier this binding follows.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The latest observed value.
    pub fn value(&self) -> T {
        self.current.read().unwrap().clone()
    }

    /// Write a literal value or a ready-made action to the bound
    /// identifier. The binding observes its own write.
    pub fn set(&self, action: impl Into<StoreAction<T>>) -> T {
        self.store.set(&self.id, action)
    }

    /// Derive the next value from the currently stored one.
    pub fn update<F>(&self, f: F) -> T
    where
        F: FnOnce(T) -> T + Send + 'static,
    {
        self.store.update(&self.id, f)
    }

    /// Follow `id` instead of the current identifier.
    ///
    /// The previous subscription is dropped before the new identifier is
    /// subscribed and its current value fetched; a binding never retains
    /// the value of an identifier it no longer follows. Rebinding to the
    /// already-bound identifier only re-fetches.
    pub fn rebind(&mut self, id: &str) {
        if self.id != id {
            self.unsubscribe();
            self.id = id.to_string();
            self.subscription = Some(Self::track(&self.store, id, &self.current));
        }
        *self.current.write().unwrap() = self.store.get(id);
    }

    fn unsubscribe(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.store.unsubscribe(&subscription);
        }
    }
}

impl<S, T> Drop for Binding<S, T>
where
    S: KeyedStore<T>,
    T: Clone,
{
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.store.unsubscribe(&subscription);
        }
    }
}
