use std::marker::PhantomData;

use crate::action::StoreAction;
use crate::observe::Subscription;

use super::Binding;

/// The contract shared by every store backend.
///
/// A keyed store maps opaque string identifiers to values of one type `T`,
/// with a default supplied at construction. Identifiers that were never
/// written (or were removed) read as the default. Every successful write
/// is pushed to the subscribers of that identifier, and only to them.
///
/// Stores are cheap handles over shared state; cloning one yields another
/// handle onto the same entries and subscribers.
pub trait KeyedStore<T: Clone>: Clone {
    /// The current value for `id`, or the default when no entry exists.
    fn get(&self, id: &str) -> T;

    /// Resolve `action` against the current value for `id`, store the
    /// result, notify subscribers of `id`, and return the result.
    fn apply(&self, id: &str, action: StoreAction<T>) -> T;

    /// Delete the entry for `id`; subsequent reads return the default.
    ///
    /// Removal does not notify subscribers. A consumer that must observe
    /// a reset should write the default with [`set`](Self::set) instead.
    fn remove(&self, id: &str);

    /// Register `listener` for every future write to `id`.
    fn subscribe<F>(&self, id: &str, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static;

    /// Drop one listener registration. Idempotent.
    fn unsubscribe(&self, subscription: &Subscription);

    /// Write a literal value or a ready-made action for `id`.
    fn set(&self, id: &str, action: impl Into<StoreAction<T>>) -> T {
        self.apply(id, action.into())
    }

    /// Derive the next value for `id` from the currently stored one.
    fn update<F>(&self, id: &str, f: F) -> T
    where
        F: FnOnce(T) -> T + Send + 'static,
    {
        self.apply(id, StoreAction::update(f))
    }

    /// A write-only handle bound to `id`. Holds no subscription.
    fn setter(&self, id: &str) -> Setter<Self, T>
    where
        Self: Sized,
    {
        Setter::new(self.clone(), id)
    }

    /// Observe `id`: snapshot its current value and follow every
    /// subsequent write until the binding is dropped or rebound.
    fn bind(&self, id: &str) -> Binding<Self, T>
    where
        Self: Sized,
        T: Send + Sync + 'static,
    {
        Binding::new(self.clone(), id)
    }
}

/// A write-only handle bound to one identifier of one store.
///
/// Setters are for consumers that mutate a value without observing it;
/// they hold no subscription, so handing one out never causes the holder
/// to be re-synchronized on writes.
pub struct Setter<S, T> {
    store: S,
    id: String,
    _value: PhantomData<fn() -> T>,
}

impl<S, T> Setter<S, T>
where
    S: KeyedStore<T>,
    T: Clone,
{
    pub(crate) fn new(store: S, id: &str) -> Self {
        Self {
            store,
            id: id.to_string(),
            _value: PhantomData,
        }
    }

    /// The identifier this setter writes to.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Write a literal value or a ready-made action.
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
}

impl<S: Clone, T> Clone for Setter<S, T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            id: self.id.clone(),
            _value: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn setter_writes_its_own_id() {
        let store = MemoryStore::new(0);
        let setter = store.setter("a");

        assert_eq!(setter.id(), "a");
        setter.set(5);
        setter.update(|n| n * 2);

        assert_eq!(store.get("a"), 10);
        assert_eq!(store.get("b"), 0);
    }

    #[test]
    fn cloned_setter_shares_the_store() {
        let store = MemoryStore::new(0);
        let setter = store.setter("a");
        let alias = setter.clone();

        alias.set(3);
        assert_eq!(store.get("a"), 3);
    }
}
