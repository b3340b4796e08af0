use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Handle for one listener registration.
///
/// Returned by [`Notifier::subscribe`] and consumed (by reference) by
/// [`Notifier::unsubscribe`]. Each handle identifies exactly one
/// registration, so subscribing the same identifier twice yields two
/// independent handles.
#[derive(Debug)]
pub struct Subscription {
    id: String,
    token: usize,
}

impl Subscription {
    /// The identifier this subscription listens on.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// A thread-safe pub/sub registry keyed by identifier.
///
/// Each store owns one notifier. `notify` delivers a value synchronously
/// to every listener currently registered for that identifier, in
/// registration order; listeners for other identifiers are never invoked.
pub struct Notifier<T> {
    listeners: Arc<RwLock<HashMap<String, Vec<(usize, Listener<T>)>>>>,
    next_token: Arc<AtomicUsize>,
}

impl<T> Notifier<T> {
    /// Create an empty notifier.
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(RwLock::new(HashMap::new())),
            next_token: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Register `listener` under `id`.
    ///
    /// The listener is called for every subsequent [`notify`](Self::notify)
    /// on `id` until the returned handle is passed to
    /// [`unsubscribe`](Self::unsubscribe). Re-subscribing is not
    /// deduplicated; each call adds an independent registration.
    pub fn subscribe<F>(&self, id: &str, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let token = self.next_token.fetch_add(1, Ordering::SeqCst);
        let mut listeners = self.listeners.write().unwrap();
        listeners
            .entry(id.to_string())
            .or_default()
            .push((token, Arc::new(listener)));
        Subscription {
            id: id.to_string(),
            token,
        }
    }

    /// Remove the registration behind `subscription`.
    ///
    /// Idempotent: removing an already-removed registration is a no-op.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        let mut listeners = self.listeners.write().unwrap();
        let now_empty = match listeners.get_mut(&subscription.id) {
            Some(registered) => {
                registered.retain(|(token, _)| *token != subscription.token);
                registered.is_empty()
            }
            None => false,
        };
        if now_empty {
            listeners.remove(&subscription.id);
        }
    }

    /// Deliver `value` to every listener currently registered for `id`.
    ///
    /// Listeners run synchronously in registration order. The registry
    /// lock is released before any listener runs, so a listener may
    /// subscribe, unsubscribe, or write back into the owning store;
    /// registrations changed mid-pass take effect on the next notify.
    /// A panicking listener aborts the pass but leaves the registry intact.
    pub fn notify(&self, id: &str, value: &T) {
        let snapshot: Vec<Listener<T>> = {
            let listeners = self.listeners.read().unwrap();
            match listeners.get(id) {
                Some(registered) => registered.iter().map(|(_, l)| Arc::clone(l)).collect(),
                None => return,
            }
        };
        for listener in snapshot {
            listener(value);
        }
    }
}

impl<T> Default for Notifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Notifier<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Arc::clone(&self.listeners),
            next_token: Arc::clone(&self.next_token),
        }
    }
}
