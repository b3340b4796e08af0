use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::action::StoreAction;
use crate::medium::{FileMedium, MediumError, StorageMedium};
use crate::observe::{Notifier, Subscription};

use super::KeyedStore;

/// A keyed store persisted through a [`StorageMedium`].
///
/// Each identifier maps to one physical entry keyed
/// `"{namespace}/{identifier}"`, holding the JSON encoding of the value.
/// Stores with distinct namespaces can therefore share one medium without
/// colliding, and a store rebuilt over the same medium and namespace
/// reads back the values a previous instance wrote.
///
/// Data-shape problems never surface to callers: an absent entry reads as
/// the default, and an entry that no longer deserializes is deleted from
/// the medium and also reads as the default. Medium failures are logged
/// and collapse to the same fallback.
///
/// # Examples
///
/// ```
/// use cubby::{KeyedStore, LocalStore, MemoryMedium};
///
/// let medium = MemoryMedium::new();
/// let store = LocalStore::new("settings", String::from("light"), medium.clone());
/// store.set("user1", String::from("dark"));
///
/// // A second instance over the same namespace sees the write.
/// let rebuilt = LocalStore::new("settings", String::from("light"), medium);
/// assert_eq!(rebuilt.get("user1"), "dark");
/// assert_eq!(rebuilt.get("user2"), "light");
/// ```
pub struct LocalStore<T, M = FileMedium> {
    inner: Arc<Inner<T, M>>,
    notifier: Notifier<T>,
}

struct Inner<T, M> {
    namespace: String,
    default: T,
    medium: M,
    // Serializes read-modify-write cycles in `apply`.
    write_lock: Mutex<()>,
}

impl<T, M> LocalStore<T, M>
where
    T: Clone + Serialize + DeserializeOwned,
    M: StorageMedium,
{
    /// Create a store over `medium`, namespacing its physical keys with
    /// `namespace`.
    pub fn new(namespace: impl Into<String>, default: T, medium: M) -> Self {
        Self {
            inner: Arc::new(Inner {
                namespace: namespace.into(),
                default,
                medium,
                write_lock: Mutex::new(()),
            }),
            notifier: Notifier::new(),
        }
    }

    /// The namespace prefixed onto every physical key.
    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    /// The default value served for absent identifiers.
    pub fn default_value(&self) -> T {
        self.inner.default.clone()
    }

    fn key(&self, id: &str) -> String {
        format!("{}/{}", self.inner.namespace, id)
    }
}

impl<T> LocalStore<T, FileMedium>
where
    T: Clone + Serialize + DeserializeOwned,
{
    /// Create a file-backed store under the per-user local data
    /// directory, using `namespace` both as the directory name and the
    /// physical key prefix.
    pub fn open(namespace: &str, default: T) -> Result<Self, MediumError> {
        let medium = FileMedium::in_local_data(namespace)?;
        Ok(Self::new(namespace, default, medium))
    }
}

impl<T, M> KeyedStore<T> for LocalStore<T, M>
where
    T: Clone + Serialize + DeserializeOwned,
    M: StorageMedium,
{
    fn get(&self, id: &str) -> T {
        let key = self.key(id);
        let payload = match self.inner.medium.get_item(&key) {
            Ok(Some(payload)) => payload,
            Ok(None) => return self.inner.default.clone(),
            Err(e) => {
                log::warn!("read of `{key}` failed, serving default: {e}");
                return self.inner.default.clone();
            }
        };
        match serde_json::from_str(&payload) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("scrubbing corrupt entry `{key}`: {e}");
                if let Err(e) = self.inner.medium.remove_item(&key) {
                    log::warn!("could not scrub `{key}`: {e}");
                }
                self.inner.default.clone()
            }
        }
    }

    fn apply(&self, id: &str, action: StoreAction<T>) -> T {
        let key = self.key(id);
        let next = {
            let _guard = self.inner.write_lock.lock().unwrap();
            // Derivations run against the durably-read value, scrubbing
            // corruption on the way, not against an in-memory cache.
            let next = action.resolve(self.get(id));
            match serde_json::to_string(&next) {
                Ok(encoded) => {
                    if let Err(e) = self.inner.medium.set_item(&key, &encoded) {
                        log::warn!("write of `{key}` failed, value not persisted: {e}");
                    }
                }
                Err(e) => log::error!("value for `{key}` is not serializable: {e}"),
            }
            next
        };
        self.notifier.notify(id, &next);
        next
    }

    fn remove(&self, id: &str) {
        let key = self.key(id);
        if let Err(e) = self.inner.medium.remove_item(&key) {
            log::warn!("removal of `{key}` failed: {e}");
        }
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

impl<T, M> Clone for LocalStore<T, M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            notifier: self.notifier.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::medium::MemoryMedium;
    use serde::{Deserialize, Serialize};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
    struct Prefs {
        theme: String,
    }

    fn light() -> Prefs {
        Prefs {
            theme: "light".to_string(),
        }
    }

    fn store(medium: MemoryMedium) -> LocalStore<Prefs, MemoryMedium> {
        LocalStore::new("settings", light(), medium)
    }

    /// A medium whose every operation fails, as an offline disk would.
    struct OfflineMedium;

    impl OfflineMedium {
        fn err(key: &str) -> MediumError {
            MediumError::Io {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "medium offline"),
            }
        }
    }

    impl StorageMedium for OfflineMedium {
        fn get_item(&self, key: &str) -> Result<Option<String>, MediumError> {
            Err(Self::err(key))
        }

        fn set_item(&self, key: &str, _value: &str) -> Result<(), MediumError> {
            Err(Self::err(key))
        }

        fn remove_item(&self, key: &str) -> Result<(), MediumError> {
            Err(Self::err(key))
        }
    }

    #[test]
    fn unwritten_id_reads_default() {
        let store = store(MemoryMedium::new());
        assert_eq!(store.get("user1"), light());
        assert_eq!(store.namespace(), "settings");
        assert_eq!(store.default_value(), light());
    }

    #[test]
    fn set_persists_under_namespaced_key() {
        let medium = MemoryMedium::new();
        let store = store(medium.clone());

        store.set(
            "user1",
            Prefs {
                theme: "dark".to_string(),
            },
        );

        let payload = medium.get_item("settings/user1").unwrap().unwrap();
        assert_eq!(payload, "{\"theme\":\"dark\"}");
    }

    #[test]
    fn fresh_instance_reads_persisted_value() {
        let medium = MemoryMedium::new();
        store(medium.clone()).set(
            "user1",
            Prefs {
                theme: "dark".to_string(),
            },
        );

        let rebuilt = store(medium);
        assert_eq!(rebuilt.get("user1").theme, "dark");
        assert_eq!(rebuilt.get("user2"), light());
    }

    #[test]
    fn update_derives_from_durable_state() {
        let medium = MemoryMedium::new();
        let numbers: LocalStore<i64, _> = LocalStore::new("counters", 0, medium.clone());
        numbers.set("n", 41);

        // A second handle over the same medium must see 41, not a cache.
        let other: LocalStore<i64, _> = LocalStore::new("counters", 0, medium);
        assert_eq!(other.update("n", |n| n + 1), 42);
        assert_eq!(numbers.get("n"), 42);
    }

    #[test]
    fn corrupt_entry_is_scrubbed_and_reads_default() {
        let medium = MemoryMedium::new();
        medium.set_item("settings/user1", "not json").unwrap();

        let store = store(medium.clone());
        assert_eq!(store.get("user1"), light());
        assert_eq!(medium.get_item("settings/user1").unwrap(), None);
    }

    #[test]
    fn mistyped_entry_counts_as_corrupt() {
        let medium = MemoryMedium::new();
        medium.set_item("settings/user1", "[1,2,3]").unwrap();

        let store = store(medium.clone());
        assert_eq!(store.get("user1"), light());
        assert_eq!(medium.get_item("settings/user1").unwrap(), None);
    }

    #[test]
    fn remove_deletes_the_physical_entry() {
        let medium = MemoryMedium::new();
        let store = store(medium.clone());

        store.set(
            "user1",
            Prefs {
                theme: "dark".to_string(),
            },
        );
        store.remove("user1");

        assert_eq!(medium.get_item("settings/user1").unwrap(), None);
        assert_eq!(store.get("user1"), light());
    }

    #[test]
    fn namespaces_do_not_collide() {
        let medium = MemoryMedium::new();
        let a: LocalStore<i64, _> = LocalStore::new("a", 0, medium.clone());
        let b: LocalStore<i64, _> = LocalStore::new("b", 0, medium);

        a.set("shared", 1);
        b.set("shared", 2);

        assert_eq!(a.get("shared"), 1);
        assert_eq!(b.get("shared"), 2);
    }

    #[test]
    fn medium_failure_collapses_to_default() {
        let store: LocalStore<i64, _> = LocalStore::new("counters", 5, OfflineMedium);

        // Reads serve the default instead of surfacing the failure.
        assert_eq!(store.get("n"), 5);

        // Writes stay infallible and return the resolved value, even
        // though nothing could be persisted.
        assert_eq!(store.set("n", 9), 9);
        assert_eq!(store.get("n"), 5);

        // Derivations run against the durable read, which fell back.
        assert_eq!(store.update("n", |n| n + 1), 6);

        store.remove("n");
        assert_eq!(store.get("n"), 5);
    }

    #[test]
    fn subscriber_sees_writes_to_its_id_only() {
        let store = store(MemoryMedium::new());
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();

        let sub = store.subscribe("a", move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        store.set("b", light());
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        store.set("a", light());
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        store.unsubscribe(&sub);
        store.set("a", light());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn file_backed_store_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let medium = FileMedium::new(dir.path());
        let store: LocalStore<Prefs, _> =
            LocalStore::new("settings", light(), medium);

        store.set(
            "user1",
            Prefs {
                theme: "dark".to_string(),
            },
        );

        let rebuilt: LocalStore<Prefs, _> =
            LocalStore::new("settings", light(), FileMedium::new(dir.path()));
        assert_eq!(rebuilt.get("user1").theme, "dark");
    }
}
