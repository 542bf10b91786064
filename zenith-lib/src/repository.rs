//src/repository.rs
use crate::store::{KeyValueStore, StoreWrite};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::rc::Rc;
use tracing::{debug, error, warn};

/// Handle returned by [`Repository::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(usize);

type Listener<T> = Box<dyn Fn(&T)>;

/// Typed, write-through binding of one store key.
///
/// Reads that fail to parse fall back to the initial value. Writes update the
/// in-memory value first; if persisting fails the error is logged and the
/// repository stays dirty until the next successful write.
pub struct Repository<T> {
    store: Rc<dyn KeyValueStore>,
    key: String,
    initial: T,
    value: T,
    dirty: bool,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_listener: usize,
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned + Clone + PartialEq,
{
    pub fn load(store: Rc<dyn KeyValueStore>, key: impl Into<String>, initial: T) -> Self {
        let key = key.into();
        let value = read_or(&*store, &key, &initial);
        Self {
            store,
            key,
            initial,
            value,
            dirty: false,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// True when the in-memory value has not reached the store.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set(&mut self, value: T) {
        let persisted = match self.stage(&value) {
            Ok(write) => match self.store.apply(std::slice::from_ref(&write)) {
                Ok(()) => true,
                Err(e) => {
                    error!(key = %self.key, "Error writing store key: {e}");
                    false
                }
            },
            Err(e) => {
                error!(key = %self.key, "Error encoding value: {e}");
                false
            }
        };
        self.accept(value, persisted);
    }

    pub fn update(&mut self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.value);
        self.set(next);
    }

    /// Encodes `value` as a pending write without touching the store.
    /// A value encoding to JSON `null` becomes a removal of the key.
    /// # Errors
    /// Returns `serde_json::Error` if the value cannot be encoded.
    pub fn stage(&self, value: &T) -> Result<StoreWrite, serde_json::Error> {
        let encoded = serde_json::to_string(value)?;
        Ok(if encoded == "null" {
            StoreWrite::Remove {
                key: self.key.clone(),
            }
        } else {
            StoreWrite::Set {
                key: self.key.clone(),
                value: encoded,
            }
        })
    }

    /// Takes `value` as the current state after a write performed elsewhere
    /// (e.g. a batch through the store), then notifies listeners.
    pub fn accept(&mut self, value: T, persisted: bool) {
        self.value = value;
        self.dirty = !persisted;
        self.notify();
    }

    /// Re-reads the key after an external change, replacing the in-memory value
    /// wholesale. Returns whether the value changed.
    pub fn reload(&mut self) -> bool {
        let fresh = read_or(&*self.store, &self.key, &self.initial);
        if fresh == self.value {
            return false;
        }
        debug!(key = %self.key, "Reloaded store key after external change");
        self.value = fresh;
        self.dirty = false;
        self.notify();
        true
    }

    pub fn subscribe(&mut self, listener: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.value);
        }
    }
}

fn read_or<T>(store: &dyn KeyValueStore, key: &str, initial: &T) -> T
where
    T: DeserializeOwned + Clone,
{
    match store.get(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(key, "Error parsing store key, using default: {e}");
            initial.clone()
        }),
        Ok(None) => initial.clone(),
        Err(e) => {
            warn!(key, "Error reading store key, using default: {e}");
            initial.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::cell::Cell;

    #[test]
    fn malformed_json_falls_back_to_initial() {
        let store = Rc::new(MemoryStore::new());
        store.set("k", "{not json").unwrap();
        let repo: Repository<Vec<u32>> = Repository::load(store, "k", vec![7]);
        assert_eq!(repo.get(), &vec![7]);
    }

    #[test]
    fn none_removes_the_key() {
        let store = Rc::new(MemoryStore::new());
        let mut repo: Repository<Option<u32>> = Repository::load(store.clone(), "k", None);
        repo.set(Some(3));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("3"));
        repo.set(None);
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn listeners_fire_on_set_and_changed_reload() {
        let store = Rc::new(MemoryStore::new());
        let mut repo: Repository<u32> = Repository::load(store.clone(), "k", 0);
        let hits = Rc::new(Cell::new(0));
        let seen = hits.clone();
        let id = repo.subscribe(move |_| seen.set(seen.get() + 1));

        repo.set(1);
        store.set("k", "5").unwrap();
        assert!(repo.reload());
        assert!(!repo.reload());
        assert_eq!(*repo.get(), 5);
        assert_eq!(hits.get(), 2);

        assert!(repo.unsubscribe(id));
        repo.set(6);
        assert_eq!(hits.get(), 2);
    }
}
