use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::entry::Entry;

/// The process-wide default store.
static GLOBAL: LazyLock<Arc<Store>> = LazyLock::new(|| Arc::new(Store::new()));

/// Keyed storage for entries that are shared between computations.
///
/// Computations with a [`Shared`](crate::CachePolicy::Shared) policy add a
/// reference to their key when they are created and remove it when they are
/// dropped. Implementations must evict a key's entry as soon as its last
/// reference is removed.
pub trait CacheStore: Send + Sync {
    /// The current entry for `key`, if any.
    fn get(&self, key: &str) -> Option<Arc<Entry>>;

    /// Insert or replace the entry for `key`. Reference counts are untouched.
    fn set(&self, key: &str, entry: Entry);

    /// Increment the reference count of `key`, starting at one.
    fn add_reference(&self, key: &str);

    /// Decrement the reference count of `key`, evicting its entry at zero.
    ///
    /// Fails without touching any state if `key` holds no reference.
    fn remove_reference(&self, key: &str) -> Result<(), StoreError>;
}

/// An error raised by a [`CacheStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A reference was released that was never acquired, or was released
    /// twice.
    #[error("no reference is held for cache key `{key}`")]
    Unreferenced { key: String },
}

/// The default, mutex-protected [`CacheStore`].
#[derive(Debug, Default)]
pub struct Store(Mutex<Inner>);

/// Both maps are keyed identically while a key's count is positive.
#[derive(Debug, Default)]
struct Inner {
    /// Maps from keys to their cached pairs.
    entries: FxHashMap<String, Arc<Entry>>,
    /// Maps from keys to the number of live computations bound to them.
    references: FxHashMap<String, usize>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The store that shared computations bind to unless another one is
    /// injected.
    pub fn global() -> Arc<Store> {
        Arc::clone(&GLOBAL)
    }

    /// How many live computations are bound to `key`.
    pub fn references(&self, key: &str) -> usize {
        self.0.lock().references.get(key).copied().unwrap_or(0)
    }

    /// The number of stored entries.
    pub fn len(&self) -> usize {
        self.0.lock().entries.len()
    }

    /// Whether no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.0.lock().entries.is_empty()
    }
}

impl CacheStore for Store {
    fn get(&self, key: &str) -> Option<Arc<Entry>> {
        self.0.lock().entries.get(key).cloned()
    }

    fn set(&self, key: &str, entry: Entry) {
        self.0.lock().entries.insert(key.to_owned(), Arc::new(entry));
    }

    fn add_reference(&self, key: &str) {
        let mut inner = self.0.lock();
        let count = inner.references.entry(key.to_owned()).or_insert(0);
        *count += 1;
        tracing::trace!(key, count = *count, "added cache reference");
    }

    fn remove_reference(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.0.lock();
        let Some(count) = inner.references.get_mut(key) else {
            return Err(StoreError::Unreferenced { key: key.to_owned() });
        };

        *count -= 1;
        tracing::trace!(key, count = *count, "removed cache reference");
        if *count == 0 {
            inner.references.remove(key);
            inner.entries.remove(key);
        }

        Ok(())
    }
}
