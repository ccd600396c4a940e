use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use parking_lot::Mutex;
use reselect::{eq, CachePolicy, CacheStore, Entry, Memo, Store, StoreError};
use tracing::Level;

mod capture;

/// A call made to a store.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Get(String),
    Set(String),
    Add(String),
    Remove(String),
}

/// A store that records every call before forwarding it.
#[derive(Default)]
struct Recording {
    inner: Store,
    calls: Mutex<Vec<Call>>,
}

impl Recording {
    fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock())
    }
}

impl CacheStore for Recording {
    fn get(&self, key: &str) -> Option<Arc<Entry>> {
        self.calls.lock().push(Call::Get(key.into()));
        self.inner.get(key)
    }

    fn set(&self, key: &str, entry: Entry) {
        self.calls.lock().push(Call::Set(key.into()));
        self.inner.set(key, entry)
    }

    fn add_reference(&self, key: &str) {
        self.calls.lock().push(Call::Add(key.into()));
        self.inner.add_reference(key)
    }

    fn remove_reference(&self, key: &str) -> Result<(), StoreError> {
        self.calls.lock().push(Call::Remove(key.into()));
        self.inner.remove_reference(key)
    }
}

fn doubler(store: &Arc<Recording>, policy: CachePolicy) -> Memo<i64, i64> {
    Memo::with_store(store.clone(), policy, |n: &i64| *n, eq::value, |n: &i64| n * 2)
}

#[test]
fn test_private_never_touches_store() {
    let store = Arc::new(Recording::default());
    let mut memo = doubler(&store, CachePolicy::Private);
    assert_eq!(memo.evaluate(&1), 2);
    assert_eq!(memo.evaluate(&1), 2);
    assert_eq!(memo.evaluate(&5), 10);
    drop(memo);
    assert!(store.take().is_empty());
}

#[test]
fn test_shared_calls() {
    let key = || "k".to_string();
    let store = Arc::new(Recording::default());

    let mut memo = doubler(&store, CachePolicy::shared("k"));
    assert_eq!(store.take(), [Call::Add(key())]);

    // The key is looked up again before a new entry is installed.
    assert_eq!(memo.evaluate(&3), 6);
    assert_eq!(store.take(), [Call::Get(key()), Call::Get(key()), Call::Set(key())]);

    // Hits and in-place updates only read the store.
    assert_eq!(memo.evaluate(&3), 6);
    assert_eq!(memo.evaluate(&4), 8);
    assert_eq!(store.take(), [Call::Get(key()), Call::Get(key())]);

    drop(memo);
    assert_eq!(store.take(), [Call::Remove(key())]);
    assert!(store.inner.is_empty());
}

#[test]
fn test_release_after_external_removal() {
    let store = Arc::new(Recording::default());
    let mut memo = doubler(&store, CachePolicy::shared("k"));
    assert_eq!(memo.evaluate(&1), 2);

    // Someone else released the reference held by `memo`.
    store.remove_reference("k").unwrap();
    assert!(store.get("k").is_none());

    // Dropping reports the error instead of underflowing.
    let ((), records) = capture::events(|| drop(memo));
    assert!(capture::emitted(&records, Level::ERROR, "k"));
    assert_eq!(store.inner.references("k"), 0);
    assert_eq!(
        store.inner.remove_reference("k"),
        Err(StoreError::Unreferenced { key: "k".into() }),
    );
}

#[test]
fn test_panicking_map_releases_reference() {
    let store = Arc::new(Store::new());
    let mut sibling = Memo::with_store(
        store.clone(),
        CachePolicy::shared("k"),
        |n: &i64| *n,
        eq::value,
        |n: &i64| n + 1,
    );
    assert_eq!(sibling.evaluate(&1), 2);

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut failing = Memo::with_store(
            store.clone(),
            CachePolicy::shared("k"),
            |n: &i64| *n,
            eq::value,
            |_: &i64| -> i64 { panic!("mapping failed") },
        );
        assert_eq!(store.references("k"), 2);
        failing.evaluate(&5)
    }));
    assert!(result.is_err());

    // The reference was released during unwinding and the entry is unlocked.
    assert_eq!(store.references("k"), 1);
    assert_eq!(sibling.evaluate(&1), 2);
    assert_eq!(sibling.evaluate(&5), 6);

    drop(sibling);
    assert_eq!(store.references("k"), 0);
    assert!(store.is_empty());
}

#[test]
fn test_first_evaluation_joins_concurrent_entry() {
    let store = Arc::new(Store::new());
    let seen = Arc::new(Mutex::new(None));

    // While mapping, another computation installs an entry for the key.
    let mut memo = {
        let store = store.clone();
        let seen = seen.clone();
        Memo::with_store(
            store.clone(),
            CachePolicy::shared("k"),
            |n: &i64| *n,
            eq::value,
            move |n: &i64| {
                if seen.lock().is_none() {
                    store.set("k", Entry::new(0i64, 0i64));
                    *seen.lock() = store.get("k");
                }
                n * 3
            },
        )
    };

    assert_eq!(memo.evaluate(&7), 21);

    // The installed entry was updated in place rather than replaced.
    let installed = seen.lock().clone().unwrap();
    let current = store.get("k").unwrap();
    assert!(Arc::ptr_eq(&installed, &current));
    assert_eq!(installed.lock().get::<i64, i64>(), Some((&7, &21)));
}

#[test]
fn test_default_store_is_global() {
    let store = Store::global();
    let memo = Memo::with_policy(
        CachePolicy::shared("store::global"),
        |n: &u8| *n,
        eq::value,
        |n: &u8| u16::from(*n),
    );
    assert_eq!(store.references("store::global"), 1);
    drop(memo);
    assert_eq!(store.references("store::global"), 0);
}

#[test]
fn test_concurrent_shared() {
    const THREADS: usize = 8;
    const ROUNDS: u64 = 200;

    let store = Arc::new(Store::new());
    let runs = Arc::new(AtomicUsize::new(0));
    let spawn = |input: fn(u64) -> (u64, u64)| {
        thread::scope(|scope| {
            for _ in 0..THREADS {
                let store = store.clone();
                let runs = runs.clone();
                scope.spawn(move || {
                    let mut memo = Memo::with_store(
                        store,
                        CachePolicy::shared("k"),
                        |state: &(u64, u64)| state.0 / 10,
                        eq::value,
                        move |bucket: &u64| {
                            runs.fetch_add(1, Ordering::SeqCst);
                            bucket * 100
                        },
                    );

                    for i in 0..ROUNDS {
                        let state = input(i);
                        assert_eq!(memo.evaluate(&state), (state.0 / 10) * 100);
                    }
                });
            }
        });
    };

    // Only threads that find no entry yet compute.
    spawn(|i| (42, i));
    assert!(runs.load(Ordering::SeqCst) <= THREADS);
    assert_eq!(store.references("k"), 0);
    assert!(store.is_empty());

    // Threads in different buckets overwrite each other's entry, but every
    // output is still right.
    spawn(|i| (i, i));
    assert_eq!(store.references("k"), 0);
    assert!(store.is_empty());
}
