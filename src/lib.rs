/*!
Memoized selectors for deriving values from large state.

A selector projects a _slice_ out of some state, compares it with the slice
it saw last time and only recomputes its output when the two differ.
Otherwise, the cached output is returned without running the mapping
function.

```
use reselect::{eq, Memo};

struct Store {
    todos: Vec<(String, bool)>,
    cursor: usize,
}

let mut open = Memo::new(
    |store: &Store| store.todos.clone(),
    eq::value,
    |todos: &Vec<(String, bool)>| todos.iter().filter(|(_, done)| !done).count(),
);

let mut store = Store {
    todos: vec![("Write docs".into(), false), ("Ship".into(), true)],
    cursor: 0,
};

// [Miss] Nothing is cached yet.
assert_eq!(open.evaluate(&store), 1);

// [Hit] The cursor is not part of the slice.
store.cursor += 1;
assert_eq!(open.evaluate(&store), 1);

// [Miss] The todos changed.
store.todos[1].1 = false;
assert_eq!(open.evaluate(&store), 2);
```

# Shared caches
By default, each selector has a private cache. Selectors created with
[`CachePolicy::Shared`] instead store their result in a [`CacheStore`] under
a key. All selectors bound to the same key see each other's results, and the
store evicts the key's entry once the last of them is dropped.
*/

mod entry;
mod hash;
mod memo;
mod memoize;
mod prehashed;
mod select;
mod store;

pub mod eq;
#[cfg(feature = "testing")]
pub mod testing;

pub use crate::entry::{Entry, Payload};
pub use crate::memo::{Evaluate, Memo};
pub use crate::memoize::{CachePolicy, Memoized};
pub use crate::prehashed::Prehashed;
pub use crate::select::{create_selector, create_selector_eq, Projections};
pub use crate::store::{CacheStore, Store, StoreError};
