use std::any::Any;
use std::fmt::{self, Debug, Formatter};

use parking_lot::{Mutex, MutexGuard};

/// The cached `(slice, output)` pair behind one shared key.
///
/// An entry is owned by a [`CacheStore`](crate::CacheStore) and handed out
/// behind an `Arc`, so every computation bound to the key sees the same
/// entry. The pair is mutated in place on recompute while the entry is
/// locked.
pub struct Entry(Mutex<Payload>);

impl Entry {
    /// Create an entry holding a first pair.
    pub fn new<S, Out>(slice: S, output: Out) -> Self
    where
        S: Send + 'static,
        Out: Send + 'static,
    {
        Self(Mutex::new(Payload { slice: Box::new(slice), output: Box::new(output) }))
    }

    /// Lock the entry for a read-compare-write cycle.
    ///
    /// User closures may run while the guard is alive. A mapping function
    /// that evaluates another computation bound to the same key deadlocks.
    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, Payload> {
        self.0.lock()
    }
}

impl Debug for Entry {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.pad("Entry(..)")
    }
}

/// The dynamically typed contents of an [`Entry`].
pub struct Payload {
    slice: Box<dyn Any + Send>,
    output: Box<dyn Any + Send>,
}

impl Payload {
    /// The stored pair, if it has the expected types.
    ///
    /// Returns `None` when another computation with different slice or output
    /// types last wrote to the same key.
    #[inline]
    pub fn get<S: 'static, Out: 'static>(&self) -> Option<(&S, &Out)> {
        Some((self.slice.downcast_ref()?, self.output.downcast_ref()?))
    }

    /// Overwrite the pair, possibly with different types than before.
    pub fn replace<S, Out>(&mut self, slice: S, output: Out)
    where
        S: Send + 'static,
        Out: Send + 'static,
    {
        self.slice = Box::new(slice);
        self.output = Box::new(output);
    }
}

impl Debug for Payload {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.pad("Payload(..)")
    }
}
