use std::any::type_name;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::entry::Entry;
use crate::memo::Evaluate;
use crate::store::CacheStore;

/// Where a memoized computation keeps its last `(slice, output)` pair.
///
/// Fixed when the computation is constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CachePolicy {
    /// The computation owns an exclusive slot that no store ever sees.
    #[default]
    Private,
    /// The computation reads and writes the store entry of this key. All
    /// computations bound to the same key observe each other's results.
    Shared(String),
}

impl CachePolicy {
    /// Create a shared policy for the given key.
    pub fn shared(key: impl Into<String>) -> Self {
        Self::Shared(key.into())
    }

    /// The shared key, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Private => None,
            Self::Shared(key) => Some(key),
        }
    }
}

/// A selector bound to its cache.
///
/// Projects a slice out of the input, compares it with the cached slice and
/// only runs the mapping function when they differ.
pub struct Memoized<In: ?Sized, S, Out, P, E, M> {
    /// Derives the slice of the input that the output depends on.
    project: P,
    /// Decides whether two slices are interchangeable.
    eq: E,
    /// Derives the output from a slice.
    map: M,
    /// The cache slot, private or shared.
    cache: Slot<S, Out>,
    _input: PhantomData<fn(&In)>,
}

/// The storage behind a [`CachePolicy`].
enum Slot<S, Out> {
    Private(Option<(S, Out)>),
    Shared(Binding),
}

/// A counted reference to a shared key.
///
/// Acquired on creation, released exactly once on drop.
struct Binding {
    store: Arc<dyn CacheStore>,
    key: String,
}

impl Binding {
    fn new(store: Arc<dyn CacheStore>, key: String) -> Self {
        store.add_reference(&key);
        Self { store, key }
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        if let Err(err) = self.store.remove_reference(&self.key) {
            tracing::error!(key = self.key.as_str(), "failed to release cache reference: {err}");
        }
    }
}

impl<In, S, Out, P, E, M> Memoized<In, S, Out, P, E, M>
where
    In: ?Sized,
    S: Send + 'static,
    Out: Clone + Send + 'static,
    P: Fn(&In) -> S,
    E: Fn(&S, &S) -> bool,
    M: Fn(&S) -> Out,
{
    /// Create a computation with an exclusive cache slot.
    pub fn private(project: P, eq: E, map: M) -> Self {
        Self::with_slot(Slot::Private(None), project, eq, map)
    }

    /// Create a computation bound to `key` in `store`.
    ///
    /// Adds a reference to the key right away. The reference is released when
    /// the computation is dropped.
    pub fn shared(
        store: Arc<dyn CacheStore>,
        key: impl Into<String>,
        project: P,
        eq: E,
        map: M,
    ) -> Self {
        let binding = Binding::new(store, key.into());
        Self::with_slot(Slot::Shared(binding), project, eq, map)
    }

    /// Create a computation with the given policy.
    ///
    /// The store is ignored for [`CachePolicy::Private`]; use
    /// [`Memoized::private`] to avoid passing one.
    pub fn new(
        store: Arc<dyn CacheStore>,
        policy: CachePolicy,
        project: P,
        eq: E,
        map: M,
    ) -> Self {
        match policy {
            CachePolicy::Private => Self::private(project, eq, map),
            CachePolicy::Shared(key) => Self::shared(store, key, project, eq, map),
        }
    }

    fn with_slot(cache: Slot<S, Out>, project: P, eq: E, map: M) -> Self {
        Self { project, eq, map, cache, _input: PhantomData }
    }

    /// The policy this computation was created with.
    pub fn policy(&self) -> CachePolicy {
        match &self.cache {
            Slot::Private(_) => CachePolicy::Private,
            Slot::Shared(binding) => CachePolicy::Shared(binding.key.clone()),
        }
    }

    /// Produce the output for `input`, reusing the cached one if the slice
    /// did not change.
    pub fn evaluate(&mut self, input: &In) -> Out {
        let slice = (self.project)(input);
        match &mut self.cache {
            Slot::Private(slot) => {
                if let Some((cached, output)) = slot.as_ref() {
                    if (self.eq)(cached, &slice) {
                        #[cfg(feature = "testing")]
                        crate::testing::register_hit();

                        return output.clone();
                    }
                }

                let output = (self.map)(&slice);
                *slot = Some((slice, output.clone()));

                #[cfg(feature = "testing")]
                crate::testing::register_miss();

                output
            }
            Slot::Shared(Binding { store, key }) => {
                let key = key.as_str();
                let Some(entry) = store.get(key) else {
                    tracing::trace!(key, "no cached entry");
                    let output = (self.map)(&slice);

                    // Another computation may have filled the key meanwhile.
                    // Update its entry so that holders of it see the write.
                    match store.get(key) {
                        Some(entry) => entry.lock().replace(slice, output.clone()),
                        None => store.set(key, Entry::new(slice, output.clone())),
                    }

                    #[cfg(feature = "testing")]
                    crate::testing::register_miss();

                    return output;
                };

                // Hold the entry for the whole compare-recompute-write cycle.
                let mut payload = entry.lock();
                match payload.get::<S, Out>() {
                    Some((cached, output)) if (self.eq)(cached, &slice) => {
                        tracing::trace!(key, "cache hit");

                        #[cfg(feature = "testing")]
                        crate::testing::register_hit();

                        return output.clone();
                    }
                    Some(_) => tracing::trace!(key, "slice changed"),
                    None => tracing::warn!(
                        key,
                        slice = type_name::<S>(),
                        output = type_name::<Out>(),
                        "cached entry has mismatched types, \
                         is the same key used by different selectors?"
                    ),
                }

                let output = (self.map)(&slice);
                payload.replace(slice, output.clone());

                #[cfg(feature = "testing")]
                crate::testing::register_miss();

                output
            }
        }
    }
}

impl<In, S, Out, P, E, M> Evaluate<In, Out> for Memoized<In, S, Out, P, E, M>
where
    In: ?Sized,
    S: Send + 'static,
    Out: Clone + Send + 'static,
    P: Fn(&In) -> S,
    E: Fn(&S, &S) -> bool,
    M: Fn(&S) -> Out,
{
    #[inline]
    fn evaluate(&mut self, input: &In) -> Out {
        Memoized::evaluate(self, input)
    }
}
