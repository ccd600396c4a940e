use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use crate::memoize::{CachePolicy, Memoized};
use crate::store::{CacheStore, Store};

/// Produces an output for an input.
///
/// This is the single operation a [`Memo`] exposes. It is implemented by
/// [`Memoized`] and can be implemented by custom evaluators that should be
/// held alongside memoized ones.
pub trait Evaluate<In: ?Sized, Out> {
    /// Produce the output for `input`.
    fn evaluate(&mut self, input: &In) -> Out;
}

/// A memoized selector from `In` to `Out`.
///
/// Hides the slice type, the functions and the cache policy of the wrapped
/// computation, so that selectors over the same state can be stored side by
/// side. The handle owns its computation: dropping the handle drops the
/// computation and releases its shared cache reference, if any.
///
/// ```
/// use reselect::{eq, Memo};
///
/// struct State {
///     names: Vec<String>,
///     clicks: u32,
/// }
///
/// let mut longest = Memo::new(
///     |state: &State| state.names.clone(),
///     eq::value,
///     |names: &Vec<String>| names.iter().map(String::len).max().unwrap_or(0),
/// );
///
/// let mut state = State { names: vec!["Ada".into(), "Grace".into()], clicks: 0 };
/// assert_eq!(longest.evaluate(&state), 5);
///
/// // The names did not change, so the cached length is returned.
/// state.clicks += 1;
/// assert_eq!(longest.evaluate(&state), 5);
/// ```
pub struct Memo<In: ?Sized, Out>(Box<dyn Evaluate<In, Out> + Send>);

impl<In, Out> Memo<In, Out>
where
    In: ?Sized + 'static,
    Out: Clone + Send + 'static,
{
    /// Create a selector with a private cache.
    pub fn new<S, P, E, M>(project: P, eq: E, map: M) -> Self
    where
        S: Send + 'static,
        P: Fn(&In) -> S + Send + 'static,
        E: Fn(&S, &S) -> bool + Send + 'static,
        M: Fn(&S) -> Out + Send + 'static,
    {
        Self::from_evaluate(Memoized::private(project, eq, map))
    }

    /// Create a selector with the given policy.
    ///
    /// Shared policies bind to [`Store::global`].
    pub fn with_policy<S, P, E, M>(policy: CachePolicy, project: P, eq: E, map: M) -> Self
    where
        S: Send + 'static,
        P: Fn(&In) -> S + Send + 'static,
        E: Fn(&S, &S) -> bool + Send + 'static,
        M: Fn(&S) -> Out + Send + 'static,
    {
        match policy {
            CachePolicy::Private => Self::new(project, eq, map),
            CachePolicy::Shared(key) => {
                Self::with_store(Store::global(), CachePolicy::Shared(key), project, eq, map)
            }
        }
    }

    /// Create a selector whose shared policy binds to `store`.
    pub fn with_store<S, P, E, M>(
        store: Arc<dyn CacheStore>,
        policy: CachePolicy,
        project: P,
        eq: E,
        map: M,
    ) -> Self
    where
        S: Send + 'static,
        P: Fn(&In) -> S + Send + 'static,
        E: Fn(&S, &S) -> bool + Send + 'static,
        M: Fn(&S) -> Out + Send + 'static,
    {
        Self::from_evaluate(Memoized::new(store, policy, project, eq, map))
    }
}

impl<In: ?Sized, Out> Memo<In, Out> {
    /// Wrap an arbitrary evaluator.
    pub fn from_evaluate<T>(evaluator: T) -> Self
    where
        T: Evaluate<In, Out> + Send + 'static,
    {
        Self(Box::new(evaluator))
    }

    /// Produce the output for `input`.
    #[inline]
    pub fn evaluate(&mut self, input: &In) -> Out {
        self.0.evaluate(input)
    }
}

impl<In: ?Sized, Out> Evaluate<In, Out> for Memo<In, Out> {
    #[inline]
    fn evaluate(&mut self, input: &In) -> Out {
        self.0.evaluate(input)
    }
}

impl<In: ?Sized, Out> Debug for Memo<In, Out> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.pad("Memo(..)")
    }
}
