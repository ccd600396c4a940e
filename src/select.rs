use crate::memo::Memo;
use crate::memoize::CachePolicy;

/// A tuple of projections over the same input.
///
/// Implemented for tuples of two to six closures `Fn(&In) -> A`. Projecting
/// yields the tuple of all their results, which then acts as the slice of a
/// selector.
pub trait Projections<In: ?Sized> {
    /// The tuple of projected values.
    type Slice;

    /// Apply every projection to the input.
    fn project(&self, input: &In) -> Self::Slice;
}

macro_rules! projections {
    ($($func:ident $out:ident $idx:tt),*) => {
        impl<In: ?Sized, $($func, $out),*> Projections<In> for ($($func,)*)
        where
            $($func: Fn(&In) -> $out,)*
        {
            type Slice = ($($out,)*);

            #[inline]
            fn project(&self, input: &In) -> Self::Slice {
                ($((self.$idx)(input),)*)
            }
        }
    };
}

projections! { F0 A0 0, F1 A1 1 }
projections! { F0 A0 0, F1 A1 1, F2 A2 2 }
projections! { F0 A0 0, F1 A1 1, F2 A2 2, F3 A3 3 }
projections! { F0 A0 0, F1 A1 1, F2 A2 2, F3 A3 3, F4 A4 4 }
projections! { F0 A0 0, F1 A1 1, F2 A2 2, F3 A3 3, F4 A4 4, F5 A5 5 }

/// Create a selector whose slice is the tuple of several projections.
///
/// Shared policies bind to the global store.
///
/// ```
/// use reselect::{create_selector, CachePolicy};
///
/// struct State {
///     items: Vec<u32>,
///     limit: usize,
/// }
///
/// let mut visible = create_selector(
///     (|s: &State| s.items.clone(), |s: &State| s.limit),
///     CachePolicy::Private,
///     |a: &(Vec<u32>, usize), b: &(Vec<u32>, usize)| a == b,
///     |(items, limit): &(Vec<u32>, usize)| items.iter().take(*limit).sum::<u32>(),
/// );
///
/// let state = State { items: vec![1, 2, 3], limit: 2 };
/// assert_eq!(visible.evaluate(&state), 3);
/// ```
pub fn create_selector<In, T, Out, E, M>(
    projections: T,
    policy: CachePolicy,
    eq: E,
    map: M,
) -> Memo<In, Out>
where
    In: ?Sized + 'static,
    T: Projections<In> + Send + 'static,
    T::Slice: Send + 'static,
    Out: Clone + Send + 'static,
    E: Fn(&T::Slice, &T::Slice) -> bool + Send + 'static,
    M: Fn(&T::Slice) -> Out + Send + 'static,
{
    Memo::with_policy(policy, move |input: &In| projections.project(input), eq, map)
}

/// Like [`create_selector`], but compares slices element-wise with
/// `PartialEq`.
pub fn create_selector_eq<In, T, Out, M>(
    projections: T,
    policy: CachePolicy,
    map: M,
) -> Memo<In, Out>
where
    In: ?Sized + 'static,
    T: Projections<In> + Send + 'static,
    T::Slice: PartialEq + Send + 'static,
    Out: Clone + Send + 'static,
    M: Fn(&T::Slice) -> Out + Send + 'static,
{
    create_selector(projections, policy, crate::eq::value::<T::Slice>, map)
}
