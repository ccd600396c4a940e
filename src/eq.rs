//! Ready-made equality predicates for slices.
//!
//! Any `Fn(&S, &S) -> bool` works as a predicate, as long as it is an
//! equivalence relation. A predicate that reports unequal slices as equal
//! makes a selector return stale outputs.

use std::hash::Hash;
use std::sync::Arc;

/// Compare slices by value.
#[inline]
pub fn value<T: PartialEq + ?Sized>(a: &T, b: &T) -> bool {
    a == b
}

/// Compare shared slices by identity.
///
/// Cheap for large slices that are replaced instead of mutated, but reports
/// equal contents behind distinct allocations as a change.
#[inline]
pub fn ptr<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    Arc::ptr_eq(a, b)
}

/// Compare slices by their 128-bit hashes.
///
/// Useful for slices that are `Hash` but not `PartialEq`. The odds of a
/// collision are negligible, but each comparison hashes both slices in full.
/// Wrap slices in [`Prehashed`](crate::Prehashed) to hash them only once.
#[inline]
pub fn hashed<T: Hash + ?Sized + 'static>(a: &T, b: &T) -> bool {
    crate::hash::hash(a) == crate::hash::hash(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value() {
        assert!(value(&[1, 2], &[1, 2]));
        assert!(!value("a", "b"));
    }

    #[test]
    fn test_ptr() {
        let a = Arc::new(vec![1]);
        let b = Arc::new(vec![1]);
        assert!(ptr(&a, &a.clone()));
        assert!(!ptr(&a, &b));
    }

    #[test]
    fn test_hashed() {
        assert!(hashed(&(1, "x"), &(1, "x")));
        assert!(!hashed(&(1, "x"), &(2, "x")));
    }
}
