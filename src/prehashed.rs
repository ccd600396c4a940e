use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::Deref;

/// A slice with a precomputed hash.
///
/// Comparing two `Prehashed` values compares their 128-bit hashes only, so
/// a selector over a large, deeply nested slice pays for hashing once when
/// the slice is projected and never for a structural comparison.
///
/// Two values with equal hashes are treated as equal. With 128-bit SipHash
/// a collision is practically impossible, but the predicate is not exact.
#[derive(Clone)]
pub struct Prehashed<T: ?Sized> {
    /// The hash of `item`, including its type.
    hash: u128,
    item: T,
}

impl<T: Hash + 'static> Prehashed<T> {
    /// Hash an item and wrap it.
    #[inline]
    pub fn new(item: T) -> Self {
        Self { hash: crate::hash::hash(&item), item }
    }

    /// Unwrap the item.
    #[inline]
    pub fn into_inner(self) -> T {
        self.item
    }
}

impl<T: ?Sized> Deref for Prehashed<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.item
    }
}

impl<T: ?Sized> PartialEq for Prehashed<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl<T: ?Sized> Eq for Prehashed<T> {}

impl<T: ?Sized> Hash for Prehashed<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u128(self.hash);
    }
}

impl<T: Debug + ?Sized> Debug for Prehashed<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.item.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_by_hash() {
        let a = Prehashed::new(vec!["a".to_string(), "b".to_string()]);
        let b = Prehashed::new(vec!["a".to_string(), "b".to_string()]);
        let c = Prehashed::new(vec!["a".to_string()]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 2);
        assert_eq!(c.into_inner(), ["a"]);
    }
}
