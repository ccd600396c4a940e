use std::any::TypeId;
use std::hash::Hash;

use siphasher::sip128::{Hasher128, SipHasher13};

/// Produce a 128-bit hash of a value.
///
/// The value's `TypeId` is mixed in so that equal bit patterns of different
/// slice types never hash equally.
#[inline]
pub fn hash<T: Hash + ?Sized + 'static>(value: &T) -> u128 {
    let mut state = SipHasher13::new();
    TypeId::of::<T>().hash(&mut state);
    value.hash(&mut state);
    state.finish128().as_u128()
}
