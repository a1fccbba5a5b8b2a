//! Hash containers, re-exports *hashbrown* and *foldhash*.
//!
//! Every container here uses [`FixedHashState`] so that hashing a key is
//! a pure function of the key. That keeps the lookup tables of a
//! `Document` cheap to clone and independent of process randomness.

// -----------------------------------------------------------------------------
// Modules

mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::{FixedHashState, FixedHasher};
pub use hasher::{TypeIdHashState, TypeIdHasher};

/// A [`hashbrown::HashMap`] using [`FixedHashState`].
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`].
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

/// A raw [`hashbrown::HashTable`], callers provide hashes explicitly.
pub type HashTable<T> = hashbrown::HashTable<T>;

/// Hash a single value with [`FixedHashState`].
///
/// # Examples
///
/// ```
/// use docmap_utils::hash::hash_one;
///
/// assert_eq!(hash_one("key"), hash_one("key"));
/// assert_ne!(hash_one("key"), hash_one("other"));
/// ```
#[inline]
pub fn hash_one<T: core::hash::Hash + ?Sized>(value: &T) -> u64 {
    use core::hash::BuildHasher;
    FixedHashState.hash_one(value)
}

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;
