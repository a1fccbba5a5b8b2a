//! `FixedHasher` for general keys, `TypeIdHasher` for `TypeId` keys.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHasher

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x3D0C_7A51_E2B9_4F17);

/// A `foldhash` hasher whose output only depends on the input.
pub type FixedHasher = FoldHasher<'static>;

/// Build state for [`FixedHasher`].
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use docmap_utils::hash::FixedHashState;
///
/// let a = FixedHashState.hash_one("address");
/// let b = FixedHashState.hash_one("address");
/// assert_eq!(a, b);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// TypeIdHasher

/// A hasher for [`TypeId`](core::any::TypeId) keys.
///
/// A `TypeId` is already a hash and feeds itself through `write_u64`, which
/// is stored as is. Other input is hashed with [`FixedHasher`].
#[derive(Copy, Clone, Default, Debug)]
pub struct TypeIdHasher {
    hash: u64,
}

impl Hasher for TypeIdHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        self.hash = FIXED_HASH_STATE.hash_one((self.hash, bytes));
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// Build state for [`TypeIdHasher`].
#[derive(Copy, Clone, Default, Debug)]
pub struct TypeIdHashState;

impl BuildHasher for TypeIdHashState {
    type Hasher = TypeIdHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        TypeIdHasher::default()
    }
}
