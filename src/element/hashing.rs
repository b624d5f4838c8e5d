//! Structural hashing.
//!
//! [`StructuralKey`] is the hash/equality contract the set storage relies on:
//! two keys that compare equal must report the same structural hash, at any
//! nesting depth. Hashes are deterministic (`FxHasher` has no random seed),
//! so equal content built in different orders, or in different sets, always
//! hashes identically.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

pub(crate) const TAG_BOOL: u8 = 1;
pub(crate) const TAG_INT: u8 = 2;
pub(crate) const TAG_FLOAT: u8 = 3;
pub(crate) const TAG_STRING: u8 = 4;
pub(crate) const TAG_BINARY: u8 = 5;
pub(crate) const TAG_LIST: u8 = 6;
pub(crate) const TAG_SET: u8 = 7;

/// A value with content-derived equality and hash.
///
/// Implementations must uphold `a == b` implies
/// `a.structural_hash() == b.structural_hash()`.
///
/// # Examples
///
/// ```rust
/// use typed_frozenset::{Element, StructuralKey};
///
/// let left = Element::from("thrift");
/// let right = Element::from(String::from("thrift"));
/// assert_eq!(left, right);
/// assert_eq!(left.structural_hash(), right.structural_hash());
/// ```
pub trait StructuralKey: Eq {
    /// Returns the structural hash of this value.
    fn structural_hash(&self) -> u64;
}

/// Final avalanche step (splitmix64), so the trie sees well-spread low bits.
#[inline]
pub(crate) const fn mix(mut hash: u64) -> u64 {
    hash ^= hash >> 30;
    hash = hash.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    hash ^= hash >> 27;
    hash = hash.wrapping_mul(0x94d0_49bb_1331_11eb);
    hash ^ (hash >> 31)
}

/// Hashes a scalar payload under a variant tag.
pub(crate) fn hash_scalar<T: Hash + ?Sized>(tag: u8, payload: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write_u8(tag);
    payload.hash(&mut hasher);
    mix(hasher.finish())
}

/// Order-sensitive combination of member hashes.
pub(crate) fn hash_ordered(hashes: impl Iterator<Item = u64>) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write_u8(TAG_LIST);
    let mut length = 0usize;
    for hash in hashes {
        hasher.write_u64(hash);
        length += 1;
    }
    hasher.write_usize(length);
    mix(hasher.finish())
}

/// Order-insensitive combination of member hashes.
///
/// Members are unique, so a wrapping sum of their mixed hashes is a
/// commutative and associative fingerprint of the multiset.
pub(crate) fn hash_unordered(hashes: impl Iterator<Item = u64>) -> u64 {
    let (sum, length) = hashes.fold((0u64, 0usize), |(sum, length), hash| {
        (sum.wrapping_add(mix(hash ^ 0x9e37_79b9_7f4a_7c15)), length + 1)
    });
    let mut hasher = FxHasher::default();
    hasher.write_u8(TAG_SET);
    hasher.write_usize(length);
    hasher.write_u64(sum);
    mix(hasher.finish())
}

/// Bit pattern used for float equality and hashing.
///
/// `-0.0` folds into `0.0` and every NaN into a single NaN, so equality on
/// floats is reflexive and agrees with the hash.
#[inline]
pub(crate) fn canonical_float_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_unordered_hash_ignores_order() {
        let forward = hash_unordered([1u64, 2, 3, 4].into_iter());
        let backward = hash_unordered([4u64, 3, 2, 1].into_iter());
        assert_eq!(forward, backward);
    }

    #[rstest]
    fn test_ordered_hash_depends_on_order() {
        let forward = hash_ordered([1u64, 2, 3].into_iter());
        let backward = hash_ordered([3u64, 2, 1].into_iter());
        assert_ne!(forward, backward);
    }

    #[rstest]
    fn test_empty_list_and_empty_set_hash_differently() {
        assert_ne!(
            hash_ordered(std::iter::empty()),
            hash_unordered(std::iter::empty())
        );
    }

    #[rstest]
    fn test_scalar_hash_is_deterministic() {
        assert_eq!(hash_scalar(TAG_INT, &42i64), hash_scalar(TAG_INT, &42i64));
        assert_ne!(hash_scalar(TAG_INT, &1i64), hash_scalar(TAG_BOOL, &true));
    }

    #[rstest]
    #[case(0.0, -0.0)]
    #[case(f64::NAN, -f64::NAN)]
    fn test_canonical_float_bits_fold(#[case] left: f64, #[case] right: f64) {
        assert_eq!(canonical_float_bits(left), canonical_float_bits(right));
    }
}
