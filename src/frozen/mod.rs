//! Frozen set containers.
//!
//! This module provides the immutable set itself and the layers built on it:
//!
//! - [`FrozenSet`]: a deduplicated set of [`Element`](crate::Element)s tagged
//!   with its runtime element type
//! - [`TypedSet`]: a [`FrozenSet`] whose element type is fixed at compile time
//!   by a [`SetShape`]
//! - [`SetLike`]: the capability shared by frozen sets and native
//!   [`HashSet`](std::collections::HashSet)s, so algebra and comparisons work
//!   across both
//!
//! # Structural Sharing
//!
//! Storage is a hash array mapped trie whose nodes are shared through
//! reference counting. Cloning a set is O(1), and set algebra results share
//! the unchanged sub-tries of their left operand.
//!
//! # Example
//!
//! ```rust
//! use typed_frozenset::{ElementType, FrozenSet, ScalarKind};
//!
//! let i32_type = ElementType::Scalar(ScalarKind::I32);
//! let left = FrozenSet::from_values(i32_type.clone(), [1, 3, 4, 5]).unwrap();
//! let right = FrozenSet::from_values(i32_type.clone(), [1, 2, 4, 6]).unwrap();
//!
//! let both = left.intersection(&right).unwrap();
//! assert_eq!(both, FrozenSet::from_values(i32_type.clone(), [1, 4]).unwrap());
//! assert_eq!(both.element_type(), &i32_type);
//! ```

/// Reference-counted pointer shared by every trie node.
///
/// Always `Arc`, so sets can be sent across threads and nested inside each
/// other without a feature switch.
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

mod algebra;
mod set;
mod table;
mod typed;

pub use algebra::SetLike;
pub use set::{FrozenSet, FrozenSetIntoIterator, FrozenSetIterator};
pub use typed::{SetShape, TypedSet};
