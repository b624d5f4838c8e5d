//! # typed-frozenset
//!
//! Immutable, strictly-typed, hashable set containers for IDL-generated data
//! models (`set<i32>`, `set<list<i32>>`, `set<set<list<i32>>>`, ...).
//!
//! ## Overview
//!
//! - **Descriptors**: [`ElementType`] names the element type of a container,
//!   in IDL syntax (`"set<list<i32>>".parse()`)
//! - **Validation**: [`validate`] accepts a loosely-typed [`Value`] as an
//!   [`Element`] or rejects it with [`TypeValidationError`]
//! - **Frozen sets**: [`FrozenSet`] deduplicates validated elements into a
//!   persistent hash trie and caches its structural hash, so sets nest inside
//!   sets and work as map keys
//! - **Typed sets**: [`TypedSet`] fixes the element type at compile time; the
//!   [`set_type!`] macro declares one container type per descriptor
//! - **Interop**: set algebra and the subset order work between frozen sets
//!   and native [`HashSet<Element>`](std::collections::HashSet)s in both
//!   operand orders
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize` for elements and sets, `Deserialize` for [`Value`]
//!   and [`TypedSet`]
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashSet;
//! use typed_frozenset::prelude::*;
//!
//! set_type!(pub SetI32 => SetI32Shape: ElementType::Scalar(ScalarKind::I32));
//!
//! let x = SetI32::try_new([1, 2, 3, 4]).unwrap();
//! let y: HashSet<Element> = [1, 2, 3].into_iter().map(Element::from).collect();
//!
//! assert!(y < x);
//! assert_eq!(&y & &x, y);
//! assert_eq!((&x | &y).unwrap(), x);
//! assert!(SetI32::try_new([Value::from(1), Value::Null]).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use typed_frozenset::prelude::*;
/// ```
pub mod prelude {
    pub use crate::descriptor::{ElementType, ScalarKind};
    pub use crate::element::{Element, FrozenList, StructuralKey};
    pub use crate::error::{SetError, TypeValidationError};
    pub use crate::frozen::{FrozenSet, SetLike, SetShape, TypedSet};
    pub use crate::set_type;
    pub use crate::validate::validate;
    pub use crate::value::Value;
}

pub mod descriptor;
pub mod element;
pub mod error;
pub mod frozen;
pub mod validate;
pub mod value;

pub use descriptor::{ElementType, ScalarKind};
pub use element::{Element, FrozenList, StructuralKey};
pub use error::{DescriptorParseError, SetError, TypeValidationError};
pub use frozen::{FrozenSet, FrozenSetIntoIterator, FrozenSetIterator, SetLike, SetShape, TypedSet};
pub use validate::validate;
pub use value::Value;
