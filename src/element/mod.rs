//! Accepted elements.
//!
//! An [`Element`] is a value that has passed validation against some
//! [`ElementType`]. Elements are immutable and cheap to clone: strings, byte
//! strings and composites share their storage through [`Arc`].
//!
//! Composite elements are [`FrozenList`] (ordered) and
//! [`FrozenSet`](crate::FrozenSet) (unordered). Both cache their structural
//! hash, so hashing a deeply nested element is O(1).

mod hashing;

pub use hashing::StructuralKey;
pub(crate) use hashing::{hash_ordered, hash_unordered};

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::descriptor::ElementType;
use crate::error::TypeValidationError;
use crate::frozen::FrozenSet;
use crate::validate::validate_value;
use crate::value::Value;

use hashing::{
    TAG_BINARY, TAG_BOOL, TAG_FLOAT, TAG_INT, TAG_STRING, canonical_float_bits, hash_scalar,
};

// =============================================================================
// Element Definition
// =============================================================================

/// A validated, immutable element.
///
/// Equality and hashing are structural (see [`StructuralKey`]), so elements
/// can live in a native [`HashSet`](std::collections::HashSet) and compare
/// against typed sets.
///
/// # Examples
///
/// ```rust
/// use typed_frozenset::Element;
///
/// assert_eq!(Element::from(7), Element::Int(7));
/// assert_ne!(Element::from(true), Element::Int(1));
/// ```
#[derive(Clone)]
pub enum Element {
    /// A boolean.
    Bool(bool),
    /// Any integer kind, widened to 64 bits.
    Int(i64),
    /// Any floating-point kind, widened to 64 bits.
    Float(f64),
    /// UTF-8 text.
    String(Arc<str>),
    /// Raw bytes.
    Binary(Arc<[u8]>),
    /// An ordered sequence.
    List(FrozenList),
    /// A nested set.
    Set(FrozenSet),
}

impl Element {
    /// Returns a short name for the variant, used in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Binary(_) => "binary",
            Self::List(_) => "list",
            Self::Set(_) => "set",
        }
    }

    /// Returns the integer payload, if any.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the list payload, if any.
    #[must_use]
    pub const fn as_list(&self) -> Option<&FrozenList> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    /// Returns the set payload, if any.
    #[must_use]
    pub const fn as_set(&self) -> Option<&FrozenSet> {
        match self {
            Self::Set(set) => Some(set),
            _ => None,
        }
    }
}

impl StructuralKey for Element {
    fn structural_hash(&self) -> u64 {
        match self {
            Self::Bool(value) => hash_scalar(TAG_BOOL, value),
            Self::Int(value) => hash_scalar(TAG_INT, value),
            Self::Float(value) => hash_scalar(TAG_FLOAT, &canonical_float_bits(*value)),
            Self::String(value) => hash_scalar(TAG_STRING, &**value),
            Self::Binary(value) => hash_scalar(TAG_BINARY, &**value),
            Self::List(list) => list.structural_hash(),
            Self::Set(set) => set.structural_hash(),
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::Float(left), Self::Float(right)) => {
                canonical_float_bits(*left) == canonical_float_bits(*right)
            }
            (Self::String(left), Self::String(right)) => left == right,
            (Self::Binary(left), Self::Binary(right)) => left == right,
            (Self::List(left), Self::List(right)) => left == right,
            (Self::Set(left), Self::Set(right)) => left == right,
            _ => false,
        }
    }
}

impl Eq for Element {}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Int(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value:?}"),
            Self::String(value) => write!(formatter, "{value:?}"),
            Self::Binary(value) => write!(formatter, "b{value:?}"),
            Self::List(list) => fmt::Debug::fmt(list, formatter),
            Self::Set(set) => fmt::Debug::fmt(set, formatter),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, formatter)
    }
}

impl From<bool> for Element {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_element_from_integer {
    ($($integer:ty),*) => {
        $(
            impl From<$integer> for Element {
                fn from(value: $integer) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_element_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Element {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Self::String(Arc::from(value))
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Self::String(Arc::from(value))
    }
}

impl From<FrozenList> for Element {
    fn from(list: FrozenList) -> Self {
        Self::List(list)
    }
}

impl From<FrozenSet> for Element {
    fn from(set: FrozenSet) -> Self {
        Self::Set(set)
    }
}

// =============================================================================
// FrozenList Definition
// =============================================================================

/// An immutable, ordered sequence of validated elements.
///
/// Two lists are equal when they hold equal elements in the same order; the
/// hash is order-sensitive and cached at construction.
///
/// # Examples
///
/// ```rust
/// use typed_frozenset::{Element, ElementType, FrozenList, ScalarKind};
///
/// let list = FrozenList::from_values(ElementType::Scalar(ScalarKind::I32), [1, 2, 3]).unwrap();
/// assert_eq!(list.len(), 3);
/// assert_eq!(list, vec![Element::Int(1), Element::Int(2), Element::Int(3)]);
/// ```
#[derive(Clone)]
pub struct FrozenList {
    element_type: Arc<ElementType>,
    items: Arc<[Element]>,
    hash: u64,
}

impl FrozenList {
    /// Validates `values` against `element_type` and freezes them in order.
    ///
    /// # Errors
    ///
    /// Returns [`TypeValidationError`] if any value does not conform.
    pub fn from_values<I>(
        element_type: impl Into<Arc<ElementType>>,
        values: I,
    ) -> Result<Self, TypeValidationError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let element_type = element_type.into();
        let items = values
            .into_iter()
            .map(|value| validate_value(&element_type, value.into()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_elements(element_type, items))
    }

    /// Freezes already-validated elements.
    pub(crate) fn from_elements(element_type: Arc<ElementType>, items: Vec<Element>) -> Self {
        let hash = hash_ordered(items.iter().map(StructuralKey::structural_hash));
        Self {
            element_type,
            items: Arc::from(items),
            hash,
        }
    }

    /// Returns the element type of this list.
    #[must_use]
    pub fn element_type(&self) -> &ElementType {
        &self.element_type
    }

    pub(crate) const fn element_type_shared(&self) -> &Arc<ElementType> {
        &self.element_type
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the list holds no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Element> {
        self.items.get(index)
    }

    /// Returns the elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Element] {
        &self.items
    }

    /// Returns an iterator over the elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.items.iter()
    }

    /// Copies the elements into a native vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Element> {
        self.items.to_vec()
    }
}

impl StructuralKey for FrozenList {
    #[inline]
    fn structural_hash(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for FrozenList {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
            || (self.hash == other.hash && self.items == other.items)
    }
}

impl Eq for FrozenList {}

impl PartialEq<[Element]> for FrozenList {
    fn eq(&self, other: &[Element]) -> bool {
        *self.items == *other
    }
}

impl PartialEq<Vec<Element>> for FrozenList {
    fn eq(&self, other: &Vec<Element>) -> bool {
        *self.items == **other
    }
}

impl PartialEq<FrozenList> for Vec<Element> {
    fn eq(&self, other: &FrozenList) -> bool {
        other == self
    }
}

impl Hash for FrozenList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl<'a> IntoIterator for &'a FrozenList {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<FrozenList> for Vec<Element> {
    fn from(list: FrozenList) -> Self {
        list.to_vec()
    }
}

impl fmt::Debug for FrozenList {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for Element {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::String(value) => serializer.serialize_str(value),
            Self::Binary(value) => serializer.serialize_bytes(value),
            Self::List(list) => serde::Serialize::serialize(list, serializer),
            Self::Set(set) => serde::Serialize::serialize(set, serializer),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FrozenList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}
