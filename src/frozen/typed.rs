//! Frozen sets with a compile-time element type.
//!
//! A [`SetShape`] names one element type, and [`TypedSet<S>`] is a
//! [`FrozenSet`] that is guaranteed to hold that type. Because two different
//! shapes are two different Rust types, combining sets of different element
//! types does not compile, and every operator between two `TypedSet<S>`
//! values is infallible.
//!
//! Shapes are declared with [`set_type!`](crate::set_type), one per generated
//! container type.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{BitAnd, BitOr, BitXor, Sub};
use std::sync::Arc;

use crate::descriptor::ElementType;
use crate::element::{Element, StructuralKey};
use crate::error::TypeValidationError;
use crate::value::Value;

use super::algebra::{SetLike, are_disjoint, is_contained_in, same_elements, subset_ordering};
use super::set::{FrozenSet, FrozenSetIntoIterator, FrozenSetIterator};

// =============================================================================
// SetShape Definition
// =============================================================================

/// Compile-time description of a typed set's element type.
///
/// Implement this with [`set_type!`](crate::set_type) rather than by hand.
pub trait SetShape: 'static {
    /// Name of the container type, used by `Debug`.
    const NAME: &'static str;

    /// Returns the shared element type descriptor.
    fn element_type() -> &'static Arc<ElementType>;
}

// =============================================================================
// TypedSet Definition
// =============================================================================

/// A [`FrozenSet`] whose element type is fixed by `S`.
///
/// # Examples
///
/// ```rust
/// use typed_frozenset::{Element, ElementType, ScalarKind, set_type};
///
/// set_type!(pub SetI32 => SetI32Shape: ElementType::Scalar(ScalarKind::I32));
///
/// let x = SetI32::try_new([1, 3, 4, 5]).unwrap();
/// let y = SetI32::try_new([1, 2, 4, 6]).unwrap();
///
/// assert_eq!(&x & &y, SetI32::try_new([1, 4]).unwrap());
/// assert_eq!(&x - &y, SetI32::try_new([3, 5]).unwrap());
/// assert!(SetI32::try_new([1, 4]).unwrap() < x);
/// assert!(x.contains(&Element::Int(5)));
/// ```
pub struct TypedSet<S: SetShape> {
    set: FrozenSet,
    shape: PhantomData<fn() -> S>,
}

impl<S: SetShape> TypedSet<S> {
    const fn wrap(set: FrozenSet) -> Self {
        Self {
            set,
            shape: PhantomData,
        }
    }

    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::wrap(FrozenSet::empty(Arc::clone(S::element_type())))
    }

    /// Validates `values` against the shape's element type and freezes them.
    ///
    /// # Errors
    ///
    /// Returns [`TypeValidationError`] for the first value that does not
    /// conform.
    pub fn try_new<I>(values: I) -> Result<Self, TypeValidationError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        FrozenSet::build(
            Arc::clone(S::element_type()),
            values.into_iter().map(Into::into),
        )
        .map(Self::wrap)
    }

    /// Adopts a frozen set, re-validating it if its element type differs.
    ///
    /// # Errors
    ///
    /// Returns [`TypeValidationError`] if an element does not conform.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_frozenset::{ElementType, FrozenSet, ScalarKind, set_type};
    ///
    /// set_type!(SetI16 => SetI16Shape: ElementType::Scalar(ScalarKind::I16));
    ///
    /// let wide = FrozenSet::from_values(ElementType::Scalar(ScalarKind::I64), [1_i64, 2]).unwrap();
    /// assert_eq!(SetI16::try_from_frozen(wide).unwrap().len(), 2);
    ///
    /// let too_wide = FrozenSet::from_values(ElementType::Scalar(ScalarKind::I64), [1_i64 << 20]).unwrap();
    /// assert!(SetI16::try_from_frozen(too_wide).is_err());
    /// ```
    pub fn try_from_frozen(set: FrozenSet) -> Result<Self, TypeValidationError> {
        if ElementType::same_as(set.element_type_shared(), S::element_type()) {
            Ok(Self::wrap(set))
        } else {
            Self::try_new(set.iter())
        }
    }

    /// Returns the underlying frozen set.
    #[must_use]
    pub const fn as_frozen(&self) -> &FrozenSet {
        &self.set
    }

    /// Converts into the underlying frozen set.
    #[must_use]
    pub fn into_frozen(self) -> FrozenSet {
        self.set
    }

    /// Returns the element type of this set.
    #[must_use]
    pub fn element_type(&self) -> &ElementType {
        self.set.element_type()
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.set.len()
    }

    /// Returns `true` if the set holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Returns `true` if an element equal to `element` is stored.
    #[must_use]
    pub fn contains(&self, element: &Element) -> bool {
        self.set.contains(element)
    }

    /// Validates `value`, then tests membership; invalid probes are absent.
    #[must_use]
    pub fn contains_value(&self, value: &Value) -> bool {
        self.set.contains_value(value)
    }

    /// Returns the stored element equal to `element`.
    #[must_use]
    pub fn get(&self, element: &Element) -> Option<&Element> {
        self.set.get(element)
    }

    /// Returns an iterator over the elements.
    pub fn iter(&self) -> FrozenSetIterator<'_> {
        self.set.iter()
    }

    /// Copies the elements into a native set.
    #[must_use]
    pub fn to_native(&self) -> HashSet<Element> {
        self.set.to_native()
    }

    /// Returns `true` if every element of `self` is in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        is_contained_in(self, other)
    }

    /// Returns `true` if every element of `other` is in `self`.
    #[must_use]
    pub fn is_superset(&self, other: &Self) -> bool {
        is_contained_in(other, self)
    }

    /// Returns `true` if the sets share no element.
    #[must_use]
    pub fn is_disjoint(&self, other: &Self) -> bool {
        are_disjoint(self, other)
    }
}

impl<S: SetShape> SetLike for TypedSet<S> {
    fn element_count(&self) -> usize {
        self.len()
    }

    fn contains_element(&self, element: &Element) -> bool {
        self.contains(element)
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &Element> + '_> {
        Box::new(self.iter())
    }

    fn declared_element_type(&self) -> Option<&ElementType> {
        Some(self.element_type())
    }
}

// =============================================================================
// Operators
// =============================================================================

// Typed with typed: both sides share one element type.

impl<S: SetShape> BitAnd<&TypedSet<S>> for &TypedSet<S> {
    type Output = TypedSet<S>;

    fn bitand(self, other: &TypedSet<S>) -> TypedSet<S> {
        TypedSet::wrap(self.set.intersection_unchecked(other))
    }
}

impl<S: SetShape> BitOr<&TypedSet<S>> for &TypedSet<S> {
    type Output = TypedSet<S>;

    fn bitor(self, other: &TypedSet<S>) -> TypedSet<S> {
        TypedSet::wrap(self.set.union_trusted(other))
    }
}

impl<S: SetShape> BitXor<&TypedSet<S>> for &TypedSet<S> {
    type Output = TypedSet<S>;

    fn bitxor(self, other: &TypedSet<S>) -> TypedSet<S> {
        TypedSet::wrap(self.set.symmetric_difference_trusted(other))
    }
}

impl<S: SetShape> Sub<&TypedSet<S>> for &TypedSet<S> {
    type Output = TypedSet<S>;

    fn sub(self, other: &TypedSet<S>) -> TypedSet<S> {
        TypedSet::wrap(self.set.difference_unchecked(other))
    }
}

macro_rules! forward_typed_operator {
    ($($operator:ident :: $method:ident),*) => {
        $(
            impl<S: SetShape> $operator<TypedSet<S>> for TypedSet<S> {
                type Output = TypedSet<S>;

                fn $method(self, other: TypedSet<S>) -> TypedSet<S> {
                    (&self).$method(&other)
                }
            }

            impl<S: SetShape> $operator<&TypedSet<S>> for TypedSet<S> {
                type Output = TypedSet<S>;

                fn $method(self, other: &TypedSet<S>) -> TypedSet<S> {
                    (&self).$method(other)
                }
            }

            impl<S: SetShape> $operator<TypedSet<S>> for &TypedSet<S> {
                type Output = TypedSet<S>;

                fn $method(self, other: TypedSet<S>) -> TypedSet<S> {
                    self.$method(&other)
                }
            }
        )*
    };
}

forward_typed_operator!(BitAnd::bitand, BitOr::bitor, BitXor::bitxor, Sub::sub);

// Typed with native: native elements must be validated before they join.

impl<S: SetShape, H: BuildHasher> BitAnd<&HashSet<Element, H>> for &TypedSet<S> {
    type Output = TypedSet<S>;

    fn bitand(self, other: &HashSet<Element, H>) -> TypedSet<S> {
        TypedSet::wrap(self.set.intersection_unchecked(other))
    }
}

impl<S: SetShape, H: BuildHasher> Sub<&HashSet<Element, H>> for &TypedSet<S> {
    type Output = TypedSet<S>;

    fn sub(self, other: &HashSet<Element, H>) -> TypedSet<S> {
        TypedSet::wrap(self.set.difference_unchecked(other))
    }
}

impl<S: SetShape, H: BuildHasher> BitOr<&HashSet<Element, H>> for &TypedSet<S> {
    type Output = Result<TypedSet<S>, TypeValidationError>;

    fn bitor(self, other: &HashSet<Element, H>) -> Self::Output {
        self.set.union_validated(other).map(TypedSet::wrap)
    }
}

impl<S: SetShape, H: BuildHasher> BitXor<&HashSet<Element, H>> for &TypedSet<S> {
    type Output = Result<TypedSet<S>, TypeValidationError>;

    fn bitxor(self, other: &HashSet<Element, H>) -> Self::Output {
        self.set.symmetric_difference_validated(other).map(TypedSet::wrap)
    }
}

macro_rules! forward_typed_native_operator {
    ($($operator:ident :: $method:ident => $output:ty),*) => {
        $(
            impl<S: SetShape, H: BuildHasher> $operator<HashSet<Element, H>> for TypedSet<S> {
                type Output = $output;

                fn $method(self, other: HashSet<Element, H>) -> Self::Output {
                    (&self).$method(&other)
                }
            }
        )*
    };
}

forward_typed_native_operator!(
    BitAnd::bitand => TypedSet<S>,
    Sub::sub => TypedSet<S>,
    BitOr::bitor => Result<TypedSet<S>, TypeValidationError>,
    BitXor::bitxor => Result<TypedSet<S>, TypeValidationError>
);

// Native with typed: the result follows the native left operand.

impl<S: SetShape, H: BuildHasher + Default> BitAnd<&TypedSet<S>> for &HashSet<Element, H> {
    type Output = HashSet<Element, H>;

    fn bitand(self, other: &TypedSet<S>) -> HashSet<Element, H> {
        self.iter()
            .filter(|element| other.contains(element))
            .cloned()
            .collect()
    }
}

impl<S: SetShape, H: BuildHasher + Default> BitOr<&TypedSet<S>> for &HashSet<Element, H> {
    type Output = HashSet<Element, H>;

    fn bitor(self, other: &TypedSet<S>) -> HashSet<Element, H> {
        self.iter().chain(other.iter()).cloned().collect()
    }
}

impl<S: SetShape, H: BuildHasher + Default> BitXor<&TypedSet<S>> for &HashSet<Element, H> {
    type Output = HashSet<Element, H>;

    fn bitxor(self, other: &TypedSet<S>) -> HashSet<Element, H> {
        let own = self.iter().filter(|element| !other.contains(element));
        let theirs = other.iter().filter(|element| !self.contains(*element));
        own.chain(theirs).cloned().collect()
    }
}

impl<S: SetShape, H: BuildHasher + Default> Sub<&TypedSet<S>> for &HashSet<Element, H> {
    type Output = HashSet<Element, H>;

    fn sub(self, other: &TypedSet<S>) -> HashSet<Element, H> {
        self.iter()
            .filter(|element| !other.contains(element))
            .cloned()
            .collect()
    }
}

macro_rules! forward_native_typed_operator {
    ($($operator:ident :: $method:ident),*) => {
        $(
            impl<S: SetShape, H: BuildHasher + Default> $operator<TypedSet<S>> for HashSet<Element, H> {
                type Output = HashSet<Element, H>;

                fn $method(self, other: TypedSet<S>) -> HashSet<Element, H> {
                    (&self).$method(&other)
                }
            }
        )*
    };
}

forward_native_typed_operator!(BitAnd::bitand, BitOr::bitor, BitXor::bitxor, Sub::sub);

// =============================================================================
// Comparison Trait Implementations
// =============================================================================

impl<S: SetShape> PartialEq for TypedSet<S> {
    fn eq(&self, other: &Self) -> bool {
        self.set == other.set
    }
}

impl<S: SetShape> Eq for TypedSet<S> {}

impl<S: SetShape> PartialOrd for TypedSet<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        subset_ordering(self, other)
    }
}

impl<S: SetShape, H: BuildHasher> PartialEq<HashSet<Element, H>> for TypedSet<S> {
    fn eq(&self, other: &HashSet<Element, H>) -> bool {
        same_elements(self, other)
    }
}

impl<S: SetShape, H: BuildHasher> PartialEq<TypedSet<S>> for HashSet<Element, H> {
    fn eq(&self, other: &TypedSet<S>) -> bool {
        same_elements(self, other)
    }
}

impl<S: SetShape, H: BuildHasher> PartialOrd<HashSet<Element, H>> for TypedSet<S> {
    fn partial_cmp(&self, other: &HashSet<Element, H>) -> Option<Ordering> {
        subset_ordering(self, other)
    }
}

impl<S: SetShape, H: BuildHasher> PartialOrd<TypedSet<S>> for HashSet<Element, H> {
    fn partial_cmp(&self, other: &TypedSet<S>) -> Option<Ordering> {
        subset_ordering(self, other)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<S: SetShape> Clone for TypedSet<S> {
    fn clone(&self) -> Self {
        Self::wrap(self.set.clone())
    }
}

impl<S: SetShape> Default for TypedSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SetShape> StructuralKey for TypedSet<S> {
    #[inline]
    fn structural_hash(&self) -> u64 {
        self.set.structural_hash()
    }
}

impl<S: SetShape> Hash for TypedSet<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.set.hash(state);
    }
}

impl<'a, S: SetShape> IntoIterator for &'a TypedSet<S> {
    type Item = &'a Element;
    type IntoIter = FrozenSetIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: SetShape> IntoIterator for TypedSet<S> {
    type Item = Element;
    type IntoIter = FrozenSetIntoIterator;

    fn into_iter(self) -> Self::IntoIter {
        self.set.into_iter()
    }
}

impl<S: SetShape> From<TypedSet<S>> for FrozenSet {
    fn from(set: TypedSet<S>) -> Self {
        set.set
    }
}

impl<S: SetShape> From<TypedSet<S>> for Element {
    fn from(set: TypedSet<S>) -> Self {
        Self::Set(set.set)
    }
}

impl<S: SetShape> From<TypedSet<S>> for Value {
    fn from(set: TypedSet<S>) -> Self {
        Self::Element(Element::Set(set.set))
    }
}

impl<S: SetShape> From<TypedSet<S>> for HashSet<Element> {
    fn from(set: TypedSet<S>) -> Self {
        set.to_native()
    }
}

impl<S: SetShape> TryFrom<FrozenSet> for TypedSet<S> {
    type Error = TypeValidationError;

    fn try_from(set: FrozenSet) -> Result<Self, Self::Error> {
        Self::try_from_frozen(set)
    }
}

impl<S: SetShape> fmt::Debug for TypedSet<S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}(", S::NAME)?;
        fmt::Debug::fmt(&self.set, formatter)?;
        write!(formatter, ")")
    }
}

impl<S: SetShape> fmt::Display for TypedSet<S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.set, formatter)
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<S: SetShape> serde::Serialize for TypedSet<S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        serde::Serialize::serialize(&self.set, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, S: SetShape> serde::Deserialize<'de> for TypedSet<S> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let values = <Vec<Value> as serde::Deserialize>::deserialize(deserializer)?;
        Self::try_new(values).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Shape Declaration
// =============================================================================

/// Declares a typed set container for one element type.
///
/// `set_type!(pub Name => NameShape: element_type)` generates a zero-sized
/// shape type `NameShape` implementing [`SetShape`](crate::SetShape) and the
/// alias `type Name = TypedSet<NameShape>`. The element type expression is
/// evaluated once and shared by every instance.
///
/// # Examples
///
/// ```rust
/// use typed_frozenset::{ElementType, ScalarKind, Value, set_type};
///
/// set_type! {
///     /// `set<list<i32>>`
///     pub SetI32Lists => SetI32ListsShape: ElementType::sequence(ScalarKind::I32)
/// }
///
/// let set = SetI32Lists::try_new([Value::list([1, 2]), Value::list([1, 2])]).unwrap();
/// assert_eq!(set.len(), 1);
/// assert_eq!(format!("{set:?}"), "SetI32Lists({[1, 2]})");
/// ```
#[macro_export]
macro_rules! set_type {
    ($(#[$meta:meta])* $vis:vis $name:ident => $shape:ident : $element_type:expr $(,)?) => {
        #[doc = concat!("Element type marker of [`", stringify!($name), "`].")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $shape;

        impl $crate::SetShape for $shape {
            const NAME: &'static str = stringify!($name);

            fn element_type() -> &'static ::std::sync::Arc<$crate::ElementType> {
                static ELEMENT_TYPE: ::std::sync::OnceLock<::std::sync::Arc<$crate::ElementType>> =
                    ::std::sync::OnceLock::new();
                ELEMENT_TYPE.get_or_init(|| {
                    ::std::sync::Arc::new(::std::convert::Into::<$crate::ElementType>::into(
                        $element_type,
                    ))
                })
            }
        }

        $(#[$meta])*
        $vis type $name = $crate::TypedSet<$shape>;
    };
}
