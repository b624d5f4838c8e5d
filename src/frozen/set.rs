//! The dynamically-typed frozen set.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::descriptor::ElementType;
use crate::element::{Element, StructuralKey, hash_unordered};
use crate::error::TypeValidationError;
use crate::validate::validate_value;
use crate::value::Value;

use super::table::{ElementTable, TableIterator};

// =============================================================================
// FrozenSet Definition
// =============================================================================

/// An immutable, deduplicated set of validated elements.
///
/// Every stored element conforms to [`FrozenSet::element_type`], no two stored
/// elements are structurally equal, and the structural hash is computed once
/// at construction. A `FrozenSet` is itself a valid [`Element`], so sets can
/// nest.
///
/// Equality is content equality: two sets are equal when they hold equal
/// elements, independent of insertion order.
///
/// # Time Complexity
///
/// | Operation      | Complexity        |
/// |----------------|-------------------|
/// | `from_values`  | O(n log32 n)      |
/// | `contains`     | O(log32 n)        |
/// | `len`          | O(1)              |
/// | `clone`        | O(1)              |
/// | `hash`         | O(1)              |
///
/// # Examples
///
/// ```rust
/// use typed_frozenset::{Element, ElementType, FrozenSet, ScalarKind, Value};
///
/// let i32_type = ElementType::Scalar(ScalarKind::I32);
/// let set = FrozenSet::from_values(i32_type.clone(), [3, 1, 3, 2]).unwrap();
/// assert_eq!(set.len(), 3);
/// assert!(set.contains(&Element::Int(1)));
///
/// assert!(FrozenSet::from_values(i32_type, [Value::from(1), Value::Null]).is_err());
/// ```
#[derive(Clone)]
pub struct FrozenSet {
    element_type: Arc<ElementType>,
    table: ElementTable<Element>,
    hash: u64,
}

impl FrozenSet {
    /// Creates an empty set of the given element type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_frozenset::{ElementType, FrozenSet, ScalarKind};
    ///
    /// let set = FrozenSet::empty(ElementType::Scalar(ScalarKind::String));
    /// assert!(set.is_empty());
    /// ```
    #[must_use]
    pub fn empty(element_type: impl Into<Arc<ElementType>>) -> Self {
        Self::from_table(element_type.into(), ElementTable::new())
    }

    /// Validates `values` against `element_type` and freezes them.
    ///
    /// Duplicates collapse; the first occurrence is kept. Values that are
    /// already frozen containers of the matching element type are stored
    /// without being walked again.
    ///
    /// # Errors
    ///
    /// Returns [`TypeValidationError`] for the first value that does not
    /// conform. No set is produced in that case.
    pub fn from_values<I>(
        element_type: impl Into<Arc<ElementType>>,
        values: I,
    ) -> Result<Self, TypeValidationError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::build(element_type.into(), values.into_iter().map(Into::into))
    }

    pub(crate) fn build(
        element_type: Arc<ElementType>,
        mut values: impl Iterator<Item = Value>,
    ) -> Result<Self, TypeValidationError> {
        let table = values.try_fold(ElementTable::new(), |table, value| {
            validate_value(&element_type, value).map(|element| table.insert(element))
        });
        match table {
            Ok(table) => {
                let set = Self::from_table(element_type, table);
                tracing::trace!(element_type = %set.element_type, len = set.len(), "frozen set built");
                Ok(set)
            }
            Err(error) => {
                tracing::debug!(element_type = %element_type, %error, "frozen set rejected input");
                Err(error)
            }
        }
    }

    /// Freezes elements that are known to conform to `element_type`.
    pub(crate) fn from_trusted<'a>(
        element_type: Arc<ElementType>,
        elements: impl Iterator<Item = &'a Element>,
    ) -> Self {
        Self::from_table(element_type, elements.cloned().collect())
    }

    pub(crate) fn from_table(element_type: Arc<ElementType>, table: ElementTable<Element>) -> Self {
        let hash = hash_unordered(table.iter().map(StructuralKey::structural_hash));
        Self {
            element_type,
            table,
            hash,
        }
    }

    pub(crate) const fn table(&self) -> &ElementTable<Element> {
        &self.table
    }

    /// Returns the element type of this set.
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
    pub const fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Returns `true` if an element structurally equal to `element` is stored.
    #[must_use]
    pub fn contains(&self, element: &Element) -> bool {
        self.table.contains(element)
    }

    /// Validates `value` as an element of this set, then tests membership.
    ///
    /// A value that does not conform to the element type cannot be a member,
    /// so it is reported as absent rather than as an error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_frozenset::{ElementType, FrozenSet, ScalarKind, Value};
    ///
    /// let set = FrozenSet::from_values(ElementType::Scalar(ScalarKind::I32), [1, 2]).unwrap();
    /// assert!(set.contains_value(&Value::from(2)));
    /// assert!(!set.contains_value(&Value::from("2")));
    /// assert!(!set.contains_value(&Value::Null));
    /// ```
    #[must_use]
    pub fn contains_value(&self, value: &Value) -> bool {
        validate_value(&self.element_type, value.clone())
            .is_ok_and(|element| self.table.contains(&element))
    }

    /// Returns the stored element equal to `element`.
    #[must_use]
    pub fn get(&self, element: &Element) -> Option<&Element> {
        self.table.get(element)
    }

    /// Returns an iterator over the elements.
    ///
    /// The order is unspecified but stable for one set.
    pub fn iter(&self) -> FrozenSetIterator<'_> {
        FrozenSetIterator {
            inner: self.table.iter(),
        }
    }

    /// Copies the elements into a native set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::HashSet;
    /// use typed_frozenset::{Element, ElementType, FrozenSet, ScalarKind};
    ///
    /// let set = FrozenSet::from_values(ElementType::Scalar(ScalarKind::I32), [1, 2]).unwrap();
    /// let native: HashSet<Element> = set.to_native();
    /// assert_eq!(native, HashSet::from([Element::Int(1), Element::Int(2)]));
    /// ```
    #[must_use]
    pub fn to_native(&self) -> HashSet<Element> {
        self.iter().cloned().collect()
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over the elements of a [`FrozenSet`].
pub struct FrozenSetIterator<'a> {
    inner: TableIterator<'a, Element>,
}

impl<'a> Iterator for FrozenSetIterator<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for FrozenSetIterator<'_> {}

/// An owning iterator over the elements of a [`FrozenSet`].
pub struct FrozenSetIntoIterator {
    inner: std::vec::IntoIter<Element>,
}

impl Iterator for FrozenSetIntoIterator {
    type Item = Element;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for FrozenSetIntoIterator {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl StructuralKey for FrozenSet {
    #[inline]
    fn structural_hash(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for FrozenSet {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() || self.hash != other.hash {
            return false;
        }
        self.iter().all(|element| other.contains(element))
    }
}

impl Eq for FrozenSet {}

impl Hash for FrozenSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl<'a> IntoIterator for &'a FrozenSet {
    type Item = &'a Element;
    type IntoIter = FrozenSetIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for FrozenSet {
    type Item = Element;
    type IntoIter = FrozenSetIntoIterator;

    fn into_iter(self) -> Self::IntoIter {
        FrozenSetIntoIterator {
            inner: self.iter().cloned().collect::<Vec<_>>().into_iter(),
        }
    }
}

impl From<FrozenSet> for HashSet<Element> {
    fn from(set: FrozenSet) -> Self {
        set.to_native()
    }
}

impl fmt::Debug for FrozenSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for FrozenSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "}}")
    }
}

static_assertions::assert_impl_all!(FrozenSet: Send, Sync);
static_assertions::assert_impl_all!(Element: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for FrozenSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ScalarKind;
    use crate::element::FrozenList;
    use rstest::rstest;

    fn i32_type() -> ElementType {
        ElementType::Scalar(ScalarKind::I32)
    }

    fn int_set(values: &[i32]) -> FrozenSet {
        FrozenSet::from_values(i32_type(), values.iter().copied()).unwrap()
    }

    #[rstest]
    fn test_duplicates_collapse() {
        let set = int_set(&[1, 1, 2, 2, 2, 3]);
        assert_eq!(set.len(), 3);
        assert_eq!(set, int_set(&[3, 2, 1]));
    }

    #[rstest]
    fn test_insertion_order_does_not_affect_hash() {
        let forward = int_set(&(0..200).collect::<Vec<_>>());
        let backward = int_set(&(0..200).rev().collect::<Vec<_>>());
        assert_eq!(forward, backward);
        assert_eq!(forward.structural_hash(), backward.structural_hash());
    }

    #[rstest]
    fn test_empty_sets_are_equal_but_independent() {
        let first = FrozenSet::empty(i32_type());
        let second = FrozenSet::empty(i32_type());
        assert_eq!(first, second);
        assert_eq!(first.structural_hash(), second.structural_hash());
        assert_eq!(first.iter().count(), 0);
    }

    #[rstest]
    fn test_construction_is_all_or_nothing() {
        let result = FrozenSet::from_values(i32_type(), [Value::from(1), Value::from(2), Value::Null]);
        assert_eq!(
            result,
            Err(TypeValidationError::Null {
                expected: i32_type(),
            })
        );
    }

    #[rstest]
    fn test_contains_value_treats_invalid_probe_as_absent() {
        let set = int_set(&[1, 2, 3]);
        assert!(set.contains_value(&Value::from(3)));
        assert!(!set.contains_value(&Value::from(i64::MAX)));
        assert!(!set.contains_value(&Value::from(true)));
    }

    #[rstest]
    fn test_get_returns_stored_representative() {
        let list_type = ElementType::sequence(i32_type());
        let list = FrozenList::from_values(i32_type(), [1, 2]).unwrap();
        let set = FrozenSet::from_values(list_type, [Value::from(list.clone())]).unwrap();
        let probe = Element::List(FrozenList::from_values(i32_type(), [1, 2]).unwrap());
        let stored = set.get(&probe).and_then(Element::as_list).unwrap();
        assert!(std::ptr::eq(stored.as_slice().as_ptr(), list.as_slice().as_ptr()));
    }

    #[rstest]
    fn test_sets_nest_and_hash_structurally() {
        let set_type = ElementType::set(i32_type());
        let outer = FrozenSet::from_values(
            set_type.clone(),
            [Value::set([1, 2]), Value::set([2, 1]), Value::set([3])],
        )
        .unwrap();
        assert_eq!(outer.len(), 2);
        assert!(outer.contains(&Element::Set(int_set(&[1, 2]))));
        for element in &outer {
            assert_eq!(element.structural_hash(), element.clone().structural_hash());
        }
    }

    #[rstest]
    fn test_iteration_is_exact_and_restartable() {
        let set = int_set(&[5, 6, 7]);
        assert_eq!(set.iter().len(), 3);
        let first: Vec<_> = set.iter().cloned().collect();
        let second: Vec<_> = set.clone().into_iter().collect();
        assert_eq!(first, second);
    }

    #[rstest]
    fn test_to_native_round_trips_membership() {
        let set = int_set(&[4, 8]);
        let native = HashSet::from(set.clone());
        assert_eq!(native.len(), 2);
        assert!(native.iter().all(|element| set.contains(element)));
    }

    #[rstest]
    fn test_display_and_debug() {
        let set = int_set(&[7]);
        assert_eq!(set.to_string(), "{7}");
        assert_eq!(format!("{set:?}"), "{7}");
        assert_eq!(FrozenSet::empty(i32_type()).to_string(), "{}");
    }
}
