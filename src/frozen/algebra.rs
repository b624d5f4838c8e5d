//! Set algebra and the subset order.
//!
//! Every operation here is written against [`SetLike`], so a frozen set can be
//! combined with, or compared to, another frozen set, a typed set, or a
//! native [`HashSet`] through the same code path.
//!
//! Results always carry the left operand's element type. Elements the left
//! operand already holds are reused as stored; elements contributed by an
//! operand without a declared element type are validated first.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::convert::Infallible;
use std::hash::BuildHasher;

use crate::descriptor::ElementType;
use crate::element::Element;
use crate::error::{SetError, TypeValidationError};
use crate::validate::validate_value;
use crate::value::Value;

use super::set::FrozenSet;
use super::table::ElementTable;

// =============================================================================
// SetLike Definition
// =============================================================================

/// Read-only set capability shared by frozen and native sets.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashSet;
/// use typed_frozenset::{Element, SetLike};
///
/// fn count_shared(left: &dyn SetLike, right: &dyn SetLike) -> usize {
///     left.elements().filter(|element| right.contains_element(element)).count()
/// }
///
/// let left = HashSet::from([Element::Int(1), Element::Int(2)]);
/// let right = HashSet::from([Element::Int(2), Element::Int(3)]);
/// assert_eq!(count_shared(&left, &right), 1);
/// ```
pub trait SetLike {
    /// Returns the number of elements.
    fn element_count(&self) -> usize;

    /// Returns `true` if an element equal to `element` is present.
    fn contains_element(&self, element: &Element) -> bool;

    /// Returns an iterator over the elements.
    fn elements(&self) -> Box<dyn Iterator<Item = &Element> + '_>;

    /// Returns the declared element type, or `None` for native collections.
    fn declared_element_type(&self) -> Option<&ElementType> {
        None
    }
}

impl<H: BuildHasher> SetLike for HashSet<Element, H> {
    fn element_count(&self) -> usize {
        self.len()
    }

    fn contains_element(&self, element: &Element) -> bool {
        self.contains(element)
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &Element> + '_> {
        Box::new(self.iter())
    }
}

impl SetLike for FrozenSet {
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
// Relations
// =============================================================================

/// Returns `true` if every element of `inner` is present in `outer`.
pub(crate) fn is_contained_in<I, O>(inner: &I, outer: &O) -> bool
where
    I: SetLike + ?Sized,
    O: SetLike + ?Sized,
{
    inner.element_count() <= outer.element_count()
        && inner.elements().all(|element| outer.contains_element(element))
}

/// Returns `true` if the two sets share no element.
pub(crate) fn are_disjoint<L, R>(left: &L, right: &R) -> bool
where
    L: SetLike + ?Sized,
    R: SetLike + ?Sized,
{
    if left.element_count() <= right.element_count() {
        !left.elements().any(|element| right.contains_element(element))
    } else {
        !right.elements().any(|element| left.contains_element(element))
    }
}

/// Content equality between any two sets.
pub(crate) fn same_elements<L, R>(left: &L, right: &R) -> bool
where
    L: SetLike + ?Sized,
    R: SetLike + ?Sized,
{
    left.element_count() == right.element_count() && is_contained_in(left, right)
}

/// The subset partial order.
///
/// `Less` means a proper subset, `Greater` a proper superset, and `None`
/// that neither contains the other.
pub(crate) fn subset_ordering<L, R>(left: &L, right: &R) -> Option<Ordering>
where
    L: SetLike + ?Sized,
    R: SetLike + ?Sized,
{
    match left.element_count().cmp(&right.element_count()) {
        Ordering::Less => is_contained_in(left, right).then_some(Ordering::Less),
        Ordering::Equal => is_contained_in(left, right).then_some(Ordering::Equal),
        Ordering::Greater => is_contained_in(right, left).then_some(Ordering::Greater),
    }
}

// =============================================================================
// Checked Operations
// =============================================================================

impl FrozenSet {
    /// Returns `true` when `other` may contribute elements without validation.
    fn check_operand<O: SetLike + ?Sized>(&self, other: &O) -> Result<bool, SetError> {
        match other.declared_element_type() {
            None => Ok(false),
            Some(right) if right == self.element_type() => Ok(true),
            Some(right) => Err(SetError::DescriptorMismatch {
                left: self.element_type().clone(),
                right: right.clone(),
            }),
        }
    }

    fn admit(&self, element: &Element, trusted: bool) -> Result<Element, TypeValidationError> {
        if trusted {
            Ok(element.clone())
        } else {
            validate_value(self.element_type(), Value::from(element))
        }
    }

    /// Returns the elements present in both sets.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::DescriptorMismatch`] if `other` declares a
    /// different element type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::HashSet;
    /// use typed_frozenset::{Element, ElementType, FrozenSet, ScalarKind};
    ///
    /// let set = FrozenSet::from_values(ElementType::Scalar(ScalarKind::I32), [1, 2, 3]).unwrap();
    /// let native = HashSet::from([Element::Int(2), Element::from("two")]);
    ///
    /// let shared = set.intersection(&native).unwrap();
    /// assert_eq!(shared.len(), 1);
    /// assert!(shared.contains(&Element::Int(2)));
    /// ```
    pub fn intersection<O: SetLike + ?Sized>(&self, other: &O) -> Result<Self, SetError> {
        self.check_operand(other)?;
        Ok(self.intersection_unchecked(other))
    }

    /// Returns the elements present in either set.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::DescriptorMismatch`] if `other` declares a
    /// different element type, or [`SetError::Validation`] if an element
    /// contributed by a native `other` does not conform.
    pub fn union<O: SetLike + ?Sized>(&self, other: &O) -> Result<Self, SetError> {
        let trusted = self.check_operand(other)?;
        Ok(self.union_with(other, |element| self.admit(element, trusted))?)
    }

    /// Returns the elements of `self` that are not in `other`.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::DescriptorMismatch`] if `other` declares a
    /// different element type.
    pub fn difference<O: SetLike + ?Sized>(&self, other: &O) -> Result<Self, SetError> {
        self.check_operand(other)?;
        Ok(self.difference_unchecked(other))
    }

    /// Returns the elements present in exactly one of the sets.
    ///
    /// # Errors
    ///
    /// Same as [`FrozenSet::union`].
    pub fn symmetric_difference<O: SetLike + ?Sized>(&self, other: &O) -> Result<Self, SetError> {
        let trusted = self.check_operand(other)?;
        Ok(self.symmetric_difference_with(other, |element| self.admit(element, trusted))?)
    }

    /// Returns `true` if every element of `self` is in `other`.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::DescriptorMismatch`] if `other` declares a
    /// different element type.
    pub fn is_subset<O: SetLike + ?Sized>(&self, other: &O) -> Result<bool, SetError> {
        self.check_operand(other)?;
        Ok(is_contained_in(self, other))
    }

    /// Returns `true` if `self` is a subset of `other` and not equal to it.
    ///
    /// # Errors
    ///
    /// Same as [`FrozenSet::is_subset`].
    pub fn is_strict_subset<O: SetLike + ?Sized>(&self, other: &O) -> Result<bool, SetError> {
        self.check_operand(other)?;
        Ok(subset_ordering(self, other) == Some(Ordering::Less))
    }

    /// Returns `true` if every element of `other` is in `self`.
    ///
    /// # Errors
    ///
    /// Same as [`FrozenSet::is_subset`].
    pub fn is_superset<O: SetLike + ?Sized>(&self, other: &O) -> Result<bool, SetError> {
        self.check_operand(other)?;
        Ok(is_contained_in(other, self))
    }

    /// Returns `true` if `self` is a superset of `other` and not equal to it.
    ///
    /// # Errors
    ///
    /// Same as [`FrozenSet::is_subset`].
    pub fn is_strict_superset<O: SetLike + ?Sized>(&self, other: &O) -> Result<bool, SetError> {
        self.check_operand(other)?;
        Ok(subset_ordering(self, other) == Some(Ordering::Greater))
    }

    /// Returns `true` if the sets share no element.
    ///
    /// # Errors
    ///
    /// Same as [`FrozenSet::is_subset`].
    pub fn is_disjoint<O: SetLike + ?Sized>(&self, other: &O) -> Result<bool, SetError> {
        self.check_operand(other)?;
        Ok(are_disjoint(self, other))
    }
}

// =============================================================================
// Unchecked Operations
// =============================================================================

impl FrozenSet {
    /// Iterates the smaller operand; stored representatives come from `self`.
    pub(crate) fn intersection_unchecked<O: SetLike + ?Sized>(&self, other: &O) -> Self {
        let table = if self.len() <= other.element_count() {
            self.iter()
                .filter(|element| other.contains_element(element))
                .cloned()
                .collect()
        } else {
            other
                .elements()
                .filter_map(|element| self.get(element))
                .cloned()
                .collect()
        };
        Self::from_table(self.element_type_shared().clone(), table)
    }

    pub(crate) fn difference_unchecked<O: SetLike + ?Sized>(&self, other: &O) -> Self {
        Self::from_trusted(
            self.element_type_shared().clone(),
            self.iter().filter(|element| !other.contains_element(element)),
        )
    }

    pub(crate) fn union_with<O, F, E>(&self, other: &O, mut admit: F) -> Result<Self, E>
    where
        O: SetLike + ?Sized,
        F: FnMut(&Element) -> Result<Element, E>,
    {
        let mut table = self.table().clone();
        for element in other.elements() {
            if !self.contains(element) {
                table = table.insert(admit(element)?);
            }
        }
        Ok(Self::from_table(self.element_type_shared().clone(), table))
    }

    pub(crate) fn symmetric_difference_with<O, F, E>(
        &self,
        other: &O,
        mut admit: F,
    ) -> Result<Self, E>
    where
        O: SetLike + ?Sized,
        F: FnMut(&Element) -> Result<Element, E>,
    {
        let mut table: ElementTable<Element> = self
            .iter()
            .filter(|element| !other.contains_element(element))
            .cloned()
            .collect();
        for element in other.elements() {
            if !self.contains(element) {
                table = table.insert(admit(element)?);
            }
        }
        Ok(Self::from_table(self.element_type_shared().clone(), table))
    }

    /// Union with an operand of the same element type.
    pub(crate) fn union_trusted<O: SetLike + ?Sized>(&self, other: &O) -> Self {
        self.union_with(other, |element| Ok::<_, Infallible>(element.clone()))
            .unwrap_or_else(|never| match never {})
    }

    /// Symmetric difference with an operand of the same element type.
    pub(crate) fn symmetric_difference_trusted<O: SetLike + ?Sized>(&self, other: &O) -> Self {
        self.symmetric_difference_with(other, |element| Ok::<_, Infallible>(element.clone()))
            .unwrap_or_else(|never| match never {})
    }

    /// Union with a native operand whose elements are validated first.
    pub(crate) fn union_validated<O: SetLike + ?Sized>(
        &self,
        other: &O,
    ) -> Result<Self, TypeValidationError> {
        self.union_with(other, |element| self.admit(element, false))
    }

    pub(crate) fn symmetric_difference_validated<O: SetLike + ?Sized>(
        &self,
        other: &O,
    ) -> Result<Self, TypeValidationError> {
        self.symmetric_difference_with(other, |element| self.admit(element, false))
    }
}

// =============================================================================
// Comparison Trait Implementations
// =============================================================================

impl PartialOrd for FrozenSet {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        subset_ordering(self, other)
    }
}

impl<H: BuildHasher> PartialEq<HashSet<Element, H>> for FrozenSet {
    fn eq(&self, other: &HashSet<Element, H>) -> bool {
        same_elements(self, other)
    }
}

impl<H: BuildHasher> PartialEq<FrozenSet> for HashSet<Element, H> {
    fn eq(&self, other: &FrozenSet) -> bool {
        same_elements(self, other)
    }
}

impl<H: BuildHasher> PartialOrd<HashSet<Element, H>> for FrozenSet {
    fn partial_cmp(&self, other: &HashSet<Element, H>) -> Option<Ordering> {
        subset_ordering(self, other)
    }
}

impl<H: BuildHasher> PartialOrd<FrozenSet> for HashSet<Element, H> {
    fn partial_cmp(&self, other: &FrozenSet) -> Option<Ordering> {
        subset_ordering(self, other)
    }
}
