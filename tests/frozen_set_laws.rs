//! Property-based tests for frozen set laws.
//!
//! These tests verify that typed frozen sets satisfy the algebraic
//! properties of native sets, and that equality and hashing agree.

use std::collections::HashSet;

use proptest::prelude::*;
use typed_frozenset::prelude::*;

set_type!(SetI32 => SetI32Shape: ScalarKind::I32);
set_type!(SetI32Lists => SetI32ListsShape: ElementType::sequence(ScalarKind::I32));

fn typed(values: &[i32]) -> SetI32 {
    SetI32::try_new(values.iter().copied()).unwrap()
}

fn native(values: &[i32]) -> HashSet<Element> {
    values.iter().copied().map(Element::from).collect()
}

// =============================================================================
// Commutativity Laws
// Description: &, | and ^ do not depend on operand order
// =============================================================================

proptest! {
    #[test]
    fn prop_commutative_operators(
        left in prop::collection::vec(any::<i32>(), 0..50),
        right in prop::collection::vec(any::<i32>(), 0..50)
    ) {
        let (x, y) = (typed(&left), typed(&right));

        prop_assert_eq!(&x & &y, &y & &x);
        prop_assert_eq!(&x | &y, &y | &x);
        prop_assert_eq!(&x ^ &y, &y ^ &x);
    }
}

// =============================================================================
// Native Agreement Law
// Description: Every operator gives the native result
// =============================================================================

proptest! {
    #[test]
    fn prop_operators_agree_with_native(
        left in prop::collection::vec(-20..20i32, 0..30),
        right in prop::collection::vec(-20..20i32, 0..30)
    ) {
        let (x, y) = (typed(&left), typed(&right));
        let (native_x, native_y) = (native(&left), native(&right));

        prop_assert_eq!(&x & &y, &native_x & &native_y);
        prop_assert_eq!(&x | &y, &native_x | &native_y);
        prop_assert_eq!(&x ^ &y, &native_x ^ &native_y);
        prop_assert_eq!(&x - &y, &native_x - &native_y);
        prop_assert_eq!(&y - &x, &native_y - &native_x);
    }
}

// =============================================================================
// Identity Laws
// Description: The empty set is the identity of | and ^, and absorbs &
// =============================================================================

proptest! {
    #[test]
    fn prop_empty_set_identities(elements in prop::collection::vec(any::<i32>(), 0..50)) {
        let set = typed(&elements);
        let empty = SetI32::new();

        prop_assert_eq!(&set | &empty, set.clone());
        prop_assert_eq!(&set ^ &empty, set.clone());
        prop_assert_eq!(&set - &empty, set.clone());
        prop_assert!((&set & &empty).is_empty());
        prop_assert!((&set ^ &set).is_empty());
    }
}

// =============================================================================
// Subset Order Laws
// Description: < is irreflexive, and every operand of | is a subset of it
// =============================================================================

proptest! {
    #[test]
    fn prop_subset_order(
        left in prop::collection::vec(any::<i32>(), 0..40),
        right in prop::collection::vec(any::<i32>(), 0..40)
    ) {
        let (x, y) = (typed(&left), typed(&right));
        let union = &x | &y;
        let intersection = &x & &y;

        prop_assert!(!(x < x.clone()));
        prop_assert!(x <= x.clone());
        prop_assert!(x <= union);
        prop_assert!(y <= union);
        prop_assert!(intersection <= x);
        prop_assert_eq!(x < y, y > x);
        prop_assert_eq!(x < y, x <= y && x != y);
    }
}

// =============================================================================
// Hash Consistency Law
// Description: Equal input multisets give equal sets with equal hashes
// =============================================================================

proptest! {
    #[test]
    fn prop_hash_ignores_order_and_duplicates(
        elements in prop::collection::vec(any::<i32>(), 0..50)
    ) {
        let mut shuffled = elements.clone();
        shuffled.reverse();
        shuffled.extend(elements.iter().copied());

        let (set, other) = (typed(&elements), typed(&shuffled));

        prop_assert_eq!(&set, &other);
        prop_assert_eq!(set.structural_hash(), other.structural_hash());
    }
}

proptest! {
    #[test]
    fn prop_nested_hash_ignores_order(
        lists in prop::collection::vec(prop::collection::vec(any::<i32>(), 0..5), 0..20)
    ) {
        let forward = SetI32Lists::try_new(lists.iter().map(|list| Value::list(list.iter().copied())))
            .unwrap();
        let backward = SetI32Lists::try_new(lists.iter().rev().map(|list| Value::list(list.iter().copied())))
            .unwrap();

        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(forward.structural_hash(), backward.structural_hash());
    }
}

// =============================================================================
// Membership Law
// Description: Every input value is a member, every member came from input
// =============================================================================

proptest! {
    #[test]
    fn prop_membership(
        elements in prop::collection::vec(any::<i32>(), 0..50),
        probe: i32
    ) {
        let set = typed(&elements);

        prop_assert!(elements.iter().all(|element| set.contains(&Element::from(*element))));
        prop_assert_eq!(set.contains_value(&Value::from(probe)), elements.contains(&probe));
        prop_assert_eq!(set.iter().count(), set.len());
    }
}
