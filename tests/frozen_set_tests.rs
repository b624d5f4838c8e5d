//! Integration tests for typed frozen sets.
//!
//! Every operator and comparison is checked against the result a native
//! `HashSet<Element>` gives for the same operands.

use std::collections::{HashMap, HashSet};
use std::hash::{DefaultHasher, Hash, Hasher};

use rstest::{fixture, rstest};
use typed_frozenset::prelude::*;

set_type!(SetI32 => SetI32Shape: ScalarKind::I32);
set_type!(SetI32Lists => SetI32ListsShape: ElementType::sequence(ScalarKind::I32));
set_type!(SetSetI32Lists => SetSetI32ListsShape: ElementType::set(ElementType::sequence(ScalarKind::I32)));

fn native(set: &SetI32) -> HashSet<Element> {
    set.to_native()
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[fixture]
fn disjointish() -> (SetI32, SetI32) {
    (
        SetI32::try_new([1, 3, 4, 5]).unwrap(),
        SetI32::try_new([1, 2, 4, 6]).unwrap(),
    )
}

// =============================================================================
// Set Algebra
// =============================================================================

#[rstest]
fn test_and(disjointish: (SetI32, SetI32)) {
    let (x, y) = disjointish;
    assert_eq!(&x & &y, &native(&x) & &native(&y));
    assert_eq!(&y & &x, &native(&y) & &native(&x));
    assert_eq!(&x & &y, SetI32::try_new([1, 4]).unwrap());
}

#[rstest]
fn test_or(disjointish: (SetI32, SetI32)) {
    let (x, y) = disjointish;
    assert_eq!(&x | &y, &native(&x) | &native(&y));
    assert_eq!(&y | &x, &native(&y) | &native(&x));
    assert_eq!(&x | &y, SetI32::try_new([1, 2, 3, 4, 5, 6]).unwrap());
}

#[rstest]
fn test_xor(disjointish: (SetI32, SetI32)) {
    let (x, y) = disjointish;
    assert_eq!(&x ^ &y, &native(&x) ^ &native(&y));
    assert_eq!(&y ^ &x, &native(&y) ^ &native(&x));
    assert_eq!(&x ^ &y, SetI32::try_new([2, 3, 5, 6]).unwrap());
}

#[rstest]
fn test_sub(disjointish: (SetI32, SetI32)) {
    let (x, y) = disjointish;
    assert_eq!(&x - &y, &native(&x) - &native(&y));
    assert_eq!(&y - &x, &native(&y) - &native(&x));
    assert_eq!(&x - &y, SetI32::try_new([3, 5]).unwrap());
    assert_eq!(&y - &x, SetI32::try_new([2, 6]).unwrap());
}

#[rstest]
fn test_mixed_operand_orders_agree(disjointish: (SetI32, SetI32)) {
    let (x, y) = disjointish;
    let native_y = native(&y);
    assert_eq!(&x & &native_y, &native(&x) & &y);
    assert_eq!((&x | &native_y).unwrap(), &native(&x) | &y);
    assert_eq!((&x ^ &native_y).unwrap(), &native(&x) ^ &y);
    assert_eq!(&x - &native_y, &native(&x) - &y);
}

// =============================================================================
// Comparisons
// =============================================================================

fn eq(t: &SetI32, s: &SetI32) -> [bool; 4] {
    [t == s, native(t) == *s, *t == native(s), native(t) == native(s)]
}

fn neq(t: &SetI32, s: &SetI32) -> [bool; 4] {
    [t != s, native(t) != *s, *t != native(s), native(t) != native(s)]
}

fn lt(t: &SetI32, s: &SetI32) -> [bool; 4] {
    [
        t < s,
        native(t) < *s,
        *t < native(s),
        native(t).is_subset(&native(s)) && native(t) != native(s),
    ]
}

fn gt(t: &SetI32, s: &SetI32) -> [bool; 4] {
    [
        t > s,
        native(t) > *s,
        *t > native(s),
        native(t).is_superset(&native(s)) && native(t) != native(s),
    ]
}

fn le(t: &SetI32, s: &SetI32) -> [bool; 4] {
    [
        t <= s,
        native(t) <= *s,
        *t <= native(s),
        native(t).is_subset(&native(s)),
    ]
}

fn ge(t: &SetI32, s: &SetI32) -> [bool; 4] {
    [
        t >= s,
        native(t) >= *s,
        *t >= native(s),
        native(t).is_superset(&native(s)),
    ]
}

fn all(results: [bool; 4]) -> bool {
    results.iter().all(|result| *result)
}

fn any(results: [bool; 4]) -> bool {
    results.iter().any(|result| *result)
}

#[rstest]
fn test_comparisons() {
    let x = SetI32::try_new([1, 2, 3, 4]).unwrap();
    let y = SetI32::try_new([1, 2, 3]).unwrap();
    let x2 = x.clone();

    assert!(all(eq(&x, &x2)));
    assert!(all(neq(&x, &y)));
    assert!(!any(eq(&x, &y)));
    assert!(!any(neq(&x, &x2)));

    assert!(all(lt(&y, &x)));
    assert!(!any(lt(&x, &y)));
    assert!(!any(lt(&x, &x2)));

    assert!(all(gt(&x, &y)));
    assert!(!any(gt(&y, &x)));
    assert!(!any(gt(&x, &x2)));

    assert!(all(le(&y, &x)));
    assert!(!any(le(&x, &y)));
    assert!(all(le(&x, &x2)));

    assert!(all(ge(&x, &y)));
    assert!(!any(ge(&y, &x)));
    assert!(all(ge(&x, &x2)));
}

#[rstest]
fn test_incomparable_sets() {
    let x = SetI32::try_new([1, 2]).unwrap();
    let y = SetI32::try_new([2, 3]).unwrap();
    assert_eq!(x.partial_cmp(&y), None);
    assert!(!any(lt(&x, &y)));
    assert!(!any(ge(&x, &y)));
}

// =============================================================================
// Construction
// =============================================================================

#[rstest]
fn test_none() {
    assert!(SetI32Lists::try_new([Value::Null]).is_err());
    assert!(SetSetI32Lists::try_new([Value::set([Value::Null])]).is_err());
    assert!(SetI32Lists::try_new([Value::list([Some(1), None])]).is_err());
}

#[rstest]
fn test_empty() {
    assert!(SetI32Lists::try_new(Vec::<Value>::new()).unwrap().is_empty());
    assert_eq!(SetI32Lists::try_new([Value::list(Vec::<i32>::new())]).unwrap().len(), 1);
    assert!(SetSetI32Lists::try_new(Vec::<Value>::new()).unwrap().is_empty());
    assert_eq!(SetSetI32Lists::try_new([SetI32Lists::new()]).unwrap().len(), 1);
    let nested_empty_list = SetI32Lists::try_new([Value::list(Vec::<i32>::new())]).unwrap();
    assert_eq!(SetSetI32Lists::try_new([nested_empty_list]).unwrap().len(), 1);
}

#[rstest]
fn test_mixed_construction() {
    let x = SetI32Lists::try_new([Value::list([0, 1, 2]), Value::list([3, 4, 5])]).unwrap();
    let z = SetSetI32Lists::try_new([x.clone()]).unwrap();

    let mut pz = z.to_native();
    pz.insert(Element::from(x));
    let nx = Value::set([Value::list([9, 10, 11])]);
    pz.insert(Element::from(SetI32Lists::try_new([Value::list([9, 10, 11])]).unwrap()));

    let cz = SetSetI32Lists::try_new(&pz).unwrap();
    assert_eq!(cz.len(), 2);
    assert!(cz.contains_value(&nx));

    pz.insert(Element::from(5));
    assert_eq!(
        SetSetI32Lists::try_new(&pz),
        Err(TypeValidationError::Mismatch {
            expected: ElementType::set(ElementType::sequence(ScalarKind::I32)),
            found: "integer",
        })
    );
}

#[rstest]
fn test_duplicate_inputs_collapse() {
    let set = SetI32Lists::try_new([Value::list([1, 2]), Value::list([1, 2]), Value::list([2, 1])]).unwrap();
    assert_eq!(set.len(), 2);
}

#[rstest]
#[case(i64::from(i32::MAX), true)]
#[case(i64::from(i32::MAX) + 1, false)]
#[case(i64::from(i32::MIN) - 1, false)]
fn test_range_is_enforced(#[case] value: i64, #[case] accepted: bool) {
    assert_eq!(SetI32::try_new([value]).is_ok(), accepted);
}

#[rstest]
fn test_try_from_frozen_shares_matching_descriptor() {
    let frozen = FrozenSet::from_values(ElementType::Scalar(ScalarKind::I32), [1, 2]).unwrap();
    let typed = SetI32::try_from_frozen(frozen.clone()).unwrap();
    assert_eq!(typed.as_frozen(), &frozen);
}

// =============================================================================
// Hashability
// =============================================================================

#[rstest]
fn test_hashability() {
    hash_of(&SetI32Lists::new());
    let z = SetSetI32Lists::try_new([SetI32Lists::try_new([Value::list([1, 2, 3])]).unwrap()]).unwrap();
    hash_of(&z);
    for sub_set in &z {
        hash_of(sub_set);
    }
}

#[rstest]
fn test_equal_sets_hash_equal_regardless_of_order() {
    let forward = SetI32::try_new(0..100).unwrap();
    let backward = SetI32::try_new((0..100).rev()).unwrap();
    assert_eq!(forward, backward);
    assert_eq!(hash_of(&forward), hash_of(&backward));
}

#[rstest]
fn test_sets_work_as_map_keys() {
    let mut counts: HashMap<SetI32, u32> = HashMap::new();
    *counts.entry(SetI32::try_new([1, 2]).unwrap()).or_default() += 1;
    *counts.entry(SetI32::try_new([2, 1]).unwrap()).or_default() += 1;
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[&SetI32::try_new([1, 2]).unwrap()], 2);
}

// =============================================================================
// Dynamic Sets
// =============================================================================

#[rstest]
fn test_dynamic_descriptor_mismatch() {
    let ints = FrozenSet::from_values(ElementType::Scalar(ScalarKind::I32), [1]).unwrap();
    let strings = FrozenSet::from_values(ElementType::Scalar(ScalarKind::String), ["1"]).unwrap();
    assert!(matches!(
        ints.union(&strings),
        Err(SetError::DescriptorMismatch { .. })
    ));
    assert!(matches!(
        ints.is_disjoint(&strings),
        Err(SetError::DescriptorMismatch { .. })
    ));
}

#[rstest]
fn test_dynamic_set_with_typed_operand() {
    let frozen = FrozenSet::from_values(ElementType::Scalar(ScalarKind::I32), [1, 2]).unwrap();
    let typed = SetI32::try_new([2, 3]).unwrap();
    assert_eq!(
        frozen.union(&typed).unwrap(),
        FrozenSet::from_values(ElementType::Scalar(ScalarKind::I32), [1, 2, 3]).unwrap()
    );
    assert_eq!(frozen.is_strict_superset(&typed), Ok(false));
}
