//! Element validation.
//!
//! [`validate`] decides whether a candidate [`Value`] conforms to an
//! [`ElementType`] and, if so, turns it into an immutable [`Element`].
//! Composite candidates are validated recursively; already-frozen composites
//! whose descriptor matches are accepted as-is and keep sharing their storage.

use std::sync::Arc;

use crate::descriptor::{ElementType, ScalarKind};
use crate::element::{Element, FrozenList};
use crate::error::TypeValidationError;
use crate::frozen::FrozenSet;
use crate::value::Value;

/// Validates a candidate value against an element type.
///
/// # Errors
///
/// Returns [`TypeValidationError`] when the value, or anything nested inside
/// it, is null, out of range, or of the wrong shape.
///
/// # Examples
///
/// ```rust
/// use typed_frozenset::{validate, Element, ElementType, ScalarKind, Value};
///
/// let i32_type = ElementType::Scalar(ScalarKind::I32);
/// assert_eq!(validate(&i32_type, 7), Ok(Element::Int(7)));
/// assert!(validate(&i32_type, Value::Null).is_err());
/// assert!(validate(&i32_type, 1_i64 << 40).is_err());
/// ```
pub fn validate(
    element_type: &ElementType,
    value: impl Into<Value>,
) -> Result<Element, TypeValidationError> {
    validate_value(element_type, value.into())
}

pub(crate) fn validate_value(
    element_type: &ElementType,
    value: Value,
) -> Result<Element, TypeValidationError> {
    match (element_type, value) {
        (_, Value::Null) => Err(TypeValidationError::Null {
            expected: element_type.clone(),
        }),
        (ElementType::Scalar(kind), value) => validate_scalar(*kind, value),
        (ElementType::Sequence(inner), Value::List(values)) => {
            freeze_list(inner, values.into_iter()).map(Element::List)
        }
        (ElementType::Sequence(inner), Value::Element(Element::List(list))) => {
            if ElementType::same_as(list.element_type_shared(), inner) {
                Ok(Element::List(list))
            } else {
                freeze_list(inner, list.iter().map(Value::from)).map(Element::List)
            }
        }
        (ElementType::Set(inner), Value::Set(values) | Value::List(values)) => {
            FrozenSet::build(Arc::clone(inner), values.into_iter()).map(Element::Set)
        }
        (ElementType::Set(inner), Value::Element(Element::Set(set))) => {
            if ElementType::same_as(set.element_type_shared(), inner) {
                Ok(Element::Set(set))
            } else {
                FrozenSet::build(Arc::clone(inner), set.iter().map(Value::from)).map(Element::Set)
            }
        }
        (expected, value) => Err(TypeValidationError::Mismatch {
            expected: expected.clone(),
            found: value.kind_name(),
        }),
    }
}

fn freeze_list(
    inner: &Arc<ElementType>,
    values: impl Iterator<Item = Value>,
) -> Result<FrozenList, TypeValidationError> {
    let items = values
        .map(|value| validate_value(inner, value))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FrozenList::from_elements(Arc::clone(inner), items))
}

fn validate_scalar(kind: ScalarKind, value: Value) -> Result<Element, TypeValidationError> {
    match kind {
        ScalarKind::Bool => match value {
            Value::Bool(flag) | Value::Element(Element::Bool(flag)) => Ok(Element::Bool(flag)),
            other => Err(mismatch(kind, &other)),
        },
        ScalarKind::Byte | ScalarKind::I16 | ScalarKind::I32 | ScalarKind::I64 => {
            let integer = match value {
                Value::Int(integer) => integer,
                Value::Element(Element::Int(integer)) => i128::from(integer),
                other => return Err(mismatch(kind, &other)),
            };
            narrow_integer(kind, integer)
        }
        ScalarKind::Float | ScalarKind::Double => {
            let number = match value {
                Value::Float(number) | Value::Element(Element::Float(number)) => number,
                Value::Int(integer) => integer_to_float(integer),
                Value::Element(Element::Int(integer)) => integer_to_float(i128::from(integer)),
                other => return Err(mismatch(kind, &other)),
            };
            if kind == ScalarKind::Float {
                narrow_float(number)
            } else {
                Ok(Element::Float(number))
            }
        }
        ScalarKind::String => match value {
            Value::String(text) => Ok(Element::String(Arc::from(text))),
            Value::Element(element @ Element::String(_)) => Ok(element),
            other => Err(mismatch(kind, &other)),
        },
        ScalarKind::Binary => match value {
            Value::Binary(bytes) => Ok(Element::Binary(Arc::from(bytes))),
            Value::Element(element @ Element::Binary(_)) => Ok(element),
            other => Err(mismatch(kind, &other)),
        },
    }
}

fn mismatch(kind: ScalarKind, value: &Value) -> TypeValidationError {
    TypeValidationError::Mismatch {
        expected: ElementType::Scalar(kind),
        found: value.kind_name(),
    }
}

fn narrow_integer(kind: ScalarKind, integer: i128) -> Result<Element, TypeValidationError> {
    let out_of_range = || TypeValidationError::OutOfRange {
        kind,
        value: integer.to_string(),
    };
    match kind.integer_range() {
        Some((minimum, maximum)) if (minimum..=maximum).contains(&integer) => i64::try_from(integer)
            .map(Element::Int)
            .map_err(|_| out_of_range()),
        _ => Err(out_of_range()),
    }
}

#[allow(clippy::cast_precision_loss)]
fn integer_to_float(integer: i128) -> f64 {
    integer as f64
}

/// Rounds to single precision; finite values beyond `f32::MAX` are rejected.
#[allow(clippy::cast_possible_truncation)]
fn narrow_float(number: f64) -> Result<Element, TypeValidationError> {
    let narrowed = number as f32;
    if number.is_finite() && narrowed.is_infinite() {
        Err(TypeValidationError::OutOfRange {
            kind: ScalarKind::Float,
            value: number.to_string(),
        })
    } else {
        Ok(Element::Float(f64::from(narrowed)))
    }
}
