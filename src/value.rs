//! Untyped candidate values.
//!
//! [`Value`] is the loosely-typed input to construction: the shape a caller
//! (or a deserializer) hands over before validation has decided whether it
//! conforms to a descriptor. It can express everything a native data model
//! can, including nulls, so that validation has something to reject.

use crate::element::{Element, FrozenList};
use crate::frozen::FrozenSet;

/// An unvalidated value.
///
/// # Examples
///
/// ```rust
/// use typed_frozenset::Value;
///
/// let tuple = Value::list([0, 1, 2]);
/// let literal = Value::set([Value::list([1, 2]), Value::list([3, 4])]);
/// let missing = Value::from(None::<i32>);
///
/// assert_eq!(tuple.kind_name(), "list");
/// assert_eq!(literal.kind_name(), "set");
/// assert!(missing.is_null());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absent value.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer of unbounded kind; validation narrows it.
    Int(i128),
    /// A floating-point number.
    Float(f64),
    /// UTF-8 text.
    String(String),
    /// Raw bytes.
    Binary(Vec<u8>),
    /// An ordered sequence.
    List(Vec<Self>),
    /// An unordered collection; duplicates are allowed and collapse on validation.
    Set(Vec<Self>),
    /// An element that has already been validated.
    Element(Element),
}

impl Value {
    /// Builds an ordered sequence value.
    pub fn list<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Self>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    /// Builds an unordered collection value.
    pub fn set<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Self>,
    {
        Self::Set(values.into_iter().map(Into::into).collect())
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns a short name for the variant, used in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Binary(_) => "binary",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Element(element) => element.kind_name(),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_value_from_integer {
    ($($integer:ty),*) => {
        $(
            impl From<$integer> for Value {
                fn from(value: $integer) -> Self {
                    Self::Int(i128::from(value))
                }
            }
        )*
    };
}

impl_value_from_integer!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Self::Binary(value.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<Element> for Value {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&Element> for Value {
    fn from(element: &Element) -> Self {
        Self::Element(element.clone())
    }
}

impl From<FrozenList> for Value {
    fn from(list: FrozenList) -> Self {
        Self::Element(Element::List(list))
    }
}

impl From<FrozenSet> for Value {
    fn from(set: FrozenSet) -> Self {
        Self::Element(Element::Set(set))
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
struct ValueVisitor;

#[cfg(feature = "serde")]
impl<'de> serde::de::Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a scalar, a byte string, a sequence or null")
    }

    fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Bool(value))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Int(i128::from(value)))
    }

    fn visit_i128<E>(self, value: i128) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Int(value))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Int(i128::from(value)))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Float(value))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::String(value.to_owned()))
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::String(value))
    }

    fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Binary(value.to_vec()))
    }

    fn visit_byte_buf<E>(self, value: Vec<u8>) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Binary(value))
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde::Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut values = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(value) = access.next_element()? {
            values.push(value);
        }
        Ok(Value::List(values))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_option_none_becomes_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(5)), Value::Int(5));
    }

    #[rstest]
    fn test_integers_widen() {
        assert_eq!(Value::from(u64::MAX), Value::Int(i128::from(u64::MAX)));
        assert_eq!(Value::from(-3i8), Value::Int(-3));
    }

    #[rstest]
    fn test_nested_constructors() {
        let value = Value::set([Value::list([1, 2]), Value::Null]);
        assert_eq!(
            value,
            Value::Set(vec![
                Value::List(vec![Value::Int(1), Value::Int(2)]),
                Value::Null
            ])
        );
    }

    #[rstest]
    fn test_kind_name_of_element() {
        assert_eq!(Value::from(Element::Int(1)).kind_name(), "integer");
    }
}
