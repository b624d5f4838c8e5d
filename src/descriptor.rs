//! Element type descriptors.
//!
//! An [`ElementType`] describes the shape every element of a container must
//! have. Descriptors form a closed, recursive family:
//!
//! - [`ElementType::Scalar`]: an IDL base type such as `i32` or `string`
//! - [`ElementType::Sequence`]: an ordered `list<T>` of elements
//! - [`ElementType::Set`]: a nested `set<T>` of elements
//!
//! Descriptors render and parse in IDL syntax.
//!
//! # Examples
//!
//! ```rust
//! use typed_frozenset::{ElementType, ScalarKind};
//!
//! let descriptor = ElementType::set(ElementType::sequence(ElementType::Scalar(ScalarKind::I32)));
//! assert_eq!(descriptor.to_string(), "set<list<i32>>");
//!
//! let parsed: ElementType = "set<list<i32>>".parse().unwrap();
//! assert_eq!(parsed, descriptor);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::DescriptorParseError;

// =============================================================================
// ScalarKind
// =============================================================================

/// The scalar base types an element may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `bool`
    Bool,
    /// `byte`, an 8-bit signed integer
    Byte,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `float`, a 32-bit IEEE float
    Float,
    /// `double`, a 64-bit IEEE float
    Double,
    /// `string`, UTF-8 text
    String,
    /// `binary`, raw bytes
    Binary,
}

impl ScalarKind {
    /// Returns the IDL keyword of this kind.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::Binary => "binary",
        }
    }

    /// Returns the inclusive integer range of an integral kind.
    ///
    /// Returns `None` for non-integral kinds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_frozenset::ScalarKind;
    ///
    /// assert_eq!(ScalarKind::Byte.integer_range(), Some((-128, 127)));
    /// assert_eq!(ScalarKind::String.integer_range(), None);
    /// ```
    #[must_use]
    pub const fn integer_range(self) -> Option<(i128, i128)> {
        match self {
            Self::Byte => Some((i8::MIN as i128, i8::MAX as i128)),
            Self::I16 => Some((i16::MIN as i128, i16::MAX as i128)),
            Self::I32 => Some((i32::MIN as i128, i32::MAX as i128)),
            Self::I64 => Some((i64::MIN as i128, i64::MAX as i128)),
            _ => None,
        }
    }

    fn from_keyword(keyword: &str) -> Option<Self> {
        let kind = match keyword {
            "bool" => Self::Bool,
            "byte" | "i8" => Self::Byte,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "float" => Self::Float,
            "double" => Self::Double,
            "string" => Self::String,
            "binary" => Self::Binary,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.keyword())
    }
}

// =============================================================================
// ElementType
// =============================================================================

/// Describes the shape of the elements held by a container.
///
/// Composite descriptors hold their element descriptor behind an [`Arc`] so
/// containers can share it without copying the descriptor tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// A scalar base type.
    Scalar(ScalarKind),
    /// An ordered sequence (`list<T>`) of elements of the inner type.
    Sequence(Arc<Self>),
    /// A nested set (`set<T>`) of elements of the inner type.
    Set(Arc<Self>),
}

impl ElementType {
    /// Builds a `list<T>` descriptor.
    #[must_use]
    pub fn sequence(inner: impl Into<Self>) -> Self {
        Self::Sequence(Arc::new(inner.into()))
    }

    /// Builds a `set<T>` descriptor.
    #[must_use]
    pub fn set(inner: impl Into<Self>) -> Self {
        Self::Set(Arc::new(inner.into()))
    }

    /// Returns `true` for scalar descriptors.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Returns the nesting depth: 0 for scalars, 1 for `list<i32>`, and so on.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Scalar(_) => 0,
            Self::Sequence(inner) | Self::Set(inner) => 1 + inner.depth(),
        }
    }

    /// Compares two shared descriptors, short-circuiting on pointer identity.
    pub(crate) fn same_as(left: &Arc<Self>, right: &Arc<Self>) -> bool {
        Arc::ptr_eq(left, right) || left == right
    }
}

impl From<ScalarKind> for ElementType {
    fn from(kind: ScalarKind) -> Self {
        Self::Scalar(kind)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(formatter, "{kind}"),
            Self::Sequence(inner) => write!(formatter, "list<{inner}>"),
            Self::Set(inner) => write!(formatter, "set<{inner}>"),
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

impl FromStr for ElementType {
    type Err = DescriptorParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { input, position: 0 };
        let descriptor = parser.parse_type()?;
        parser.skip_whitespace();
        match parser.peek() {
            None => Ok(descriptor),
            Some(character) => Err(DescriptorParseError::UnexpectedCharacter {
                character,
                position: parser.position,
            }),
        }
    }
}

/// Recursive-descent parser over IDL type syntax.
struct Parser<'a> {
    input: &'a str,
    position: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(character) = self.peek() {
            if !character.is_whitespace() {
                break;
            }
            self.position += character.len_utf8();
        }
    }

    fn identifier(&mut self) -> &str {
        let start = self.position;
        while let Some(character) = self.peek() {
            if !(character.is_ascii_alphanumeric() || character == '_') {
                break;
            }
            self.position += character.len_utf8();
        }
        &self.input[start..self.position]
    }

    fn expect(&mut self, expected: char) -> Result<(), DescriptorParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(character) if character == expected => {
                self.position += character.len_utf8();
                Ok(())
            }
            Some(character) => Err(DescriptorParseError::UnexpectedCharacter {
                character,
                position: self.position,
            }),
            None => Err(DescriptorParseError::UnexpectedEnd),
        }
    }

    fn parse_type(&mut self) -> Result<ElementType, DescriptorParseError> {
        self.skip_whitespace();
        let start = self.position;
        let name = self.identifier().to_owned();
        match name.as_str() {
            "" => match self.peek() {
                Some(character) => Err(DescriptorParseError::UnexpectedCharacter {
                    character,
                    position: start,
                }),
                None => Err(DescriptorParseError::UnexpectedEnd),
            },
            "list" | "set" => {
                self.expect('<')?;
                let inner = self.parse_type()?;
                self.expect('>')?;
                Ok(if name == "list" {
                    ElementType::sequence(inner)
                } else {
                    ElementType::set(inner)
                })
            }
            keyword => ScalarKind::from_keyword(keyword)
                .map(ElementType::Scalar)
                .ok_or_else(|| DescriptorParseError::UnknownType {
                    name: keyword.to_owned(),
                    position: start,
                }),
        }
    }
}
