//! Error types.
//!
//! Construction is the only fallible step of a set's life: it fails with
//! [`TypeValidationError`] when any element, at any depth, does not conform
//! to the declared descriptor. The dynamic [`FrozenSet`](crate::FrozenSet)
//! algebra additionally reports [`SetError::DescriptorMismatch`] when two
//! typed operands disagree on their element type.

use thiserror::Error;

use crate::descriptor::{ElementType, ScalarKind};

/// A candidate value does not conform to its declared element type.
///
/// # Examples
///
/// ```rust
/// use typed_frozenset::{ElementType, ScalarKind, TypeValidationError};
///
/// let error = TypeValidationError::Null {
///     expected: ElementType::Scalar(ScalarKind::I32),
/// };
/// assert_eq!(error.to_string(), "expected i32, found null");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeValidationError {
    /// A null value was found where an element was required.
    #[error("expected {expected}, found null")]
    Null {
        /// The descriptor the null was checked against.
        expected: ElementType,
    },
    /// A numeric value does not fit the scalar kind.
    #[error("{value} is out of range for {kind}")]
    OutOfRange {
        /// The scalar kind that rejected the value.
        kind: ScalarKind,
        /// The rejected value, rendered.
        value: String,
    },
    /// The value has the wrong shape for the descriptor.
    #[error("expected {expected}, found {found}")]
    Mismatch {
        /// The descriptor the value was checked against.
        expected: ElementType,
        /// A short description of what was found instead.
        found: &'static str,
    },
}

/// Errors of the dynamic set algebra and relation methods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetError {
    /// An element contributed by a native operand failed validation.
    #[error(transparent)]
    Validation(#[from] TypeValidationError),
    /// Two typed operands hold different element types.
    #[error("cannot combine set<{left}> with set<{right}>")]
    DescriptorMismatch {
        /// Element type of the left operand.
        left: ElementType,
        /// Element type of the right operand.
        right: ElementType,
    },
}

/// An IDL type string could not be parsed into an [`ElementType`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorParseError {
    /// An identifier names no known type.
    #[error("unknown type `{name}` at position {position}")]
    UnknownType {
        /// The unknown identifier.
        name: String,
        /// Byte offset of the identifier.
        position: usize,
    },
    /// The input ended inside a type.
    #[error("unexpected end of input")]
    UnexpectedEnd,
    /// A character appeared where it is not allowed.
    #[error("unexpected `{character}` at position {position}")]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// Byte offset of the character.
        position: usize,
    },
}
