//! Error types for parsing, encoding and binding.

use thiserror::Error;

/// Errors that can occur while converting between JSON text, [`JsonValue`]
/// trees and typed values.
///
/// [`JsonValue`]: crate::JsonValue
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatherError {
    /// The input text was not valid JSON (parse path).
    /// `offset` is the byte offset at which the parser gave up.
    #[error("JSON syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// The input held no value at all (empty or whitespace only).
    #[error("empty JSON document")]
    EmptyDocument,

    /// A value cannot be represented as JSON text (NaN, infinities,
    /// integers beyond the safe range, inaccessible shared cells).
    #[error("Encoding error: {0}")]
    Encode(String),

    /// The declared type has no decode rule.
    #[error("unsupported member type `{type_name}`")]
    UnsupportedType { type_name: &'static str },

    /// The record type has no parameterless construction path.
    #[error("type `{type_name}` cannot be instantiated")]
    Uninstantiable { type_name: &'static str },

    /// A shared node was reached again while it was still being encoded.
    #[error("cyclic reference detected at `{type_name}`")]
    CyclicReference { type_name: &'static str },

    /// The tree holds a different kind of value than the declared type accepts.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A scalar codec rejected its input (date text, base64, enum ordinal, ...).
    #[error("invalid {kind} value: {message}")]
    InvalidScalar { kind: &'static str, message: String },

    /// A failure while converting a specific record member.
    #[error("member `{member}`: {source}")]
    Member {
        member: &'static str,
        /// Declared Rust type of the member.
        declared: &'static str,
        #[source]
        source: Box<FeatherError>,
    },
}

impl FeatherError {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        FeatherError::Syntax {
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn scalar(kind: &'static str, message: impl Into<String>) -> Self {
        FeatherError::InvalidScalar {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn in_member(self, member: &'static str, declared: &'static str) -> Self {
        FeatherError::Member {
            member,
            declared,
            source: Box::new(self),
        }
    }

    /// Strip any `Member` wrapping and return the underlying failure.
    pub fn root_cause(&self) -> &FeatherError {
        match self {
            FeatherError::Member { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Convenience alias used throughout feather-core.
pub type Result<T> = std::result::Result<T, FeatherError>;
