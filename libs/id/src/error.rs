//! Errors produced when parsing identifier strings.

use thiserror::Error;

/// Reasons an ID string can fail to parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input was an empty string.
    #[error("ID cannot be empty")]
    Empty,

    /// The input had no `_` between prefix and ULID body.
    #[error("ID missing underscore separator")]
    MissingSeparator,

    /// The prefix did not match the resource type being parsed.
    #[error("invalid ID prefix: expected '{expected}', got '{actual}'")]
    InvalidPrefix {
        expected: &'static str,
        actual: String,
    },

    /// The portion after the separator was not a valid ULID.
    #[error("invalid ULID: {0}")]
    InvalidUlid(String),
}
