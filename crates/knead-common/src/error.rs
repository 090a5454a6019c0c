//! Error types shared across Knead crates.

use thiserror::Error;

/// Errors raised when building an identifier from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// Identifier is empty or only whitespace
    #[error("{kind} must not be blank")]
    Blank {
        /// Which kind of identifier was rejected
        kind: &'static str,
    },
    /// Identifier has leading or trailing whitespace
    #[error("{kind} {value:?} has leading or trailing whitespace")]
    Padded {
        /// Which kind of identifier was rejected
        kind: &'static str,
        /// The rejected text
        value: String,
    },
}

/// Errors raised when parsing a schema version string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// Version text is not `major.minor.patch`
    #[error("malformed version {0:?}, expected major.minor.patch")]
    Malformed(String),
}
