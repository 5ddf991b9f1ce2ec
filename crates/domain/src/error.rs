//! Unified error types for the domain layer
//!
//! Redaction and threading are total over well-formed input, so the only
//! failures surface where raw storage data is turned into domain values.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid ID format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// A stored document does not have the shape of a document tree
    #[error("Malformed document: {0}")]
    Structural(#[from] StructuralError),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// # Example
    /// ```ignore
    /// if body.trim().is_empty() {
    ///     return Err(DomainError::validation("Message body cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid ID error
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

/// The root of a stored document cannot be interpreted as a document tree.
///
/// Anything below the root that is merely unusual is passed through as opaque
/// content instead; these errors only cover input the redactor cannot walk at all.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StructuralError {
    #[error("document root is not an object")]
    RootNotObject,

    #[error("unexpected document root type: {0}")]
    UnexpectedRootType(String),

    #[error("document content is not a list")]
    ContentNotList,

    #[error("invalid document JSON: {0}")]
    Json(String),
}
