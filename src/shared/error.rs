//! Shared Error Types
//!
//! Errors that can occur on both sides of the collaboration socket: while
//! decoding protocol frames and while validating note identifiers or edit
//! payloads.
//!
//! # Usage
//!
//! ```rust
//! use notes_collab::shared::error::SharedError;
//!
//! let error = SharedError::validation("noteId", "note id cannot be empty");
//! assert!(error.to_string().contains("noteId"));
//! ```
use thiserror::Error;

/// Shared error types that can occur in both the server and the client
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Payload exceeds a configured limit
    #[error("Payload too large: {size} bytes (limit {limit})")]
    PayloadTooLarge {
        size: usize,
        limit: usize,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn too_large(size: usize, limit: usize) -> Self {
        Self::PayloadTooLarge { size, limit }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
