/**
 * Client Error Types
 *
 * `StoreError` covers the document store (HTTP API); `ClientError` covers
 * configuration and the collaboration socket. `StoreError` is `Clone` so
 * it can travel inside `SessionEvent::SaveFailed`.
 */

use crate::shared::{NoteId, SharedError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Not authenticated")]
    Unauthorized,

    #[error("Not allowed to access note")]
    Forbidden,

    #[error("Note not found: {0}")]
    NotFound(String),

    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl StoreError {
    pub fn not_found(note_id: &NoteId) -> Self {
        Self::NotFound(note_id.to_string())
    }

    /// Map a non-success HTTP status to an error
    pub fn from_status(status: u16, message: impl Into<String>, note_id: Option<&NoteId>) -> Self {
        let message = message.into();
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound(note_id.map(|id| id.to_string()).unwrap_or(message)),
            _ => Self::Status { status, message },
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid server URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Connection error: {0}")]
    Connection(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Handshake failed: {0}")]
    Handshake(String),

    #[error("Connection closed")]
    Closed,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Shared(#[from] SharedError),
}
