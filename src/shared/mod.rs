//! Shared Module
//!
//! Types shared between the collaboration server and its clients: the
//! note model, the socket wire protocol and the errors both sides raise
//! while decoding and validating frames.
//!
//! Nothing here depends on a runtime or transport, so the same types are
//! used by the axum handlers in `backend` and the socket client in
//! `client`.

/// Note model and identifiers
pub mod note;

/// Socket wire protocol
pub mod event;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use note::{Note, NoteId, NoteUpdate};
pub use event::{ClientEvent, NoteEdit, ServerEvent};
pub use error::SharedError;
