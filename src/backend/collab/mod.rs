//! Collaboration Module
//!
//! Per-note rooms and live update fan-out.
//!
//! # Architecture
//!
//! - **`state`** - `RoomHub`, one broadcast channel per note with lazy creation and pruning
//! - **`connection`** - `RoomSubscriptions`, the rooms joined by a single socket
//! - **`handlers`** - WebSocket, SSE, room info and health endpoints
//!
//! An edit published to a room reaches every other member of that room. The
//! sender never gets its own edit back, and connections in other rooms never
//! see it. Nothing is persisted here; the note store is the source of truth
//! for content.
//!
//! # Example
//!
//! ```rust
//! use notes_collab::backend::collab::RoomHub;
//! use notes_collab::shared::{NoteEdit, NoteId};
//!
//! let hub = RoomHub::new(16);
//! let note = NoteId::parse("note-1").unwrap();
//! let mut rx = hub.subscribe(&note);
//! hub.publish(NoteEdit::new(note.clone(), "hello"), None);
//! assert_eq!(rx.try_recv().unwrap().edit.content, "hello");
//! ```

/// Room registry and broadcast channels
pub mod state;

/// Room membership of one connection
pub mod connection;

/// HTTP and WebSocket handlers
pub mod handlers;

pub use connection::{ConnectionLimits, RoomSubscriptions};
pub use state::{ConnectionId, RoomHub, RoomUpdate};
