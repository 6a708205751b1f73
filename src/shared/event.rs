/**
 * Collaboration Wire Protocol
 *
 * Frames exchanged over the `/ws` socket. Every frame is a JSON text
 * message of the form `{"event": "<name>", "data": <payload>}`, mirroring
 * the named-event style browsers already speak.
 *
 * Client to server:
 * - `join-note`  data: `"<noteId>"`
 * - `leave-note` data: `"<noteId>"`
 * - `edit-note`  data: `{"noteId": "...", "content": "..."}`
 *
 * Server to client:
 * - `connected`    data: `{"socketId": "..."}`
 * - `joined`       data: `{"noteId": "...", "subscribers": 2}`
 * - `left`         data: `{"noteId": "..."}`
 * - `note-updated` data: `{"noteId": "...", "content": "..."}`
 * - `error`        data: `{"message": "..."}`
 */
use crate::shared::error::SharedError;
use crate::shared::note::NoteId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An edit of one note's content, as published to its room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteEdit {
    pub note_id: NoteId,
    pub content: String,
}

impl NoteEdit {
    pub fn new(note_id: NoteId, content: impl Into<String>) -> Self {
        Self {
            note_id,
            content: content.into(),
        }
    }
}

/// Frames sent by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Subscribe to a note's room
    JoinNote(NoteId),
    /// Unsubscribe from a note's room
    LeaveNote(NoteId),
    /// Fan an edit out to everyone else in the room
    EditNote(NoteEdit),
}

impl ClientEvent {
    pub fn from_text(text: &str) -> Result<Self, SharedError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_text(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }

    /// The room this frame addresses
    pub fn note_id(&self) -> &NoteId {
        match self {
            Self::JoinNote(id) | Self::LeaveNote(id) => id,
            Self::EditNote(edit) => &edit.note_id,
        }
    }
}

/// Frames sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// First frame on every connection
    #[serde(rename_all = "camelCase")]
    Connected { socket_id: Uuid },
    /// Acknowledges `join-note`
    #[serde(rename_all = "camelCase")]
    Joined { note_id: NoteId, subscribers: usize },
    /// Acknowledges `leave-note`
    #[serde(rename_all = "camelCase")]
    Left { note_id: NoteId },
    /// Another participant edited a note in one of our rooms
    NoteUpdated(NoteEdit),
    /// A frame was rejected; the connection stays open
    Error { message: String },
}

impl ServerEvent {
    pub fn from_text(text: &str) -> Result<Self, SharedError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_text(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
