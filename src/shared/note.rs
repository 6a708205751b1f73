/**
 * Note Types
 *
 * The client-side view of a stored note and the identifier used to name
 * both a note and its collaboration room. Notes are owned by the external
 * document store; this crate only moves their title and content around.
 */
use crate::shared::error::SharedError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest note id accepted on the wire
pub const MAX_NOTE_ID_LEN: usize = 128;

/// Identifier of a note, and of the room that carries its live edits
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Create a validated note id
    ///
    /// Surrounding whitespace is trimmed. Empty ids, ids longer than
    /// [`MAX_NOTE_ID_LEN`] bytes and ids containing control characters are
    /// rejected.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, SharedError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SharedError::validation("noteId", "note id cannot be empty"));
        }
        if trimmed.len() > MAX_NOTE_ID_LEN {
            return Err(SharedError::validation(
                "noteId",
                format!("note id longer than {} bytes", MAX_NOTE_ID_LEN),
            ));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(SharedError::validation(
                "noteId",
                "note id contains control characters",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Re-run [`NoteId::parse`] on an id that came off the wire unchecked
    pub fn validate(&self) -> Result<(), SharedError> {
        Self::parse(&self.0).and_then(|parsed| {
            if parsed.0 == self.0 {
                Ok(())
            } else {
                Err(SharedError::validation(
                    "noteId",
                    "note id has surrounding whitespace",
                ))
            }
        })
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NoteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A note as returned by the document store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Store id. The document store names this field `_id`.
    #[serde(alias = "_id")]
    pub id: NoteId,
    pub title: String,
    /// Rich-text content as HTML
    #[serde(default)]
    pub content: String,
    #[serde(default, alias = "userId", skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Note {
    pub fn new(id: NoteId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            owner_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// The body sent to the store when saving this note
    pub fn to_update(&self) -> NoteUpdate {
        NoteUpdate {
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}

/// Fields a client may write to a stored note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteUpdate {
    pub title: String,
    pub content: String,
}
