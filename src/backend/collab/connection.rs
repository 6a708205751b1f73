/**
 * Per-Connection Room Membership
 *
 * `RoomSubscriptions` is the room state owned by one socket: the set of
 * rooms it joined, merged into a single stream of updates. Dropping it
 * (socket closed, task ended) releases every subscription and closes the
 * rooms that became empty.
 */

use crate::backend::collab::state::{ConnectionId, RoomHub, RoomUpdate};
use crate::backend::error::BackendError;
use crate::shared::{ClientEvent, NoteEdit, NoteId, ServerEvent, SharedError};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{StreamExt, StreamMap};

/// Limits applied to frames from one connection
#[derive(Debug, Clone, Copy)]
pub struct ConnectionLimits {
    pub max_rooms: usize,
    pub max_content_bytes: usize,
}

pub struct RoomSubscriptions {
    id: ConnectionId,
    hub: RoomHub,
    rooms: StreamMap<NoteId, BroadcastStream<RoomUpdate>>,
    limits: ConnectionLimits,
}

impl RoomSubscriptions {
    pub fn new(id: ConnectionId, hub: RoomHub, limits: ConnectionLimits) -> Self {
        Self {
            id,
            hub,
            rooms: StreamMap::new(),
            limits,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn is_member(&self, note_id: &NoteId) -> bool {
        self.rooms.contains_key(note_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Join a room, returning its subscriber count afterwards
    ///
    /// Joining a room twice keeps the single existing subscription.
    pub fn join(&mut self, note_id: NoteId) -> Result<usize, BackendError> {
        note_id.validate()?;
        if !self.rooms.contains_key(&note_id) {
            if self.rooms.len() >= self.limits.max_rooms {
                return Err(BackendError::protocol(format!(
                    "room limit of {} reached",
                    self.limits.max_rooms
                )));
            }
            let receiver = self.hub.subscribe(&note_id);
            self.rooms.insert(note_id.clone(), BroadcastStream::new(receiver));
            tracing::info!("[Collab] {} joined note {}", self.id, note_id);
        }
        Ok(self.hub.subscriber_count(&note_id))
    }

    /// Leave a room; returns whether the connection was a member
    pub fn leave(&mut self, note_id: &NoteId) -> bool {
        let was_member = self.rooms.remove(note_id).is_some();
        if was_member {
            self.hub.prune(note_id);
            tracing::info!("[Collab] {} left note {}", self.id, note_id);
        }
        was_member
    }

    /// Publish an edit to its room on behalf of this connection
    ///
    /// Membership is not required to publish.
    pub fn edit(&self, edit: NoteEdit) -> Result<usize, BackendError> {
        edit.note_id.validate()?;
        let size = edit.content.len();
        if size > self.limits.max_content_bytes {
            return Err(SharedError::too_large(size, self.limits.max_content_bytes).into());
        }
        tracing::debug!(
            "[Collab] {} edited note {} ({} bytes)",
            self.id,
            edit.note_id,
            size
        );
        Ok(self.hub.publish(edit, Some(self.id)))
    }

    /// Apply one client frame, returning the reply to send back if any
    pub fn handle(&mut self, event: ClientEvent) -> Option<ServerEvent> {
        let result = match event {
            ClientEvent::JoinNote(note_id) => self
                .join(note_id.clone())
                .map(|subscribers| Some(ServerEvent::Joined { note_id, subscribers })),
            ClientEvent::LeaveNote(note_id) => {
                self.leave(&note_id);
                Ok(Some(ServerEvent::Left { note_id }))
            }
            ClientEvent::EditNote(edit) => self.edit(edit).map(|_| None),
        };

        result.unwrap_or_else(|err| {
            tracing::warn!("[Collab] Rejected frame from {}: {}", self.id, err);
            Some(ServerEvent::error(err.message()))
        })
    }

    /// Wait for the next edit made by another connection in any joined room
    ///
    /// Resolves to `None` once no rooms are joined, so callers should only
    /// poll this while `!is_empty()`.
    pub async fn next_update(&mut self) -> Option<NoteEdit> {
        while let Some((note_id, item)) = self.rooms.next().await {
            match item {
                Ok(update) if update.origin == Some(self.id) => continue,
                Ok(update) => return Some(update.edit),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        "[Collab] {} lagged on note {}, skipped {} updates",
                        self.id,
                        note_id,
                        skipped
                    );
                }
            }
        }
        None
    }
}

impl Drop for RoomSubscriptions {
    fn drop(&mut self) {
        let rooms = std::mem::replace(&mut self.rooms, StreamMap::new());
        let joined: Vec<NoteId> = rooms.keys().cloned().collect();
        drop(rooms);
        for note_id in &joined {
            self.hub.prune(note_id);
        }
        if !joined.is_empty() {
            tracing::debug!("[Collab] {} released {} rooms", self.id, joined.len());
        }
    }
}
