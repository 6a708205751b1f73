/**
 * Room Hub
 *
 * One `tokio::sync::broadcast` channel per note room. A channel is created
 * the first time somebody subscribes to the room and removed again once
 * its last receiver is gone, either eagerly (`prune`) or by the periodic
 * `cleanup_inactive_rooms` sweep started in `server::init`.
 *
 * Updates carry the id of the connection that published them so that the
 * publisher's own subscription can skip its echo. The hub itself keeps no
 * note content: the document store owns content, the hub only fans edits
 * out to whoever is listening right now.
 */

use crate::shared::{NoteEdit, NoteId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Identifier assigned to each socket connection
pub type ConnectionId = Uuid;

/// An edit travelling through a room channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomUpdate {
    pub edit: NoteEdit,
    /// Publishing connection, `None` for server-side publishers
    pub origin: Option<ConnectionId>,
}

/// Per-room broadcast channels
#[derive(Debug, Clone)]
pub struct RoomHub {
    channels: Arc<Mutex<HashMap<NoteId, broadcast::Sender<RoomUpdate>>>>,
    capacity: usize,
}

impl RoomHub {
    /// Create a hub whose rooms buffer up to `capacity` updates each
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    fn channels(&self) -> MutexGuard<'_, HashMap<NoteId, broadcast::Sender<RoomUpdate>>> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe to a room, creating its channel if needed
    pub fn subscribe(&self, note_id: &NoteId) -> broadcast::Receiver<RoomUpdate> {
        let mut channels = self.channels();
        channels
            .entry(note_id.clone())
            .or_insert_with(|| {
                tracing::debug!("[Rooms] Opening room {}", note_id);
                broadcast::channel(self.capacity).0
            })
            .subscribe()
    }

    /// Publish an edit to its room
    ///
    /// Returns the number of receivers the update was queued for, which
    /// includes the origin's own subscription when it is a member. Rooms
    /// nobody joined drop the edit and return 0.
    pub fn publish(&self, edit: NoteEdit, origin: Option<ConnectionId>) -> usize {
        let note_id = edit.note_id.clone();
        let sender = match self.channels().get(&note_id) {
            Some(sender) => sender.clone(),
            None => {
                tracing::debug!("[Rooms] No room for note {}, dropping edit", note_id);
                return 0;
            }
        };

        match sender.send(RoomUpdate { edit, origin }) {
            Ok(receivers) => {
                tracing::debug!("[Rooms] Edit for {} queued for {} receivers", note_id, receivers);
                receivers
            }
            Err(_) => {
                tracing::debug!("[Rooms] Room {} has no receivers", note_id);
                0
            }
        }
    }

    /// Current number of subscriptions to a room
    pub fn subscriber_count(&self, note_id: &NoteId) -> usize {
        self.channels()
            .get(note_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    /// Number of open rooms
    pub fn room_count(&self) -> usize {
        self.channels().len()
    }

    /// Remove a room if nobody is subscribed to it any more
    pub fn prune(&self, note_id: &NoteId) -> bool {
        let mut channels = self.channels();
        let empty = channels
            .get(note_id)
            .is_some_and(|sender| sender.receiver_count() == 0);
        if empty {
            channels.remove(note_id);
            tracing::debug!("[Rooms] Closed empty room {}", note_id);
        }
        empty
    }

    /// Remove every room without subscribers, returning how many were closed
    pub fn cleanup_inactive_rooms(&self) -> usize {
        let mut channels = self.channels();
        let before = channels.len();
        channels.retain(|_, sender| sender.receiver_count() > 0);
        before - channels.len()
    }
}

impl Default for RoomHub {
    fn default() -> Self {
        Self::new(100)
    }
}
