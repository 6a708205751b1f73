/**
 * Note Session
 *
 * Client-side state of an open notes dashboard: the list of notes, the
 * note open in the editor, which notes are saving and the pending
 * debounced saves.
 *
 * # Save flow
 *
 * Every local edit restarts a per-note timer. When the timer fires the
 * note is written to the store; on success the stored content is
 * broadcast to the note's room and replaces the list entry. Remote edits
 * overwrite local content (last write wins). A local save that is still
 * pending is not cancelled by a remote edit and will overwrite it.
 *
 * # Rooms
 *
 * The session is in exactly one room at a time: the one of the open note.
 * Opening another note leaves the previous room; closing or deleting the
 * open note leaves its room.
 */

use crate::client::error::StoreError;
use crate::client::socket::{Broadcaster, RemoteUpdate};
use crate::client::store::NoteStore;
use crate::shared::{Note, NoteEdit, NoteId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

pub const NEW_NOTE_TITLE: &str = "New Note";
pub const NEW_NOTE_CONTENT: &str = "Write something here...";

const EVENT_BUFFER: usize = 64;

/// Notifications for whoever renders the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A debounced save reached the store and was broadcast
    Saved(Note),
    SaveFailed { note_id: NoteId, error: StoreError },
    /// A remote edit replaced local content
    RemoteApplied(NoteEdit),
    Deleted(NoteId),
}

struct PendingSave {
    generation: u64,
    /// Debounce elapsed and the store request started
    fired: bool,
    task: JoinHandle<()>,
}

impl PendingSave {
    /// Stop the save if it is still waiting out the debounce
    ///
    /// A fired save is left to finish so that whatever reached the store
    /// is also broadcast.
    fn cancel(self) -> bool {
        if !self.fired {
            self.task.abort();
        }
        !self.fired
    }
}

#[derive(Default)]
struct SessionState {
    notes: Vec<Note>,
    selected: Option<Note>,
    saving: HashSet<NoteId>,
    pending: HashMap<NoteId, PendingSave>,
    generation: u64,
}

impl SessionState {
    /// Settle a save; returns false if a newer save took over meanwhile
    fn finish_save(&mut self, note_id: &NoteId, generation: u64) -> bool {
        let current = self
            .pending
            .get(note_id)
            .is_some_and(|pending| pending.generation == generation);
        if current {
            self.pending.remove(note_id);
            self.saving.remove(note_id);
        }
        current
    }

    /// Mark a save as fired; returns false if it was superseded first
    fn fire_save(&mut self, note_id: &NoteId, generation: u64) -> bool {
        match self.pending.get_mut(note_id) {
            Some(pending) if pending.generation == generation => {
                pending.fired = true;
                true
            }
            _ => false,
        }
    }

    fn cancel_save(&mut self, note_id: &NoteId) -> bool {
        self.saving.remove(note_id);
        self.pending
            .remove(note_id)
            .is_some_and(PendingSave::cancel)
    }
}

struct SessionInner<S, B> {
    store: S,
    broadcaster: B,
    state: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
    debounce: Duration,
}

impl<S: NoteStore, B: Broadcaster> SessionInner<S, B> {
    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SessionEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    async fn run_save(&self, note: Note, generation: u64) {
        let update = note.to_update();
        match self.store.update_note(&note.id, &update).await {
            Ok(stored) => {
                let saved = stored.unwrap_or_else(|| note.clone());
                self.broadcaster
                    .publish_edit(NoteEdit::new(saved.id.clone(), saved.content.clone()));
                {
                    let mut state = self.state();
                    if let Some(entry) = state.notes.iter_mut().find(|n| n.id == note.id) {
                        *entry = saved.clone();
                    }
                    state.finish_save(&note.id, generation);
                }
                tracing::debug!("[Session] Saved note {}", saved.id);
                self.emit(SessionEvent::Saved(saved));
            }
            Err(error) => {
                tracing::warn!("[Session] Failed to save note {}: {}", note.id, error);
                self.state().finish_save(&note.id, generation);
                self.emit(SessionEvent::SaveFailed {
                    note_id: note.id,
                    error,
                });
            }
        }
    }
}

/// Debounced save and broadcast reconciliation for one user
pub struct NoteSession<S, B> {
    inner: Arc<SessionInner<S, B>>,
}

impl<S, B> Clone for NoteSession<S, B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: NoteStore, B: Broadcaster> NoteSession<S, B> {
    pub fn new(store: S, broadcaster: B, debounce: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            inner: Arc::new(SessionInner {
                store,
                broadcaster,
                state: Mutex::new(SessionState::default()),
                events,
                debounce,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    pub fn notes(&self) -> Vec<Note> {
        self.inner.state().notes.clone()
    }

    pub fn selected(&self) -> Option<Note> {
        self.inner.state().selected.clone()
    }

    pub fn is_saving(&self, note_id: &NoteId) -> bool {
        self.inner.state().saving.contains(note_id)
    }

    /// Fetch all notes; open `link` (a shared note id) if it is among them
    pub async fn load_notes(&self, link: Option<&NoteId>) -> Result<Vec<Note>, StoreError> {
        let notes = self.inner.store.list_notes().await?;
        tracing::info!("[Session] Loaded {} notes", notes.len());
        self.inner.state().notes = notes.clone();

        if let Some(link) = link {
            match self.open_note(link) {
                Ok(_) => tracing::info!("[Session] Opened shared note {}", link),
                Err(_) => tracing::warn!("[Session] Shared note {} is not in the list", link),
            }
        }
        Ok(notes)
    }

    /// Create a note with the default title and content at the top of the list
    pub async fn create_note(&self) -> Result<Note, StoreError> {
        let note = self
            .inner
            .store
            .create_note(NEW_NOTE_TITLE, NEW_NOTE_CONTENT)
            .await?;
        self.inner.state().notes.insert(0, note.clone());
        tracing::info!("[Session] Created note {}", note.id);
        Ok(note)
    }

    /// Open a note from the list and join its room
    pub fn open_note(&self, note_id: &NoteId) -> Result<Note, StoreError> {
        let previous = {
            let mut state = self.inner.state();
            let note = state
                .notes
                .iter()
                .find(|n| &n.id == note_id)
                .cloned()
                .ok_or_else(|| StoreError::not_found(note_id))?;
            state.selected.replace(note).map(|n| n.id)
        };

        if previous.as_ref() != Some(note_id) {
            if let Some(previous) = &previous {
                self.inner.broadcaster.leave(previous);
            }
            self.inner.broadcaster.join(note_id);
        }
        self.selected().ok_or_else(|| StoreError::not_found(note_id))
    }

    /// Close the open note and leave its room
    pub fn close_note(&self) -> Option<Note> {
        let closed = self.inner.state().selected.take();
        if let Some(note) = &closed {
            self.inner.broadcaster.leave(&note.id);
        }
        closed
    }

    /// Replace the open note's content and schedule a save
    ///
    /// Returns `None` when no note is open.
    pub fn edit_content(&self, content: impl Into<String>) -> Option<Note> {
        let content = content.into();
        self.edit_selected(|note| note.content = content)
    }

    /// Replace the open note's title and schedule a save
    pub fn edit_title(&self, title: impl Into<String>) -> Option<Note> {
        let title = title.into();
        self.edit_selected(|note| note.title = title)
    }

    fn edit_selected(&self, apply: impl FnOnce(&mut Note)) -> Option<Note> {
        let note = {
            let mut state = self.inner.state();
            let selected = state.selected.as_mut()?;
            apply(selected);
            selected.clone()
        };
        self.schedule_save(note.clone());
        Some(note)
    }

    /// Save `note` once edits pause for the debounce window
    ///
    /// A newer call for the same note replaces the pending one while it is
    /// still waiting; a save already sent to the store runs to completion.
    pub fn schedule_save(&self, note: Note) {
        let mut state = self.inner.state();
        state.generation += 1;
        let generation = state.generation;
        let note_id = note.id.clone();

        if let Some(previous) = state.pending.remove(&note_id) {
            previous.cancel();
        }
        state.saving.insert(note_id.clone());

        // spawned under the lock so the task cannot settle before it is registered
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            if !inner.state().fire_save(&note.id, generation) {
                return;
            }
            inner.run_save(note, generation).await;
        });
        state.pending.insert(
            note_id,
            PendingSave {
                generation,
                fired: false,
                task,
            },
        );
    }

    /// Apply an edit received from the note's room
    ///
    /// Returns whether any local copy was updated.
    pub fn apply_remote(&self, update: RemoteUpdate) -> bool {
        let applied = {
            let mut state = self.inner.state();
            let mut applied = false;
            if let Some(entry) = state.notes.iter_mut().find(|n| n.id == update.note_id) {
                entry.content = update.content.clone();
                applied = true;
            }
            if let Some(selected) = state.selected.as_mut().filter(|n| n.id == update.note_id) {
                selected.content = update.content.clone();
                applied = true;
            }
            applied
        };

        if applied {
            tracing::debug!("[Session] Applied remote edit to {}", update.note_id);
            self.inner.emit(SessionEvent::RemoteApplied(update));
        }
        applied
    }

    /// Delete a note from the store and forget every local trace of it
    pub async fn delete_note(&self, note_id: &NoteId) -> Result<(), StoreError> {
        self.inner.store.delete_note(note_id).await?;

        let was_open = {
            let mut state = self.inner.state();
            state.notes.retain(|n| &n.id != note_id);
            if state.cancel_save(note_id) {
                tracing::debug!("[Session] Cancelled pending save of {}", note_id);
            }
            let was_open = state.selected.as_ref().is_some_and(|n| &n.id == note_id);
            if was_open {
                state.selected = None;
            }
            was_open
        };

        if was_open {
            self.inner.broadcaster.leave(note_id);
        }
        tracing::info!("[Session] Deleted note {}", note_id);
        self.inner.emit(SessionEvent::Deleted(note_id.clone()));
        Ok(())
    }

    /// Apply remote updates until the channel closes
    pub fn spawn_remote_listener(&self, mut updates: mpsc::Receiver<RemoteUpdate>) -> JoinHandle<()> {
        let session = self.clone();
        tokio::spawn(async move {
            while let Some(update) = updates.recv().await {
                session.apply_remote(update);
            }
            tracing::info!("[Session] Remote update stream ended");
        })
    }
}
