/**
 * Collaboration Handlers
 *
 * - `GET /ws` - WebSocket endpoint speaking the `shared::event` protocol
 * - `GET /api/rooms/{note_id}/events` - read-only Server-Sent Events feed of a room
 * - `GET /api/rooms/{note_id}` - room subscriber count
 * - `GET /health` - liveness probe
 *
 * Each socket is served by a single task that alternates between client
 * frames and room updates, so replies and fan-out for one connection are
 * written in the order they were produced.
 */

use crate::backend::collab::connection::RoomSubscriptions;
use crate::backend::collab::state::RoomHub;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthenticatedUser;
use crate::backend::server::state::AppState;
use crate::shared::{ClientEvent, NoteId, ServerEvent};
use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    response::Response,
    Extension, Json,
};
use futures_util::stream::{self, SplitSink, Stream};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

/// Headroom for JSON envelope and escaping on top of the content limit
const FRAME_OVERHEAD: usize = 64 * 1024;

/// Handle the socket upgrade (GET /ws)
pub async fn handle_socket_upgrade(
    State(app_state): State<AppState>,
    user: Option<Extension<AuthenticatedUser>>,
    ws: WebSocketUpgrade,
) -> Response {
    let user = user.map(|Extension(user)| user);
    let max_frame = app_state
        .config
        .max_content_bytes
        .saturating_mul(2)
        .saturating_add(FRAME_OVERHEAD);

    ws.max_message_size(max_frame)
        .on_upgrade(move |socket| run_connection(socket, app_state, user))
}

async fn run_connection(socket: WebSocket, app_state: AppState, user: Option<AuthenticatedUser>) {
    let id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();
    let mut rooms = RoomSubscriptions::new(id, app_state.hub.clone(), app_state.connection_limits());

    match &user {
        Some(user) => tracing::info!("[Collab] User {} connected as {}", user.user_id, id),
        None => tracing::info!("[Collab] User connected {}", id),
    }

    if send_event(&mut sender, &ServerEvent::Connected { socket_id: id })
        .await
        .is_err()
    {
        return;
    }

    loop {
        tokio::select! {
            incoming = receiver.next() => {
                let reply = match incoming {
                    Some(Ok(Message::Text(text))) => match ClientEvent::from_text(text.as_str()) {
                        Ok(event) => rooms.handle(event),
                        Err(e) => {
                            tracing::debug!("[Collab] Malformed frame from {}: {}", id, e);
                            Some(ServerEvent::error(e.to_string()))
                        }
                    },
                    Some(Ok(Message::Binary(_))) => {
                        Some(ServerEvent::error("binary frames are not supported"))
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => None,
                    Some(Err(e)) => {
                        tracing::debug!("[Collab] Socket error on {}: {}", id, e);
                        break;
                    }
                };

                if let Some(reply) = reply {
                    if send_event(&mut sender, &reply).await.is_err() {
                        break;
                    }
                }
            }
            Some(edit) = rooms.next_update(), if !rooms.is_empty() => {
                if send_event(&mut sender, &ServerEvent::NoteUpdated(edit)).await.is_err() {
                    break;
                }
            }
        }
    }

    tracing::info!(
        "[Collab] User disconnected {} (was in {} rooms)",
        id,
        rooms.room_count()
    );
}

async fn send_event(
    sender: &mut SplitSink<WebSocket, Message>,
    event: &ServerEvent,
) -> Result<(), BackendError> {
    let text = event.to_text()?;
    sender
        .send(Message::Text(text.into()))
        .await
        .map_err(|e| BackendError::state(format!("socket send failed: {}", e)))
}

/// Server-Sent Events feed of one room (GET /api/rooms/{note_id}/events)
///
/// Observers receive `note-updated` events with the same JSON payload as
/// socket clients. They cannot publish.
pub async fn handle_room_events(
    State(hub): State<RoomHub>,
    Path(note_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, BackendError> {
    let note_id = NoteId::parse(&note_id)?;
    tracing::info!("[Collab] SSE observer subscribed to note {}", note_id);

    let receiver = hub.subscribe(&note_id);
    let stream = stream::unfold(receiver, move |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(update) => {
                    let event = Event::default().event("note-updated").json_data(&update.edit);
                    return Some((event, rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Collab] SSE observer lagged, skipped {} updates", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfo {
    pub note_id: NoteId,
    pub subscribers: usize,
}

/// Room subscriber count (GET /api/rooms/{note_id})
pub async fn handle_room_info(
    State(hub): State<RoomHub>,
    Path(note_id): Path<String>,
) -> Result<Json<RoomInfo>, BackendError> {
    let note_id = NoteId::parse(&note_id)?;
    let subscribers = hub.subscriber_count(&note_id);
    Ok(Json(RoomInfo {
        note_id,
        subscribers,
    }))
}

/// Liveness probe (GET /health)
pub async fn handle_health(State(hub): State<RoomHub>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "rooms": hub.room_count(),
    }))
}
