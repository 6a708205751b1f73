/**
 * Collaboration Socket Client
 *
 * Connects to the server's `/ws` endpoint, waits for the `connected`
 * frame and then runs two tasks:
 * - writer: drains the handle's outgoing queue into the socket
 * - reader: forwards `note-updated` payloads to the update channel and
 *   logs everything else
 *
 * Dropping every `CollabHandle` closes the socket. Losing the connection
 * closes the update channel, which ends any `spawn_remote_listener` loop.
 */

use crate::client::config::ClientConfig;
use crate::client::error::ClientError;
use crate::shared::{ClientEvent, NoteEdit, NoteId, ServerEvent};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use uuid::Uuid;

/// Edit made by another participant in a joined room
pub type RemoteUpdate = NoteEdit;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);
const UPDATE_BUFFER: usize = 256;

/// Outbound side of the collaboration transport
///
/// All calls are fire-and-forget: delivery problems are logged, never
/// returned, matching how a browser socket emits events.
pub trait Broadcaster: Send + Sync + 'static {
    fn join(&self, note_id: &NoteId);
    fn leave(&self, note_id: &NoteId);
    fn publish_edit(&self, edit: NoteEdit);
}

/// Cloneable sender half of a live connection
#[derive(Debug, Clone)]
pub struct CollabHandle {
    socket_id: Uuid,
    outgoing: mpsc::UnboundedSender<ClientEvent>,
}

impl CollabHandle {
    /// Id the server assigned to this connection
    pub fn socket_id(&self) -> Uuid {
        self.socket_id
    }

    pub fn is_connected(&self) -> bool {
        !self.outgoing.is_closed()
    }

    fn send(&self, event: ClientEvent) {
        if self.outgoing.send(event).is_err() {
            tracing::warn!("[Collab] Socket closed, dropping outgoing frame");
        }
    }
}

impl Broadcaster for CollabHandle {
    fn join(&self, note_id: &NoteId) {
        self.send(ClientEvent::JoinNote(note_id.clone()));
    }

    fn leave(&self, note_id: &NoteId) {
        self.send(ClientEvent::LeaveNote(note_id.clone()));
    }

    fn publish_edit(&self, edit: NoteEdit) {
        self.send(ClientEvent::EditNote(edit));
    }
}

pub struct CollabClient;

impl CollabClient {
    /// Open a socket to the configured server
    pub async fn connect(
        config: &ClientConfig,
    ) -> Result<(CollabHandle, mpsc::Receiver<RemoteUpdate>), ClientError> {
        let url = config.ws_url()?;
        tracing::info!("[Collab] Connecting to {}", url.host_str().unwrap_or("server"));

        let (stream, _) = connect_async(url.as_str()).await?;
        let (write, mut read) = stream.split();

        let socket_id = tokio::time::timeout(HANDSHAKE_TIMEOUT, wait_for_connected(&mut read))
            .await
            .map_err(|_| ClientError::Handshake("timed out waiting for connected".to_string()))??;
        tracing::info!("[Collab] Connected as {}", socket_id);

        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::channel(UPDATE_BUFFER);

        tokio::spawn(run_writer(write, outgoing_rx));
        tokio::spawn(run_reader(read, update_tx));

        Ok((
            CollabHandle {
                socket_id,
                outgoing: outgoing_tx,
            },
            update_rx,
        ))
    }
}

async fn wait_for_connected(read: &mut SplitStream<Socket>) -> Result<Uuid, ClientError> {
    while let Some(frame) = read.next().await {
        match frame? {
            Message::Text(text) => {
                return match ServerEvent::from_text(text.as_str())? {
                    ServerEvent::Connected { socket_id } => Ok(socket_id),
                    other => Err(ClientError::Handshake(format!(
                        "expected connected, got {:?}",
                        other
                    ))),
                };
            }
            Message::Close(_) => return Err(ClientError::Closed),
            _ => continue,
        }
    }
    Err(ClientError::Closed)
}

async fn run_writer(
    mut write: SplitSink<Socket, Message>,
    mut outgoing: mpsc::UnboundedReceiver<ClientEvent>,
) {
    while let Some(event) = outgoing.recv().await {
        let text = match event.to_text() {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("[Collab] Failed to encode frame: {}", e);
                continue;
            }
        };
        if let Err(e) = write.send(Message::text(text)).await {
            tracing::warn!("[Collab] Send failed: {}", e);
            break;
        }
    }
    let _ = write.close().await;
    tracing::debug!("[Collab] Writer stopped");
}

async fn run_reader(mut read: SplitStream<Socket>, updates: mpsc::Sender<RemoteUpdate>) {
    while let Some(frame) = read.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!("[Collab] Connection lost: {}", e);
                break;
            }
        };

        match ServerEvent::from_text(text.as_str()) {
            Ok(ServerEvent::NoteUpdated(edit)) => {
                if updates.send(edit).await.is_err() {
                    tracing::debug!("[Collab] Update receiver dropped");
                }
            }
            Ok(ServerEvent::Joined { note_id, subscribers }) => {
                tracing::debug!("[Collab] Joined {} ({} subscribers)", note_id, subscribers);
            }
            Ok(ServerEvent::Left { note_id }) => {
                tracing::debug!("[Collab] Left {}", note_id);
            }
            Ok(ServerEvent::Error { message }) => {
                tracing::warn!("[Collab] Server rejected frame: {}", message);
            }
            Ok(ServerEvent::Connected { .. }) => {}
            Err(e) => tracing::warn!("[Collab] Unreadable frame: {}", e),
        }
    }
    tracing::info!("[Collab] Disconnected");
}
