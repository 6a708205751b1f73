//! Room fan-out over real sockets

use crate::common::{note, TestServer, TestSocket};
use assert_matches::assert_matches;
use notes_collab::backend::server::ServerConfig;
use notes_collab::shared::{NoteEdit, ServerEvent};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio_tungstenite::tungstenite::Message;

const QUIET: Duration = Duration::from_millis(200);

#[tokio::test]
async fn test_edit_reaches_other_members_only() {
    let server = TestServer::start().await;
    let mut alice = TestSocket::connect(&server.ws_url()).await;
    let mut bob = TestSocket::connect(&server.ws_url()).await;
    let mut carol = TestSocket::connect(&server.ws_url()).await;
    assert_ne!(alice.socket_id, bob.socket_id);

    assert_eq!(alice.join("n1").await, 1);
    assert_eq!(bob.join("n1").await, 2);
    carol.join("n2").await;

    alice.edit("n1", "<p>hello</p>").await;

    assert_eq!(
        bob.recv().await,
        ServerEvent::NoteUpdated(NoteEdit::new(note("n1"), "<p>hello</p>"))
    );
    alice.expect_silence(QUIET).await;
    carol.expect_silence(QUIET).await;
}

#[tokio::test]
async fn test_updates_arrive_in_publish_order() {
    let server = TestServer::start().await;
    let mut writer = TestSocket::connect(&server.ws_url()).await;
    let mut reader = TestSocket::connect(&server.ws_url()).await;
    reader.join("n1").await;

    for i in 0..20 {
        writer.edit("n1", &format!("v{}", i)).await;
    }
    for i in 0..20 {
        assert_matches!(
            reader.recv().await,
            ServerEvent::NoteUpdated(ref edit) if edit.content == format!("v{}", i)
        );
    }
}

#[tokio::test]
async fn test_member_of_several_rooms_gets_each() {
    let server = TestServer::start().await;
    let mut watcher = TestSocket::connect(&server.ws_url()).await;
    let mut editor = TestSocket::connect(&server.ws_url()).await;
    watcher.join("a").await;
    watcher.join("b").await;

    editor.edit("a", "in a").await;
    assert_matches!(watcher.recv().await, ServerEvent::NoteUpdated(ref e) if e.note_id == note("a"));
    editor.edit("b", "in b").await;
    assert_matches!(watcher.recv().await, ServerEvent::NoteUpdated(ref e) if e.note_id == note("b"));
}

#[tokio::test]
async fn test_leave_stops_delivery() {
    let server = TestServer::start().await;
    let mut alice = TestSocket::connect(&server.ws_url()).await;
    let mut bob = TestSocket::connect(&server.ws_url()).await;
    alice.join("n1").await;
    bob.join("n1").await;

    bob.leave("n1").await;
    alice.edit("n1", "after leave").await;
    bob.expect_silence(QUIET).await;
    assert_eq!(server.subscribers("n1").await, 1);
}

#[tokio::test]
async fn test_disconnect_releases_membership() {
    let server = TestServer::start().await;
    let mut alice = TestSocket::connect(&server.ws_url()).await;
    let mut bob = TestSocket::connect(&server.ws_url()).await;
    alice.join("n1").await;
    bob.join("n1").await;

    bob.close().await;
    server.wait_for_subscribers("n1", 1).await;

    alice.close().await;
    server.wait_for_subscribers("n1", 0).await;
}

#[tokio::test]
async fn test_malformed_frames_keep_connection_open() {
    let server = TestServer::start().await;
    let mut socket = TestSocket::connect(&server.ws_url()).await;

    socket.send_raw(Message::text("not json")).await;
    assert_matches!(socket.recv().await, ServerEvent::Error { .. });

    socket
        .send_raw(Message::text(r#"{"event":"explode-note","data":"n1"}"#))
        .await;
    assert_matches!(socket.recv().await, ServerEvent::Error { .. });

    socket.send_raw(Message::binary(vec![1u8, 2, 3])).await;
    assert_matches!(socket.recv().await, ServerEvent::Error { .. });

    socket
        .send_raw(Message::text(r#"{"event":"join-note","data":""}"#))
        .await;
    assert_matches!(socket.recv().await, ServerEvent::Error { .. });

    assert_eq!(socket.join("n1").await, 1);
}

#[tokio::test]
async fn test_oversize_edit_rejected() {
    let server = TestServer::with_config(ServerConfig {
        max_content_bytes: 16,
        ..ServerConfig::default()
    })
    .await;
    let mut alice = TestSocket::connect(&server.ws_url()).await;
    let mut bob = TestSocket::connect(&server.ws_url()).await;
    bob.join("n1").await;

    alice.edit("n1", &"x".repeat(17)).await;
    assert_matches!(alice.recv().await, ServerEvent::Error { ref message } if message.contains("16"));
    bob.expect_silence(QUIET).await;

    alice.edit("n1", &"x".repeat(16)).await;
    assert_matches!(bob.recv().await, ServerEvent::NoteUpdated(_));
}

#[tokio::test]
async fn test_room_limit_per_connection() {
    let server = TestServer::with_config(ServerConfig {
        max_rooms_per_connection: 1,
        ..ServerConfig::default()
    })
    .await;
    let mut socket = TestSocket::connect(&server.ws_url()).await;
    socket.join("a").await;

    socket.send(&notes_collab::shared::ClientEvent::JoinNote(note("b"))).await;
    assert_matches!(socket.recv().await, ServerEvent::Error { .. });

    socket.leave("a").await;
    assert_eq!(socket.join("b").await, 1);
}
