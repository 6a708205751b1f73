//! Two note sessions collaborating through a real server, with the notes
//! API mocked

use crate::common::{note, TestServer, TestSocket};
use assert_matches::assert_matches;
use notes_collab::client::{
    Broadcaster, ClientConfig, CollabClient, HttpNoteStore, NoteSession, SessionEvent,
};
use notes_collab::shared::{NoteEdit, ServerEvent};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use tokio::sync::broadcast;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const DEBOUNCE: Duration = Duration::from_millis(50);

async fn notes_api() -> MockServer {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "n1", "title": "Shared", "content": "<p>start</p>" },
            { "_id": "n2", "title": "Other", "content": "" }
        ])))
        .mount(&api)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/notes/n1"))
        .respond_with(|request: &Request| {
            let body: serde_json::Value = request.body_json().unwrap();
            ResponseTemplate::new(200).set_body_json(json!({
                "msg": "Note updated",
                "note": {
                    "_id": "n1",
                    "title": body["title"],
                    "content": body["content"],
                }
            }))
        })
        .mount(&api)
        .await;
    api
}

async fn session(
    server: &TestServer,
    api: &MockServer,
) -> NoteSession<HttpNoteStore, notes_collab::client::CollabHandle> {
    let socket_config = ClientConfig::new(&server.http_url("")).unwrap();
    let (handle, updates) = CollabClient::connect(&socket_config).await.unwrap();

    let store_config = ClientConfig::new(&api.uri()).unwrap();
    let session = NoteSession::new(HttpNoteStore::new(store_config), handle, DEBOUNCE);
    session.spawn_remote_listener(updates);
    session.load_notes(None).await.unwrap();
    session
}

async fn next_matching(
    events: &mut broadcast::Receiver<SessionEvent>,
    wanted: impl Fn(&SessionEvent) -> bool,
) -> SessionEvent {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = events.recv().await.unwrap();
            if wanted(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for session event")
}

#[tokio::test]
async fn test_saved_edit_reaches_collaborator() {
    let server = TestServer::start().await;
    let api = notes_api().await;
    let alice = session(&server, &api).await;
    let bob = session(&server, &api).await;

    alice.open_note(&note("n1")).unwrap();
    bob.open_note(&note("n1")).unwrap();
    server.wait_for_subscribers("n1", 2).await;

    let mut alice_events = alice.subscribe();
    let mut bob_events = bob.subscribe();
    alice.edit_content("<p>a</p>");
    alice.edit_content("<p>ab</p>");

    let saved = next_matching(&mut alice_events, |e| matches!(e, SessionEvent::Saved(_))).await;
    assert_matches!(saved, SessionEvent::Saved(ref n) if n.content == "<p>ab</p>");

    let applied = next_matching(&mut bob_events, |e| {
        matches!(e, SessionEvent::RemoteApplied(_))
    })
    .await;
    assert_eq!(
        applied,
        SessionEvent::RemoteApplied(NoteEdit::new(note("n1"), "<p>ab</p>"))
    );
    assert_eq!(bob.selected().unwrap().content, "<p>ab</p>");
    assert!(!alice.is_saving(&note("n1")));

    // debounced: one PUT for two edits
    let puts = api
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "PUT")
        .count();
    assert_eq!(puts, 1);
}

#[tokio::test]
async fn test_switching_notes_moves_room() {
    let server = TestServer::start().await;
    let api = notes_api().await;
    let alice = session(&server, &api).await;

    alice.open_note(&note("n1")).unwrap();
    server.wait_for_subscribers("n1", 1).await;

    alice.open_note(&note("n2")).unwrap();
    server.wait_for_subscribers("n2", 1).await;
    server.wait_for_subscribers("n1", 0).await;

    // an edit to the old room no longer reaches the session
    let mut events = alice.subscribe();
    let mut outsider = TestSocket::connect(&server.ws_url()).await;
    outsider.edit("n1", "stale").await;
    outsider.edit("n2", "fresh").await;

    let applied = next_matching(&mut events, |e| matches!(e, SessionEvent::RemoteApplied(_))).await;
    assert_eq!(
        applied,
        SessionEvent::RemoteApplied(NoteEdit::new(note("n2"), "fresh"))
    );
    assert_eq!(alice.notes()[0].content, "<p>start</p>");
}

#[tokio::test]
async fn test_collab_handle_is_broadcaster() {
    let server = TestServer::start().await;
    let config = ClientConfig::new(&server.http_url("")).unwrap();
    let (handle, mut updates) = CollabClient::connect(&config).await.unwrap();
    assert!(handle.is_connected());

    let mut peer = TestSocket::connect(&server.ws_url()).await;
    peer.join("n1").await;

    handle.join(&note("n1"));
    server.wait_for_subscribers("n1", 2).await;

    handle.publish_edit(NoteEdit::new(note("n1"), "from handle"));
    assert_eq!(
        peer.recv().await,
        ServerEvent::NoteUpdated(NoteEdit::new(note("n1"), "from handle"))
    );

    peer.edit("n1", "from peer").await;
    let update = tokio::time::timeout(Duration::from_secs(2), updates.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(update.content, "from peer");

    handle.leave(&note("n1"));
    server.wait_for_subscribers("n1", 1).await;
}

#[tokio::test]
async fn test_dropping_session_flushes_queued_frames() {
    let server = TestServer::start().await;
    let api = notes_api().await;
    let mut peer = TestSocket::connect(&server.ws_url()).await;
    peer.join("n1").await;

    let socket_config = ClientConfig::new(&server.http_url("")).unwrap();
    let (handle, mut updates) = CollabClient::connect(&socket_config).await.unwrap();
    let store_config = ClientConfig::new(&api.uri()).unwrap();
    let session = NoteSession::new(HttpNoteStore::new(store_config), handle, DEBOUNCE);
    let mut events = session.subscribe();
    session.load_notes(Some(&note("n1"))).await.unwrap();
    server.wait_for_subscribers("n1", 2).await;

    session.edit_content("<p>last words</p>");
    next_matching(&mut events, |e| matches!(e, SessionEvent::Saved(_))).await;
    session.close_note();

    // the update channel closes only once the writer has drained and closed
    drop(session);
    tokio::time::timeout(Duration::from_secs(5), async {
        while updates.recv().await.is_some() {}
    })
    .await
    .expect("socket did not close");

    assert_eq!(
        peer.recv().await,
        ServerEvent::NoteUpdated(NoteEdit::new(note("n1"), "<p>last words</p>"))
    );
    server.wait_for_subscribers("n1", 1).await;
}
