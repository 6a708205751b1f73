//! Health, room info and the SSE observer feed

use crate::common::{TestServer, TestSocket};
use futures_util::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_health_counts_rooms() {
    let server = TestServer::start().await;
    let body: serde_json::Value = reqwest::get(server.http_url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({ "status": "ok", "rooms": 0 }));

    let mut socket = TestSocket::connect(&server.ws_url()).await;
    socket.join("n1").await;
    let body: serde_json::Value = reqwest::get(server.http_url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["rooms"], 1);
}

#[tokio::test]
async fn test_room_info() {
    let server = TestServer::start().await;
    let mut socket = TestSocket::connect(&server.ws_url()).await;
    socket.join("n1").await;

    let body: serde_json::Value = reqwest::get(server.http_url("/api/rooms/n1"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({ "noteId": "n1", "subscribers": 1 }));
}

#[tokio::test]
async fn test_sse_observer_receives_edits() {
    let server = TestServer::start().await;
    let response = reqwest::get(server.http_url("/api/rooms/n1/events"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/event-stream"
    );
    server.wait_for_subscribers("n1", 1).await;

    let mut editor = TestSocket::connect(&server.ws_url()).await;
    editor.edit("n1", "<p>live</p>").await;

    let mut stream = response.bytes_stream();
    let mut received = String::new();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !received.contains("\n\n") {
        let chunk = tokio::time::timeout_at(deadline, stream.next())
            .await
            .expect("timed out waiting for SSE event")
            .expect("SSE stream ended")
            .unwrap();
        received.push_str(&String::from_utf8_lossy(&chunk));
    }

    assert!(received.contains("event: note-updated"), "got {:?}", received);
    assert!(
        received.contains(r#"data: {"noteId":"n1","content":"<p>live</p>"}"#),
        "got {:?}",
        received
    );
}

#[tokio::test]
async fn test_invalid_room_id_is_bad_request() {
    let server = TestServer::start().await;
    let response = reqwest::get(server.http_url("/api/rooms/%20%20"))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}
