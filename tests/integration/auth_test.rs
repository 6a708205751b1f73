//! Token checks on the socket and room endpoints

use crate::common::{test_token, TestServer, TestSocket, TEST_JWT_SECRET};
use assert_matches::assert_matches;
use notes_collab::backend::server::ServerConfig;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Error as WsError;

async fn secured_server() -> TestServer {
    TestServer::with_config(ServerConfig {
        jwt_secret: Some(TEST_JWT_SECRET.to_string()),
        ..ServerConfig::default()
    })
    .await
}

#[tokio::test]
async fn test_socket_without_token_rejected() {
    let server = secured_server().await;
    let result = connect_async(server.ws_url()).await;
    assert_matches!(result, Err(WsError::Http(ref response)) if response.status() == 401);
}

#[tokio::test]
async fn test_socket_with_bad_token_rejected() {
    let server = secured_server().await;
    let result = connect_async(format!("{}?token=not-a-jwt", server.ws_url())).await;
    assert_matches!(result, Err(WsError::Http(ref response)) if response.status() == 401);
}

#[tokio::test]
async fn test_socket_accepts_query_token() {
    let server = secured_server().await;
    let url = format!("{}?token={}", server.ws_url(), test_token("alice"));
    let mut socket = TestSocket::connect(&url).await;
    assert_eq!(socket.join("n1").await, 1);
}

#[tokio::test]
async fn test_socket_accepts_bearer_header() {
    let server = secured_server().await;
    let mut request = server.ws_url().into_client_request().unwrap();
    request.headers_mut().insert(
        "Authorization",
        format!("Bearer {}", test_token("bob")).parse().unwrap(),
    );
    let (_stream, response) = connect_async(request).await.unwrap();
    assert_eq!(response.status(), 101);
}

#[tokio::test]
async fn test_room_info_requires_token() {
    let server = secured_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.http_url("/api/rooms/n1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], 401);

    let response = client
        .get(server.http_url("/api/rooms/n1"))
        .bearer_auth(test_token("alice"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client.get(server.http_url("/health")).send().await.unwrap();
    assert_eq!(response.status(), 200);
}
