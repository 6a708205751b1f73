//! Test server spawned on 127.0.0.1:0

use notes_collab::backend::server::{create_app, ServerConfig};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub struct TestServer {
    pub addr: SocketAddr,
    task: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::with_config(ServerConfig::default()).await
    }

    pub async fn with_config(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let app = create_app(config).expect("Failed to create app");
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server failed");
        });
        Self { addr, task }
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Current subscriber count of a room, read through the HTTP API
    pub async fn subscribers(&self, note_id: &str) -> usize {
        let body: serde_json::Value = reqwest::get(self.http_url(&format!("/api/rooms/{}", note_id)))
            .await
            .expect("room info request failed")
            .json()
            .await
            .expect("room info is not JSON");
        body["subscribers"].as_u64().expect("missing subscribers") as usize
    }

    /// Poll until a room reaches `expected` subscribers
    pub async fn wait_for_subscribers(&self, note_id: &str, expected: usize) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let current = self.subscribers(note_id).await;
            if current == expected {
                return;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "room {} stuck at {} subscribers, expected {}",
                note_id,
                current,
                expected
            );
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
