//! Notes Collab - Main Library
//!
//! Real-time collaboration layer for a notes application: a server that
//! fans note edits out to everyone who has the note open, and the client
//! protocol that debounces saves, broadcasts them and applies edits made
//! by others.
//!
//! There is no merging. The last save to reach the store is the stored
//! content and the last broadcast to arrive is the displayed one.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between client and server
//!   - Wire protocol (`ClientEvent`, `ServerEvent`)
//!   - `Note`, `NoteId`, `SharedError`
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum WebSocket and SSE handlers
//!   - Per-note room hub built on `tokio::sync::broadcast`
//!   - Configuration, JWT authentication, error responses
//!
//! - **`client`** - Client-side code (only compiled with `client` feature)
//!   - WebSocket collaboration client
//!   - REST note store client
//!   - `NoteSession` with debounced saves
//!
//! # Feature Flags
//!
//! - **`ssr`** - Server (Axum, tower-http, jsonwebtoken)
//! - **`client`** - Client (reqwest, tokio-tungstenite, clap)
//!
//! Both are enabled by default.
//!
//! # Usage
//!
//! ```rust,no_run
//! use notes_collab::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::load()?;
//! let listener = tokio::net::TcpListener::bind(config.socket_addr()?).await?;
//! axum::serve(listener, create_app(config)?).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

/// Collaboration client
#[cfg(feature = "client")]
pub mod client;
