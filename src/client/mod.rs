//! Client Module
//!
//! Client side of the collaboration layer, compiled with the `client`
//! feature.
//!
//! - **`config`** - `ClientConfig`: server URL, token, save debounce
//! - **`error`** - `ClientError` and `StoreError`
//! - **`store`** - `NoteStore` trait and the REST `HttpNoteStore`
//! - **`socket`** - `Broadcaster` trait and the WebSocket `CollabClient`
//! - **`session`** - `NoteSession`, debounced saves and remote reconciliation
//!
//! # Example
//!
//! ```rust,no_run
//! use notes_collab::client::{ClientConfig, CollabClient, HttpNoteStore, NoteSession};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let (handle, updates) = CollabClient::connect(&config).await?;
//! let session = NoteSession::new(HttpNoteStore::new(config.clone()), handle, config.save_debounce());
//! session.spawn_remote_listener(updates);
//! session.load_notes(None).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod session;
pub mod socket;
pub mod store;

pub use config::ClientConfig;
pub use error::{ClientError, StoreError};
pub use session::{NoteSession, SessionEvent};
pub use socket::{Broadcaster, CollabClient, CollabHandle, RemoteUpdate};
pub use store::{HttpNoteStore, NoteStore};
