//! Backend Module
//!
//! Server side of the collaboration layer, compiled with the `ssr` feature.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - Router assembly and middleware layers
//! - **`collab`** - Per-note rooms, socket connections, SSE feed
//! - **`auth`** - JWT verification
//! - **`middleware`** - Request authentication
//! - **`error`** - `BackendError` and its HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - notes-collab-server binary
//! ├── server/         - Config, state, init
//! ├── routes/         - Route configuration
//! ├── collab/         - Rooms and handlers
//! ├── auth/           - JWT tokens
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # Thread Safety
//!
//! The room registry is a `std::sync::Mutex<HashMap<..>>` whose critical
//! sections never await. Fan-out happens through `tokio::sync::broadcast`,
//! so a slow socket lags on its own receiver instead of blocking others.

pub mod auth;
pub mod collab;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
