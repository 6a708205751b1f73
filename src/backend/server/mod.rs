//! Server Module
//!
//! - **`config`** - `ServerConfig` loading from TOML and environment
//! - **`state`** - `AppState` and `FromRef` implementations
//! - **`init`** - App creation and the room cleanup task
//!
//! # Initialization Flow
//!
//! 1. `ServerConfig::load()` reads `NOTES_COLLAB_CONFIG` (optional) then env overrides
//! 2. `create_app` builds state, router and the cleanup task
//! 3. The binary binds `ServerConfig::socket_addr()` and serves

/// Server configuration loading
pub mod config;

/// Application state management
pub mod state;

/// Server initialization
pub mod init;

pub use config::{ConfigError, ServerConfig};
pub use init::create_app;
pub use state::AppState;
