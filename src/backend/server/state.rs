/**
 * Application State Management
 *
 * `AppState` is cloned into every handler. It holds the room hub, the
 * loaded configuration and, when a JWT secret is configured, the token
 * verifier used by the auth middleware.
 *
 * The `FromRef` implementations let handlers extract just the piece they
 * need, e.g. `State(hub): State<RoomHub>`.
 */

use axum::extract::FromRef;
use std::sync::Arc;
use crate::backend::auth::TokenVerifier;
use crate::backend::collab::connection::ConnectionLimits;
use crate::backend::collab::state::RoomHub;
use crate::backend::server::config::ServerConfig;

#[derive(Clone, Debug)]
pub struct AppState {
    /// Per-note broadcast rooms
    pub hub: RoomHub,

    /// Loaded server configuration
    pub config: Arc<ServerConfig>,

    /// Present when `jwt_secret` is configured
    pub verifier: Option<Arc<TokenVerifier>>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let verifier = config
            .jwt_secret
            .as_deref()
            .map(|secret| Arc::new(TokenVerifier::new(secret)));
        Self {
            hub: RoomHub::new(config.room_capacity),
            config: Arc::new(config),
            verifier,
        }
    }

    /// Limits applied to every socket connection
    pub fn connection_limits(&self) -> ConnectionLimits {
        ConnectionLimits {
            max_rooms: self.config.max_rooms_per_connection,
            max_content_bytes: self.config.max_content_bytes,
        }
    }
}

impl FromRef<AppState> for RoomHub {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.hub.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
