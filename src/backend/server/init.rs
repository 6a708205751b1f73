/**
 * Server Initialization
 *
 * 1. Build `AppState` from the loaded configuration
 * 2. Create the router with all routes and layers
 * 3. Start the periodic room cleanup task
 *
 * Rooms are normally pruned as soon as their last member leaves; the
 * cleanup task sweeps up any that slipped through, e.g. rooms created by
 * an SSE observer whose stream was dropped mid-request.
 */

use axum::Router;
use crate::backend::collab::state::RoomHub;
use crate::backend::error::BackendError;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Create and configure the Axum application
///
/// Must be called from within a Tokio runtime because it spawns the room
/// cleanup task.
pub fn create_app(config: ServerConfig) -> Result<Router<()>, BackendError> {
    config.validate()?;
    tracing::info!("Initializing notes collaboration server");

    let cleanup_interval = config.cleanup_interval();
    let app_state = AppState::new(config);
    if app_state.verifier.is_some() {
        tracing::info!("JWT authentication enabled for socket and room endpoints");
    } else {
        tracing::warn!("No JWT secret configured, socket and room endpoints are open");
    }

    let app = create_router(app_state.clone())?;

    spawn_room_cleanup(app_state.hub.clone(), cleanup_interval);
    tracing::info!("Router configured with periodic cleanup task");

    Ok(app)
}

/// Periodically drop rooms that have no subscribers left
pub fn spawn_room_cleanup(hub: RoomHub, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            let removed = hub.cleanup_inactive_rooms();
            if removed > 0 {
                tracing::debug!("[Collab] Cleaned up {} inactive rooms", removed);
            }
        }
    })
}
