/**
 * Collaboration Routes
 *
 * - `GET /ws` - WebSocket upgrade
 * - `GET /api/rooms/{note_id}` - Room subscriber count
 * - `GET /api/rooms/{note_id}/events` - SSE feed of a room
 *
 * All three sit behind `auth_middleware`, which is a pass-through unless a
 * JWT secret is configured.
 */

use axum::{middleware, routing::get, Router};
use crate::backend::collab::handlers::{
    handle_room_events, handle_room_info, handle_socket_upgrade,
};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;

pub fn configure_collab_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/ws", get(handle_socket_upgrade))
        .route("/api/rooms/{note_id}", get(handle_room_info))
        .route("/api/rooms/{note_id}/events", get(handle_room_events))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    router.merge(protected)
}
