/**
 * Router Configuration
 *
 * Combines the collaboration routes with the health probe and wraps them
 * in CORS and request tracing layers.
 *
 * # Route Order
 *
 * 1. Collaboration routes (authenticated when a secret is configured)
 * 2. Health probe
 * 3. Fallback handler (404)
 */

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::backend::collab::handlers::handle_health;
use crate::backend::error::BackendError;
use crate::backend::routes::collab_routes::configure_collab_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// Fails only if a configured CORS origin is not a valid header value,
/// which `ServerConfig::validate` already rules out for loaded configs.
pub fn create_router(app_state: AppState) -> Result<Router<()>, BackendError> {
    let cors = cors_layer(&app_state.config.allowed_origins)?;

    let router = configure_collab_routes(Router::new(), &app_state)
        .route("/health", get(handle_health))
        .fallback(|| async {
            BackendError::handler(axum::http::StatusCode::NOT_FOUND, "not found")
        });

    Ok(router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer, BackendError> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|e| {
                BackendError::state(format!("invalid CORS origin {:?}: {}", origin, e))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}
