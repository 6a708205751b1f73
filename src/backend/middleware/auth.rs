/**
 * Authentication Middleware
 *
 * Guards the socket and room endpoints when a JWT secret is configured.
 * The token is taken from `Authorization: Bearer <token>` or, because
 * browsers cannot set headers on a WebSocket upgrade, from the `token`
 * query parameter. The verified user is attached to the request
 * extensions for handlers that want it.
 *
 * Without a configured secret every request passes through untouched.
 */

use axum::{
    extract::{Query, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Authenticated user data extracted from the JWT
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
}

pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let Some(verifier) = app_state.verifier.as_ref() else {
        return Ok(next.run(request).await);
    };

    let token = bearer_token(&request)
        .or_else(|| query_token(&request))
        .ok_or_else(|| {
            tracing::warn!("Missing credentials on {}", request.uri().path());
            BackendError::unauthorized("missing bearer token")
        })?;

    let claims = verifier.verify(&token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        BackendError::unauthorized("invalid or expired token")
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn query_token(request: &Request) -> Option<String> {
    let Query(params) = Query::<HashMap<String, String>>::try_from_uri(request.uri()).ok()?;
    params.get("token").cloned().filter(|token| !token.is_empty())
}
