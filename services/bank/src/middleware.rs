//! Middleware for session-cookie authentication

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use tracing::error;

use crate::{AppState, error::ApiError, routes::SESSION_COOKIE};

/// Authenticate a request from its session cookie
///
/// The token must carry a valid signature and expiry, and a live session
/// row must still hold it (logout or a newer login elsewhere invalidates
/// older tokens). The resolved user is stored in request extensions for
/// handlers.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    let claims = state
        .token_service
        .validate(&token)
        .map_err(|_| ApiError::Unauthorized("Not authenticated".to_string()))?;

    let session = state
        .session_repository
        .find_active_by_token(&token)
        .await
        .map_err(|e| {
            error!("Failed to look up session: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    if session.user_id != claims.sub {
        return Err(ApiError::Unauthorized("Not authenticated".to_string()));
    }

    let user = state
        .user_repository
        .find_by_id(claims.sub)
        .await
        .map_err(|e| {
            error!("Failed to load user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    // Make the authenticated user available to handlers
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
