//! Banking service routes

use axum::{
    Json, Router, middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::{AppState, middleware::auth_middleware, token::SESSION_TTL_SECONDS};

pub mod account;
pub mod auth;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

/// Create the router for the banking service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/accounts",
            post(account::create_account).get(account::get_accounts),
        )
        .route("/accounts/:id/fund", post(account::fund_account))
        .route("/accounts/:id/transactions", get(account::get_transactions))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "bank-service"
    }))
}

/// Build the session cookie set on signup and login
pub(crate) fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(SESSION_TTL_SECONDS as i64))
        .build()
}

/// Build the cookie used to clear the session on logout
pub(crate) fn expired_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");
    cookie
}
