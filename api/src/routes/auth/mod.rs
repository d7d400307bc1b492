//! # auth Routes Module
//!
//! Routes for the `/auth` endpoint group.
//!
//! ## Structure
//! - `post.rs`: login (JSON) and OAuth2-style token (form)
//! - `get.rs`: current user info

pub mod get;
pub mod post;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use util::state::AppState;

use crate::auth::guards::allow_authenticated;
use get::get_me;
use post::{login, token};

/// Builds the `/auth` route group.
///
/// - `POST /auth/login` → `login`
/// - `POST /auth/token` → `token`
/// - `GET /auth/me` → `get_me` (authenticated)
pub fn auth_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/token", post(token))
        .route(
            "/me",
            get(get_me).route_layer(from_fn_with_state(app_state, allow_authenticated)),
        )
}
