//! HTTP route entry point for `/api/...`.
//!
//! Route groups are organized by domain, each carrying its own per-route
//! access control:
//! - `/health` → liveness probe (public)
//! - `/auth` → login, OAuth2 password token, current user
//! - `/users` → accounts, roles, student and SSG profiles, face registration
//! - `/departments`, `/programs` → academic catalog
//! - `/events` → event CRUD, scoping and status transitions
//! - `/attendance` → check-in/out, excuses, absentee sweep, reports

use crate::routes::{
    attendance::attendance_routes, auth::auth_routes, departments::departments_routes,
    events::events_routes, health::health_routes, programs::programs_routes,
    users::users_routes,
};
use axum::Router;
use util::state::AppState;

pub mod attendance;
pub mod auth;
pub mod common;
pub mod departments;
pub mod events;
pub mod health;
pub mod programs;
pub mod users;

/// Builds the complete `/api` router with its state attached.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes(app_state.clone()))
        .nest("/users", users_routes(app_state.clone()))
        .nest("/departments", departments_routes(app_state.clone()))
        .nest("/programs", programs_routes(app_state.clone()))
        .nest("/events", events_routes(app_state.clone()))
        .nest("/attendance", attendance_routes(app_state.clone()))
        .with_state(app_state)
}
