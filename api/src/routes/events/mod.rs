//! # Events Routes Module
//!
//! `/api/events`: event CRUD with department, program and SSG member sets,
//! plus explicit status transitions.
//!
//! ## Structure
//! - `common.rs`: request and response bodies
//! - `get.rs`, `post.rs`, `put.rs`, `delete.rs`: handlers by method

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, put},
};
use util::state::AppState;

use crate::auth::guards::{allow_authenticated, allow_event_managers, allow_event_staff};

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use delete::delete_event;
use get::{get_event, list_events};
use post::create_event;
use put::{update_event, update_event_status};

/// Builds the `/events` route group.
///
/// - `POST /events` → `create_event` (admin or event-organizer)
/// - `GET /events` → `list_events` (authenticated)
/// - `GET /events/{event_id}` → `get_event` (authenticated)
/// - `PUT /events/{event_id}` → `update_event` (admin or event-organizer)
/// - `PATCH /events/{event_id}/status` → `update_event_status` (admin, event-organizer or ssg)
/// - `DELETE /events/{event_id}` → `delete_event` (admin or event-organizer)
pub fn events_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_event).route_layer(from_fn_with_state(app_state.clone(), allow_event_managers)))
        .route("/", get(list_events).route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)))
        .route("/{event_id}", get(get_event).route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)))
        .route("/{event_id}", put(update_event).route_layer(from_fn_with_state(app_state.clone(), allow_event_managers)))
        .route("/{event_id}", delete(delete_event).route_layer(from_fn_with_state(app_state.clone(), allow_event_managers)))
        .route(
            "/{event_id}/status",
            patch(update_event_status).route_layer(from_fn_with_state(app_state, allow_event_staff)),
        )
}
