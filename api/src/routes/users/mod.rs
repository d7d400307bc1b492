//! # Users Routes Module
//!
//! Routes for the `/api/users` endpoint group: accounts, roles, student and
//! SSG profiles, and face registration.
//!
//! ## Structure
//! - `get.rs`: listing and lookup
//! - `post.rs`: account, profile and face registration
//! - `put.rs`: updates, role replacement, password change
//! - `delete.rs`: account removal

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use util::state::AppState;

use crate::auth::guards::{
    allow_admin, allow_authenticated, allow_ssg_or_admin, allow_student, allow_student_or_admin,
};

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use delete::delete_user;
use get::{get_me, get_user, list_ssg_members, list_users, list_users_by_role};
use post::{create_ssg_profile, create_student_profile, create_user, register_face};
use put::{change_password, set_roles, update_user};

/// Builds the `/users` route group.
///
/// - `POST /users` → `create_user` (admin)
/// - `GET /users` → `list_users` (admin)
/// - `GET /users/me` → `get_me` (authenticated)
/// - `PUT /users/me/password` → `change_password` (authenticated)
/// - `GET /users/by-role/{role}` → `list_users_by_role` (admin or ssg)
/// - `GET /users/ssg-members` → `list_ssg_members` (authenticated)
/// - `POST /users/students` → `create_student_profile` (student or admin)
/// - `POST /users/students/register-face` → `register_face` (student)
/// - `POST /users/ssg-profile` → `create_ssg_profile` (admin or ssg)
/// - `GET|PUT|DELETE /users/{user_id}` → admin
/// - `PUT /users/{user_id}/roles` → `set_roles` (admin)
pub fn users_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_user).route_layer(from_fn_with_state(app_state.clone(), allow_admin)))
        .route("/", get(list_users).route_layer(from_fn_with_state(app_state.clone(), allow_admin)))
        .route("/me", get(get_me).route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)))
        .route("/me/password", put(change_password).route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)))
        .route(
            "/by-role/{role}",
            get(list_users_by_role).route_layer(from_fn_with_state(app_state.clone(), allow_ssg_or_admin)),
        )
        .route("/ssg-members", get(list_ssg_members).route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)))
        .route(
            "/students",
            post(create_student_profile)
                .route_layer(from_fn_with_state(app_state.clone(), allow_student_or_admin)),
        )
        .route(
            "/students/register-face",
            post(register_face).route_layer(from_fn_with_state(app_state.clone(), allow_student)),
        )
        .route(
            "/ssg-profile",
            post(create_ssg_profile).route_layer(from_fn_with_state(app_state.clone(), allow_ssg_or_admin)),
        )
        .route("/{user_id}", get(get_user).route_layer(from_fn_with_state(app_state.clone(), allow_admin)))
        .route("/{user_id}", put(update_user).route_layer(from_fn_with_state(app_state.clone(), allow_admin)))
        .route("/{user_id}", delete(delete_user).route_layer(from_fn_with_state(app_state.clone(), allow_admin)))
        .route("/{user_id}/roles", put(set_roles).route_layer(from_fn_with_state(app_state.clone(), allow_admin)))
}

/// Parses role names from a request, rejecting unknown ones with a 400.
pub(crate) fn parse_roles(
    raw: &[String],
) -> Result<Vec<db::models::role::RoleName>, crate::response::ApiError> {
    raw.iter()
        .map(|r| {
            r.trim()
                .parse()
                .map_err(|_| crate::response::ApiError::bad_request(format!("Invalid role: {r}")))
        })
        .collect()
}
