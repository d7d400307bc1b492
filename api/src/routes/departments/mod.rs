//! # Departments Routes Module
//!
//! `/api/departments`: reads for any authenticated user, writes for admins.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use util::state::AppState;

use crate::auth::guards::{allow_admin, allow_authenticated};

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use delete::delete_department;
use get::{get_department, list_departments};
use post::create_department;
use put::update_department;

pub fn departments_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_department).route_layer(from_fn_with_state(app_state.clone(), allow_admin)))
        .route("/", get(list_departments).route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)))
        .route("/{department_id}", get(get_department).route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)))
        .route("/{department_id}", put(update_department).route_layer(from_fn_with_state(app_state.clone(), allow_admin)))
        .route("/{department_id}", delete(delete_department).route_layer(from_fn_with_state(app_state, allow_admin)))
}

#[derive(Debug, serde::Deserialize, validator::Validate)]
pub struct DepartmentRequest {
    #[validate(length(min = 1, max = 100, message = "Department name must be 1-100 characters"))]
    pub name: String,
}
