//! # Programs Routes Module
//!
//! `/api/programs`: academic programs and the departments offering them.

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

use delete::delete_program;
use get::{get_program, list_programs};
use post::create_program;
use put::update_program;

pub fn programs_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_program).route_layer(from_fn_with_state(app_state.clone(), allow_admin)))
        .route("/", get(list_programs).route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)))
        .route("/{program_id}", get(get_program).route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)))
        .route("/{program_id}", put(update_program).route_layer(from_fn_with_state(app_state.clone(), allow_admin)))
        .route("/{program_id}", delete(delete_program).route_layer(from_fn_with_state(app_state, allow_admin)))
}
