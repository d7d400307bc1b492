pub mod auth;
pub mod response;
pub mod routes;

use axum::{Router, middleware::from_fn};
use util::state::AppState;

use crate::auth::middleware::log_request;

/// The full application: every route group under `/api`, with request logging.
pub fn app(app_state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::routes(app_state))
        .layer(from_fn(log_request))
}
