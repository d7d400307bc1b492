use axum::extract::{Path, State};
use db::models::user;
use util::state::AppState;

use crate::response::{ApiResult, Empty, ok};

/// DELETE /api/users/{user_id}
///
/// Removes the user together with its roles and profiles.
///
/// - `200 OK`
/// - `404 Not Found` if the user does not exist
pub async fn delete_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Empty> {
    user::Model::delete(app_state.db(), user_id).await?;
    ok(Empty::default(), "User deleted successfully")
}
