use axum::extract::{Path, State};
use db::models::department;
use util::state::AppState;

use crate::response::{ApiResult, Empty, ok};

/// DELETE /api/departments/{department_id}
///
/// - `400 Bad Request` while any student profile references the department
/// - `404 Not Found` if the department does not exist
pub async fn delete_department(
    State(app_state): State<AppState>,
    Path(department_id): Path<i64>,
) -> ApiResult<Empty> {
    department::Model::delete(app_state.db(), department_id).await?;
    tracing::info!(department_id, "Department deleted");
    ok(Empty::default(), "Department deleted successfully")
}
