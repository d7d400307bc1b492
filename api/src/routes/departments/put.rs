use axum::{
    Json,
    extract::{Path, State},
};
use db::models::department;
use util::state::AppState;

use super::DepartmentRequest;
use crate::response::{ApiResult, ok};
use crate::routes::common::validate_body;

/// PUT /api/departments/{department_id}
///
/// - `400 Bad Request` if the new name belongs to another department
/// - `404 Not Found` if the department does not exist
pub async fn update_department(
    State(app_state): State<AppState>,
    Path(department_id): Path<i64>,
    Json(req): Json<DepartmentRequest>,
) -> ApiResult<department::Model> {
    validate_body(&req)?;
    let renamed = department::Model::rename(app_state.db(), department_id, &req.name).await?;
    ok(renamed, "Department updated successfully")
}
