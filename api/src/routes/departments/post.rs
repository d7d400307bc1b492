use axum::{Json, extract::State};
use db::models::department;
use util::state::AppState;

use super::DepartmentRequest;
use crate::response::{ApiResult, created};
use crate::routes::common::validate_body;

/// POST /api/departments
///
/// ### Request Body
/// ```json
/// { "name": "College of Computing" }
/// ```
///
/// - `201 Created`
/// - `400 Bad Request` if the name is empty or already taken
pub async fn create_department(
    State(app_state): State<AppState>,
    Json(req): Json<DepartmentRequest>,
) -> ApiResult<department::Model> {
    validate_body(&req)?;
    let created_department = department::Model::create(app_state.db(), &req.name).await?;
    tracing::info!(department_id = created_department.id, "Department created");
    created(created_department, "Department created successfully")
}
