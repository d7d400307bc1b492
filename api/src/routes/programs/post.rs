use axum::{Json, extract::State};
use db::models::program::{self, ProgramWithDepartments};
use serde::Deserialize;
use util::state::AppState;
use validator::Validate;

use crate::response::{ApiResult, created};
use crate::routes::common::validate_body;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProgramRequest {
    #[validate(length(min = 1, max = 100, message = "Program name must be 1-100 characters"))]
    pub name: String,
    #[serde(default)]
    pub department_ids: Vec<i64>,
}

/// POST /api/programs
///
/// ### Request Body
/// ```json
/// { "name": "BS Computer Science", "department_ids": [1, 2] }
/// ```
///
/// The name is stored trimmed and lower-cased.
///
/// - `201 Created` with the program and its `department_ids`
/// - `400 Bad Request` if a program with the same name (ignoring case) exists
/// - `404 Not Found` listing any unknown department ids; nothing is created
pub async fn create_program(
    State(app_state): State<AppState>,
    Json(req): Json<CreateProgramRequest>,
) -> ApiResult<ProgramWithDepartments> {
    validate_body(&req)?;
    let db = app_state.db();
    let created_program = program::Model::create(db, &req.name, &req.department_ids).await?;
    created(
        created_program.with_departments(db).await?,
        "Program created successfully",
    )
}
