use axum::{
    Json,
    extract::{Path, State},
};
use db::models::program::{self, ProgramWithDepartments};
use serde::Deserialize;
use util::state::AppState;
use validator::Validate;

use crate::response::{ApiResult, ok};
use crate::routes::common::validate_body;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProgramRequest {
    #[validate(length(min = 1, max = 100, message = "Program name must be 1-100 characters"))]
    pub name: Option<String>,
    /// Replaces the whole department set when present.
    pub department_ids: Option<Vec<i64>>,
}

/// PUT /api/programs/{program_id}
pub async fn update_program(
    State(app_state): State<AppState>,
    Path(program_id): Path<i64>,
    Json(req): Json<UpdateProgramRequest>,
) -> ApiResult<ProgramWithDepartments> {
    validate_body(&req)?;
    let db = app_state.db();
    let updated = program::Model::update(
        db,
        program_id,
        req.name.as_deref(),
        req.department_ids.as_deref(),
    )
    .await?;
    ok(updated.with_departments(db).await?, "Program updated successfully")
}
