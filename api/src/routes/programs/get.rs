use axum::extract::{Path, Query, State};
use db::models::program::{self, ProgramWithDepartments};
use util::state::AppState;

use crate::response::{ApiResult, ok};
use crate::routes::common::Pagination;

/// GET /api/programs
///
/// Each program carries its `department_ids`.
pub async fn list_programs(
    State(app_state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Vec<ProgramWithDepartments>> {
    let items = program::Model::list(app_state.db(), page.skip(), page.limit()).await?;
    ok(items, "Programs retrieved successfully")
}

/// GET /api/programs/{program_id}
pub async fn get_program(
    State(app_state): State<AppState>,
    Path(program_id): Path<i64>,
) -> ApiResult<ProgramWithDepartments> {
    let db = app_state.db();
    let found = program::Model::get(db, program_id).await?;
    ok(found.with_departments(db).await?, "Program retrieved successfully")
}
