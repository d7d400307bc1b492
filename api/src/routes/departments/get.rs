use axum::extract::{Path, Query, State};
use db::models::department;
use util::state::AppState;

use crate::response::{ApiResult, ok};
use crate::routes::common::Pagination;

/// GET /api/departments
pub async fn list_departments(
    State(app_state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Vec<department::Model>> {
    let items = department::Model::list(app_state.db(), page.skip(), page.limit()).await?;
    ok(items, "Departments retrieved successfully")
}

/// GET /api/departments/{department_id}
///
/// - `404 Not Found` if the department does not exist
pub async fn get_department(
    State(app_state): State<AppState>,
    Path(department_id): Path<i64>,
) -> ApiResult<department::Model> {
    ok(
        department::Model::get(app_state.db(), department_id).await?,
        "Department retrieved successfully",
    )
}
