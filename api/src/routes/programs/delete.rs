use axum::extract::{Path, State};
use db::models::program;
use util::state::AppState;

use crate::response::{ApiResult, Empty, ok};

/// DELETE /api/programs/{program_id}
///
/// - `400 Bad Request` while students are enrolled in the program
pub async fn delete_program(
    State(app_state): State<AppState>,
    Path(program_id): Path<i64>,
) -> ApiResult<Empty> {
    program::Model::delete(app_state.db(), program_id).await?;
    ok(Empty::default(), "Program deleted successfully")
}
