use axum::{
    Json,
    extract::{Path, State},
};
use db::models::attendance;
use util::state::AppState;

use super::common::OverrideRequest;
use crate::response::{ApiResult, ok};
use crate::routes::common::validate_body;

/// PUT /api/attendance/{attendance_id}/status
///
/// Administrative override; any status may be set from any state.
///
/// ```json
/// { "status": "excused", "notes": "Approved by dean" }
/// ```
pub async fn override_status(
    State(app_state): State<AppState>,
    Path(attendance_id): Path<i64>,
    Json(req): Json<OverrideRequest>,
) -> ApiResult<attendance::Model> {
    validate_body(&req)?;
    let record =
        attendance::Model::override_status(app_state.db(), attendance_id, req.status, req.notes)
            .await?;
    tracing::info!(attendance_id, status = %record.status, "Attendance status overridden");
    ok(record, "Attendance status updated")
}
