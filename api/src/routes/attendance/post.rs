use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use chrono::{Duration, Utc};
use db::models::attendance::{self, BulkReport, ExcuseReport};
use util::{config, state::AppState};

use super::common::{
    BulkRequest, CheckOut, ExcuseRequest, FaceImageQuery, FaceScanRequest, FaceScanResult,
    ManualCheckInRequest, SweepResult,
};
use crate::auth::CurrentUser;
use crate::response::{ApiError, ApiResult, created, ok};
use crate::routes::common::{read_upload, validate_body};

fn cooldown() -> Duration {
    Duration::seconds(config::scan_cooldown_seconds())
}

/// POST /api/attendance/manual
///
/// ### Request Body
/// ```json
/// { "event_id": 3, "student_id": "CS-2023-001", "notes": "Late arrival" }
/// ```
///
/// ### Responses
/// - `201 Created` with the new record (`present`, `manual`, verified by the caller)
/// - `400 Bad Request` if the event is cancelled or the student already has a record
/// - `404 Not Found` for an unknown event or student
pub async fn manual_check_in(
    State(app_state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<ManualCheckInRequest>,
) -> ApiResult<attendance::Model> {
    validate_body(&req)?;
    let record = attendance::Model::check_in_manual(
        app_state.db(),
        req.event_id,
        &req.student_id,
        current.id(),
        req.notes.filter(|n| !n.trim().is_empty()),
        Utc::now(),
    )
    .await?;
    created(record, "Attendance recorded successfully")
}

/// POST /api/attendance/face-scan
///
/// Check-in for a student already identified by the scanner.
///
/// - `201 Created`
/// - `400 Bad Request` with `Duplicate scan detected. Last scan was N minutes ago.`
///   inside the cooldown, or when the student is still checked in
pub async fn face_scan(
    State(app_state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<FaceScanRequest>,
) -> ApiResult<attendance::Model> {
    validate_body(&req)?;
    let record = attendance::Model::check_in_face(
        app_state.db(),
        req.event_id,
        &req.student_id,
        Some(current.id()),
        Utc::now(),
        cooldown(),
    )
    .await?;
    created(record, "Face scan attendance recorded")
}

/// POST /api/attendance/face-scan/image?event_id={event_id}
///
/// Multipart upload with a `file` field. The capture is matched against the
/// registered faces, then recorded like `/face-scan`.
///
/// - `400 Bad Request` (`Face recognition failed`) when no registered face is close enough
pub async fn face_scan_image(
    State(app_state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<FaceImageQuery>,
    multipart: Multipart,
) -> ApiResult<FaceScanResult> {
    let upload = read_upload(multipart).await?;
    let matched = app_state
        .faces()
        .recognize(&upload)
        .map_err(|e| {
            tracing::info!(error = %e, "Unreadable face capture");
            ApiError::bad_request("Face recognition failed")
        })?
        .ok_or_else(|| ApiError::bad_request("Face recognition failed"))?;

    let record = attendance::Model::check_in_face(
        app_state.db(),
        query.event_id,
        &matched.student_id,
        Some(current.id()),
        Utc::now(),
        cooldown(),
    )
    .await?;

    created(
        FaceScanResult {
            student_id: matched.student_id,
            distance: matched.distance,
            attendance: record,
        },
        "Face recognized and attendance recorded",
    )
}

/// POST /api/attendance/face-scan-timeout
///
/// Closes the student's open record for the event.
///
/// - `404 Not Found` (`No active attendance record found`) if nothing is open
pub async fn face_scan_timeout(
    State(app_state): State<AppState>,
    Json(req): Json<FaceScanRequest>,
) -> ApiResult<CheckOut> {
    validate_body(&req)?;
    let closed =
        attendance::Model::check_out_active(app_state.db(), req.event_id, &req.student_id, Utc::now())
            .await?;
    ok(closed.into(), "Time-out recorded successfully")
}

/// POST /api/attendance/{attendance_id}/time-out
///
/// ### Response
/// ```json
/// {
///   "success": true,
///   "data": {
///     "attendance_id": 7,
///     "time_in": "2025-08-01T09:01:00Z",
///     "time_out": "2025-08-01T10:46:00Z",
///     "duration_minutes": 105
///   },
///   "message": "Time-out recorded successfully"
/// }
/// ```
///
/// - `400 Bad Request` (`Time-out already recorded`) on a second call
/// - `404 Not Found` (`Attendance record not found`)
pub async fn record_time_out(
    State(app_state): State<AppState>,
    Path(attendance_id): Path<i64>,
) -> ApiResult<CheckOut> {
    let closed = attendance::Model::check_out(app_state.db(), attendance_id, Utc::now()).await?;
    ok(closed.into(), "Time-out recorded successfully")
}

/// POST /api/attendance/bulk
///
/// ```json
/// { "records": [ { "event_id": 3, "student_id": "CS-2023-001" } ] }
/// ```
///
/// Every item gets its own outcome (`recorded`, `exists`, `not_found`);
/// one bad item never fails the batch.
pub async fn bulk_mark(
    State(app_state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<BulkRequest>,
) -> ApiResult<BulkReport> {
    let report =
        attendance::Model::mark_bulk(app_state.db(), &req.records, current.id(), Utc::now()).await?;
    tracing::info!(processed = report.processed, "Bulk attendance");
    ok(report, "Bulk attendance processed")
}

/// POST /api/attendance/events/{event_id}/mark-excused
///
/// ```json
/// { "student_ids": ["CS-2023-001", "CS-2023-002"], "reason": "Varsity game" }
/// ```
pub async fn mark_excused(
    State(app_state): State<AppState>,
    current: CurrentUser,
    Path(event_id): Path<i64>,
    Json(req): Json<ExcuseRequest>,
) -> ApiResult<ExcuseReport> {
    validate_body(&req)?;
    let report = attendance::Model::mark_excused(
        app_state.db(),
        event_id,
        &req.student_ids,
        req.reason.trim(),
        current.id(),
        Utc::now(),
    )
    .await?;
    ok(report, "Excused attendance recorded")
}

/// POST /api/attendance/events/{event_id}/mark-absent
///
/// Absentee sweep for a completed event: every `present` record without a
/// time-out becomes `absent`.
///
/// - `400 Bad Request` unless the event is `completed`
/// - `404 Not Found` for an unknown event
pub async fn mark_absent(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<SweepResult> {
    let ids = attendance::Model::sweep_absent(app_state.db(), event_id).await?;
    ok(
        SweepResult {
            event_id,
            updated: ids.len(),
            attendance_ids: ids,
        },
        "Absentees marked",
    )
}

/// POST /api/attendance/{attendance_id}/verify
pub async fn verify_attendance(
    State(app_state): State<AppState>,
    current: CurrentUser,
    Path(attendance_id): Path<i64>,
) -> ApiResult<attendance::Model> {
    let record = attendance::Model::verify(app_state.db(), attendance_id, current.id()).await?;
    ok(record, "Attendance verified")
}
