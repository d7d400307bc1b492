use axum::extract::{Path, Query, State};
use db::models::{
    attendance::{self, AttendanceStatus, AttendanceWithStudent},
    event, student_profile,
};
use db::reports::{self, EventSummary, GroupCounts, Trend};
use util::state::AppState;

use super::common::{MyAttendanceQuery, StatusQuery, TrendQuery};
use crate::auth::CurrentUser;
use crate::response::{ApiError, ApiResult, ok};
use crate::routes::common::Pagination;

/// GET /api/attendance/students/me
///
/// The caller's own records, newest first. `event_id` narrows to one event.
///
/// - `404 Not Found` if the caller has no student profile
pub async fn my_attendance(
    State(app_state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<MyAttendanceQuery>,
) -> ApiResult<Vec<attendance::Model>> {
    let db = app_state.db();
    let profile = student_profile::Model::find_by_user(db, current.id())
        .await?
        .ok_or_else(|| ApiError::not_found("Student profile not found"))?;

    let records = attendance::Model::for_student(db, profile.id, query.event_id).await?;
    ok(records, "Attendance records retrieved")
}

/// GET /api/attendance/events/{event_id}/attendees
///
/// Ordered by status, then time-in. `status` filters to one status.
pub async fn event_attendees(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
    Query(query): Query<StatusQuery>,
    Query(page): Query<Pagination>,
) -> ApiResult<Vec<AttendanceWithStudent>> {
    let db = app_state.db();
    event::Model::get(db, event_id).await?;
    let rows =
        attendance::Model::attendees(db, event_id, query.status, page.skip(), page.limit()).await?;
    ok(rows, "Attendees retrieved")
}

/// GET /api/attendance/events/{event_id}/summary
///
/// ```json
/// {
///   "total": 3,
///   "statuses": {
///     "present": { "count": 2, "percentage": 66.67 },
///     "absent": { "count": 0, "percentage": 0.0 },
///     "excused": { "count": 1, "percentage": 33.33 }
///   }
/// }
/// ```
pub async fn event_summary(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<EventSummary> {
    ok(
        reports::event_summary(app_state.db(), event_id).await?,
        "Attendance summary retrieved",
    )
}

/// GET /api/attendance/events/{event_id}/attendances
pub async fn event_attendances(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
    Query(page): Query<Pagination>,
) -> ApiResult<Vec<attendance::Model>> {
    let db = app_state.db();
    event::Model::get(db, event_id).await?;
    let rows = attendance::Model::for_event(db, event_id, None, page.skip(), page.limit()).await?;
    ok(rows, "Attendance records retrieved")
}

/// GET /api/attendance/events/{event_id}/attendances/{status}
pub async fn event_attendances_by_status(
    State(app_state): State<AppState>,
    Path((event_id, status)): Path<(i64, AttendanceStatus)>,
    Query(page): Query<Pagination>,
) -> ApiResult<Vec<attendance::Model>> {
    let db = app_state.db();
    event::Model::get(db, event_id).await?;
    let rows =
        attendance::Model::for_event(db, event_id, Some(status), page.skip(), page.limit()).await?;
    ok(rows, "Attendance records retrieved")
}

/// GET /api/attendance/events/{event_id}/attendances-with-students
///
/// Each record carries `student_number` and `student_name` ("first last").
pub async fn event_attendances_with_students(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<Vec<AttendanceWithStudent>> {
    let db = app_state.db();
    event::Model::get(db, event_id).await?;
    let rows = attendance::Model::with_students_for_event(db, event_id).await?;
    ok(rows, "Attendance records retrieved")
}

/// GET /api/attendance/events/{event_id}/report/programs
pub async fn program_report(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<Vec<GroupCounts>> {
    ok(
        reports::by_program(app_state.db(), event_id).await?,
        "Program report generated",
    )
}

/// GET /api/attendance/events/{event_id}/report/departments
pub async fn department_report(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<Vec<GroupCounts>> {
    ok(
        reports::by_department(app_state.db(), event_id).await?,
        "Department report generated",
    )
}

/// GET /api/attendance/reports/trend?start=..&end=..&bucket=day|week|month[&event_id=..]
///
/// Counts by status over `time_in`, one point per non-empty bucket.
pub async fn trend_report(
    State(app_state): State<AppState>,
    Query(query): Query<TrendQuery>,
) -> ApiResult<Trend> {
    let trend = reports::trend(
        app_state.db(),
        query.start,
        query.end,
        query.bucket,
        query.event_id,
    )
    .await?;
    ok(trend, "Trend report generated")
}
