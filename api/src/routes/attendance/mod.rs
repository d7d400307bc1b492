//! # Attendance Routes Module
//!
//! `/api/attendance`: check-in (manual, face scan, bulk), check-out, excuse
//! and absentee marking, overrides, listings and reports.
//!
//! ## Structure
//! - `common.rs`: request and response bodies
//! - `get.rs`: listings and reports
//! - `post.rs`: lifecycle operations
//! - `put.rs`: administrative override

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use util::state::AppState;

use crate::auth::guards::{
    allow_admin, allow_authenticated, allow_ssg, allow_ssg_or_admin, allow_student,
};

pub mod common;
pub mod get;
pub mod post;
pub mod put;

use get::{
    department_report, event_attendances, event_attendances_by_status,
    event_attendances_with_students, event_attendees, event_summary, my_attendance,
    program_report, trend_report,
};
use post::{
    bulk_mark, face_scan, face_scan_image, face_scan_timeout, manual_check_in, mark_absent,
    mark_excused, record_time_out, verify_attendance,
};
use put::override_status;

/// Builds the `/attendance` route group.
///
/// - `GET /students/me` → `my_attendance` (student)
/// - `POST /manual`, `/face-scan`, `/face-scan/image`, `/face-scan-timeout`, `/bulk` → ssg
/// - `POST /{attendance_id}/time-out` → ssg or admin
/// - `POST /{attendance_id}/verify` → ssg
/// - `PUT /{attendance_id}/status` → admin
/// - `POST /events/{event_id}/mark-excused`, `/mark-absent` → ssg or admin
/// - `GET /events/{event_id}/attendees`, `/summary`, `/report/*` → ssg or admin
/// - `GET /events/{event_id}/attendances[/{status}]`, `/attendances-with-students` → authenticated
/// - `GET /reports/trend` → ssg or admin
pub fn attendance_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/students/me", get(my_attendance).route_layer(from_fn_with_state(app_state.clone(), allow_student)))
        .route("/manual", post(manual_check_in).route_layer(from_fn_with_state(app_state.clone(), allow_ssg)))
        .route("/face-scan", post(face_scan).route_layer(from_fn_with_state(app_state.clone(), allow_ssg)))
        .route("/face-scan/image", post(face_scan_image).route_layer(from_fn_with_state(app_state.clone(), allow_ssg)))
        .route("/face-scan-timeout", post(face_scan_timeout).route_layer(from_fn_with_state(app_state.clone(), allow_ssg)))
        .route("/bulk", post(bulk_mark).route_layer(from_fn_with_state(app_state.clone(), allow_ssg)))
        .route("/{attendance_id}/time-out", post(record_time_out).route_layer(from_fn_with_state(app_state.clone(), allow_ssg_or_admin)))
        .route("/{attendance_id}/verify", post(verify_attendance).route_layer(from_fn_with_state(app_state.clone(), allow_ssg)))
        .route("/{attendance_id}/status", put(override_status).route_layer(from_fn_with_state(app_state.clone(), allow_admin)))
        .route("/events/{event_id}/mark-excused", post(mark_excused).route_layer(from_fn_with_state(app_state.clone(), allow_ssg_or_admin)))
        .route("/events/{event_id}/mark-absent", post(mark_absent).route_layer(from_fn_with_state(app_state.clone(), allow_ssg_or_admin)))
        .route("/events/{event_id}/attendees", get(event_attendees).route_layer(from_fn_with_state(app_state.clone(), allow_ssg_or_admin)))
        .route("/events/{event_id}/summary", get(event_summary).route_layer(from_fn_with_state(app_state.clone(), allow_ssg_or_admin)))
        .route("/events/{event_id}/report/programs", get(program_report).route_layer(from_fn_with_state(app_state.clone(), allow_ssg_or_admin)))
        .route("/events/{event_id}/report/departments", get(department_report).route_layer(from_fn_with_state(app_state.clone(), allow_ssg_or_admin)))
        .route("/events/{event_id}/attendances", get(event_attendances).route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)))
        .route(
            "/events/{event_id}/attendances/{status}",
            get(event_attendances_by_status).route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)),
        )
        .route(
            "/events/{event_id}/attendances-with-students",
            get(event_attendances_with_students).route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)),
        )
        .route("/reports/trend", get(trend_report).route_layer(from_fn_with_state(app_state, allow_ssg_or_admin)))
}
