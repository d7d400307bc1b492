use chrono::{DateTime, Utc};
use db::models::attendance::{self, AttendanceStatus, BulkItem};
use db::reports::Bucket;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ManualCheckInRequest {
    pub event_id: i64,
    #[validate(length(min = 1, max = 20, message = "Student ID is required"))]
    pub student_id: String,
    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

/// Identifies a (student, event) pair for face-scan check-in and check-out.
#[derive(Debug, Deserialize, Validate)]
pub struct FaceScanRequest {
    pub event_id: i64,
    #[validate(length(min = 1, max = 20, message = "Student ID is required"))]
    pub student_id: String,
}

#[derive(Debug, Deserialize)]
pub struct FaceImageQuery {
    pub event_id: i64,
}

#[derive(Debug, Serialize)]
pub struct FaceScanResult {
    pub student_id: String,
    pub distance: f32,
    pub attendance: attendance::Model,
}

#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    pub records: Vec<BulkItem>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ExcuseRequest {
    #[validate(length(min = 1, message = "At least one student ID is required"))]
    pub student_ids: Vec<String>,
    #[validate(length(min = 1, max = 500, message = "Reason must be 1-500 characters"))]
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct SweepResult {
    pub event_id: i64,
    pub updated: usize,
    pub attendance_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OverrideRequest {
    pub status: AttendanceStatus,
    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

/// Closed record with its duration.
#[derive(Debug, Serialize)]
pub struct CheckOut {
    pub attendance_id: i64,
    pub time_in: DateTime<Utc>,
    pub time_out: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
}

impl From<attendance::Model> for CheckOut {
    fn from(m: attendance::Model) -> Self {
        Self {
            attendance_id: m.id,
            time_in: m.time_in,
            duration_minutes: m.duration_minutes(),
            time_out: m.time_out,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct MyAttendanceQuery {
    pub event_id: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct StatusQuery {
    pub status: Option<AttendanceStatus>,
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub bucket: Bucket,
    pub event_id: Option<i64>,
}
