use chrono::{DateTime, Utc};
use db::models::department;
use db::models::event::{self, EventStatus};
use db::models::{program, ssg_profile};
use db::reports::EventSummary;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 100, message = "Event name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 200, message = "Location must be 1-200 characters"))]
    pub location: String,

    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,

    #[serde(default = "upcoming")]
    pub status: EventStatus,

    #[serde(default)]
    pub department_ids: Vec<i64>,
    #[serde(default)]
    pub program_ids: Vec<i64>,
    #[serde(default)]
    pub ssg_member_ids: Vec<i64>,
}

fn upcoming() -> EventStatus {
    EventStatus::Upcoming
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 100, message = "Event name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Location must be 1-200 characters"))]
    pub location: Option<String>,

    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    pub status: Option<EventStatus>,

    pub department_ids: Option<Vec<i64>>,
    pub program_ids: Option<Vec<i64>>,
    pub ssg_member_ids: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: EventStatus,
}

#[derive(Debug, Deserialize, Default)]
pub struct ListEventsQuery {
    pub status: Option<EventStatus>,
    pub start_from: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub search: Option<String>,
    pub department_id: Option<i64>,
    pub program_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct EventPage {
    pub total: u64,
    pub items: Vec<event::EventWithMemberships>,
    pub skip: u64,
    pub limit: u64,
}

/// Single event with resolved relations and attendance totals.
#[derive(Debug, Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: event::Model,
    pub departments: Vec<department::Model>,
    pub programs: Vec<program::Model>,
    pub ssg_members: Vec<ssg_profile::Model>,
    pub attendance: EventSummary,
}
