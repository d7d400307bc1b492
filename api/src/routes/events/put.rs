use axum::{
    Json,
    extract::{Path, State},
};
use db::models::event::{self, EventChanges, EventWithMemberships};
use util::state::AppState;

use super::common::{StatusRequest, UpdateEventRequest};
use crate::response::{ApiResult, ok};
use crate::routes::common::validate_body;

/// PUT /api/events/{event_id}
///
/// Partial update. Each id list that is present replaces that whole set,
/// validated the same way as on creation.
///
/// - `400 Bad Request` if the resulting window has `end <= start`
/// - `404 Not Found` for the event or any referenced id
pub async fn update_event(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<UpdateEventRequest>,
) -> ApiResult<EventWithMemberships> {
    validate_body(&req)?;
    let updated = event::Model::update(
        app_state.db(),
        event_id,
        EventChanges {
            name: req.name,
            location: req.location,
            start_datetime: req.start_datetime,
            end_datetime: req.end_datetime,
            status: req.status,
            department_ids: req.department_ids,
            program_ids: req.program_ids,
            ssg_member_ids: req.ssg_member_ids,
        },
    )
    .await?;

    ok(updated, "Event updated successfully")
}

/// PATCH /api/events/{event_id}/status
///
/// ```json
/// { "status": "completed" }
/// ```
///
/// Any status may follow any other.
pub async fn update_event_status(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<StatusRequest>,
) -> ApiResult<event::Model> {
    let updated = event::Model::set_status(app_state.db(), event_id, req.status).await?;
    ok(updated, "Event status updated successfully")
}
