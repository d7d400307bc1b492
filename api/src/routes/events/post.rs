use axum::{Json, extract::State};
use db::models::event::{self, EventWithMemberships, NewEvent};
use util::state::AppState;

use super::common::CreateEventRequest;
use crate::response::{ApiResult, created};
use crate::routes::common::validate_body;

/// POST /api/events
///
/// ### Request Body
/// ```json
/// {
///   "name": "Orientation",
///   "location": "Gymnasium",
///   "start_datetime": "2025-08-01T09:00:00Z",
///   "end_datetime": "2025-08-01T11:00:00Z",
///   "department_ids": [1],
///   "program_ids": [2, 3],
///   "ssg_member_ids": []
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the event and its id sets
/// - `400 Bad Request` if `end_datetime` is not after `start_datetime`
/// - `404 Not Found` naming unknown ids (e.g. `Programs not found: {7}`); nothing is stored
pub async fn create_event(
    State(app_state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> ApiResult<EventWithMemberships> {
    validate_body(&req)?;
    let created_event = event::Model::create(
        app_state.db(),
        NewEvent {
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

    created(created_event, "Event created successfully")
}
