use axum::extract::{Path, State};
use db::models::event;
use util::state::AppState;

use crate::response::{ApiResult, Empty, ok};

/// DELETE /api/events/{event_id}
///
/// Removes the event, its membership rows and its attendance records together.
pub async fn delete_event(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<Empty> {
    event::Model::delete(app_state.db(), event_id).await?;
    ok(Empty::default(), "Event deleted successfully")
}
