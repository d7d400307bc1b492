use axum::extract::{Path, Query, State};
use db::models::event::{self, EventFilter};
use db::reports;
use util::state::AppState;

use super::common::{EventDetail, EventPage, ListEventsQuery};
use crate::response::{ApiResult, ok};
use crate::routes::common::Pagination;

/// GET /api/events
///
/// ### Query Parameters
/// - `status`: `upcoming`, `ongoing`, `completed`, `cancelled`
/// - `start_from` / `end_at`: RFC 3339 bounds on the event window
/// - `search`: partial match on name or location
/// - `department_id`, `program_id`: events linked to that department/program
/// - `skip`, `limit`
///
/// ### Response
/// ```json
/// {
///   "success": true,
///   "data": { "total": 12, "items": [ ... ], "skip": 0, "limit": 100 },
///   "message": "Events retrieved successfully"
/// }
/// ```
pub async fn list_events(
    State(app_state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
    Query(page): Query<Pagination>,
) -> ApiResult<EventPage> {
    let filter = EventFilter {
        status: query.status,
        start_from: query.start_from,
        end_at: query.end_at,
        search: query.search,
        department_id: query.department_id,
        program_id: query.program_id,
    };
    let (skip, limit) = (page.skip(), page.limit());
    let (total, items) = event::Model::list(app_state.db(), &filter, skip, limit).await?;

    ok(
        EventPage {
            total,
            items,
            skip,
            limit,
        },
        "Events retrieved successfully",
    )
}

/// GET /api/events/{event_id}
///
/// - `200 OK` with departments, programs, SSG members and attendance counts by status
/// - `404 Not Found`
pub async fn get_event(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<EventDetail> {
    let db = app_state.db();
    let found = event::Model::get(db, event_id).await?;
    let relations = found.relations(db).await?;
    let attendance = reports::event_summary(db, event_id).await?;

    ok(
        EventDetail {
            event: found,
            departments: relations.departments,
            programs: relations.programs,
            ssg_members: relations.ssg_members,
            attendance,
        },
        "Event retrieved successfully",
    )
}
