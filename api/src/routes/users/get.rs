use axum::extract::{Path, Query, State};
use db::models::{
    role::RoleName,
    user::{self, UserDetails, UserFilter},
};
use serde::Deserialize;
use util::state::AppState;

use crate::auth::CurrentUser;
use crate::response::{ApiError, ApiResult, ok};
use crate::routes::common::Pagination;

#[derive(Debug, Deserialize, Default)]
pub struct ListUsersQuery {
    pub search: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub department_id: Option<i64>,
    pub program_id: Option<i64>,
    pub year_level: Option<i32>,
}

async fn with_details(
    app_state: &AppState,
    users: Vec<user::Model>,
) -> Result<Vec<UserDetails>, ApiError> {
    let mut out = Vec::with_capacity(users.len());
    for u in users {
        out.push(u.details(app_state.db()).await?);
    }
    Ok(out)
}

/// GET /api/users
///
/// ### Query Parameters
/// - `search`: partial match on email, first or last name
/// - `role`: one of `student`, `ssg`, `event-organizer`, `admin`
/// - `is_active`, `department_id`, `program_id`, `year_level`
/// - `skip` (default 0), `limit` (default 100, max 500)
///
/// ### Responses
/// - `200 OK` with a list of users including roles and profiles
/// - `400 Bad Request` for an unknown role
pub async fn list_users(
    State(app_state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
    Query(page): Query<Pagination>,
) -> ApiResult<Vec<UserDetails>> {
    let role = match query.role.as_deref() {
        Some(r) => Some(
            r.parse::<RoleName>()
                .map_err(|_| ApiError::bad_request(format!("Invalid role: {r}")))?,
        ),
        None => None,
    };
    let filter = UserFilter {
        search: query.search,
        role,
        is_active: query.is_active,
        department_id: query.department_id,
        program_id: query.program_id,
        year_level: query.year_level,
    };

    let users = user::Model::list(app_state.db(), &filter, page.skip(), page.limit()).await?;
    ok(with_details(&app_state, users).await?, "Users retrieved successfully")
}

/// GET /api/users/me
pub async fn get_me(
    State(app_state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<UserDetails> {
    ok(
        current.user.details(app_state.db()).await?,
        "User retrieved successfully",
    )
}

/// GET /api/users/by-role/{role}
///
/// - `400 Bad Request` if `role` is not a known role name
pub async fn list_users_by_role(
    State(app_state): State<AppState>,
    Path(role): Path<String>,
    Query(page): Query<Pagination>,
) -> ApiResult<Vec<UserDetails>> {
    let role: RoleName = role
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid role: {role}")))?;
    let filter = UserFilter {
        role: Some(role),
        ..Default::default()
    };

    let users = user::Model::list(app_state.db(), &filter, page.skip(), page.limit()).await?;
    ok(with_details(&app_state, users).await?, "Users retrieved successfully")
}

/// GET /api/users/ssg-members
///
/// Users holding the `ssg` role ordered by last name, with their SSG profile.
pub async fn list_ssg_members(
    State(app_state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Vec<UserDetails>> {
    let filter = UserFilter {
        role: Some(RoleName::Ssg),
        ..Default::default()
    };
    let users = user::Model::list(app_state.db(), &filter, page.skip(), page.limit()).await?;
    ok(with_details(&app_state, users).await?, "SSG members retrieved successfully")
}

/// GET /api/users/{user_id}
///
/// - `404 Not Found` if the user does not exist
pub async fn get_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<UserDetails> {
    let found = user::Model::get(app_state.db(), user_id).await?;
    ok(found.details(app_state.db()).await?, "User retrieved successfully")
}
