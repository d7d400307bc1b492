use axum::extract::State;
use db::models::user::UserDetails;
use util::state::AppState;

use crate::auth::CurrentUser;
use crate::response::{ApiResult, ok};

/// GET /api/auth/me
///
/// Returns the authenticated user with roles and profiles.
///
/// ### Responses
/// - `200 OK` with the user, its `roles`, `student_profile` and `ssg_profile`
/// - `401 Unauthorized` if the token is missing, invalid, or the account is inactive
pub async fn get_me(
    State(app_state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<UserDetails> {
    let details = current.user.details(app_state.db()).await?;
    ok(details, "User data retrieved successfully")
}
