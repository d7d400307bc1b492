use axum::{
    Json,
    extract::{Path, State},
};
use db::models::{
    role::RoleName,
    user::{self, UserChanges, UserDetails},
};
use serde::Deserialize;
use util::state::AppState;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::response::{ApiResult, Empty, ok};
use crate::routes::common::validate_body;
use crate::routes::users::parse_roles;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 100, message = "First name cannot be empty"))]
    pub first_name: Option<String>,

    pub middle_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,

    pub is_active: Option<bool>,
}

/// PUT /api/users/{user_id}
///
/// Partial update; omitted fields are left untouched.
///
/// - `200 OK` with the updated user
/// - `400 Bad Request` on validation failure or duplicate email
/// - `404 Not Found` if the user does not exist
pub async fn update_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<UserDetails> {
    validate_body(&req)?;
    let db = app_state.db();

    let updated = user::Model::update(
        db,
        user_id,
        UserChanges {
            email: req.email,
            first_name: req.first_name,
            middle_name: req.middle_name,
            last_name: req.last_name,
            is_active: req.is_active,
        },
    )
    .await?;
    ok(updated.details(db).await?, "User updated successfully")
}

#[derive(Debug, Deserialize)]
pub struct SetRolesRequest {
    pub roles: Vec<String>,
}

/// PUT /api/users/{user_id}/roles
///
/// Replaces the whole role set. Unknown role names reject the request
/// before anything changes.
pub async fn set_roles(
    State(app_state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<SetRolesRequest>,
) -> ApiResult<Vec<RoleName>> {
    let roles = parse_roles(&req.roles)?;
    let names = user::Model::set_roles(app_state.db(), user_id, &roles).await?;
    tracing::info!(user_id, roles = ?names, "Roles replaced");
    ok(names, "Roles updated successfully")
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(custom(function = "common::validate_password_strength"))]
    pub new_password: String,
}

/// PUT /api/users/me/password
///
/// - `400 Bad Request` if the current password is wrong or the new one is
///   shorter than 8 characters or lacks a digit or an uppercase letter
pub async fn change_password(
    State(app_state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Empty> {
    validate_body(&req)?;
    user::Model::change_password(
        app_state.db(),
        current.id(),
        &req.current_password,
        &req.new_password,
    )
    .await?;
    ok(Empty::default(), "Password updated successfully")
}
