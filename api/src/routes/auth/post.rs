use axum::{Form, Json, extract::State};
use db::models::{role::RoleName, user};
use serde::{Deserialize, Serialize};
use util::state::AppState;
use validator::Validate;

use crate::auth::generate_jwt;
use crate::response::{ApiError, ApiResult, ok};
use crate::routes::common::validate_body;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Default)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: String,
    pub email: String,
    pub roles: Vec<RoleName>,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
}

/// Checks credentials and issues a token for the user.
async fn issue_token(
    app_state: &AppState,
    email: &str,
    password: &str,
) -> Result<(user::Model, Vec<RoleName>, String, String), ApiError> {
    let db = app_state.db();
    let Some(account) = user::Model::verify_credentials(db, email, password).await? else {
        tracing::info!(email, "Failed login");
        return Err(ApiError::unauthorized("Incorrect email or password"));
    };

    let roles = account.roles(db).await?;
    let (token, expires_at) = generate_jwt(account.id, &account.email, &roles).map_err(|e| {
        tracing::error!(error = %e, "Token encoding failed");
        ApiError::internal("Failed to issue token")
    })?;

    tracing::info!(user_id = account.id, "Login");
    Ok((account, roles, token, expires_at))
}

/// POST /api/auth/login
///
/// ### Request Body
/// ```json
/// { "email": "admin@example.com", "password": "Admin123" }
/// ```
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "access_token": "jwt",
///     "token_type": "bearer",
///     "expires_at": "2025-08-01T10:00:00+00:00",
///     "email": "admin@example.com",
///     "roles": ["admin"],
///     "user_id": 1,
///     "first_name": "System",
///     "last_name": "Admin"
///   },
///   "message": "Login successful"
/// }
/// ```
/// - `401 Unauthorized` for wrong credentials or an inactive account
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    validate_body(&req)?;
    let (account, roles, access_token, expires_at) =
        issue_token(&app_state, &req.email, &req.password).await?;

    ok(
        LoginResponse {
            access_token,
            token_type: "bearer".into(),
            expires_at,
            email: account.email,
            roles,
            user_id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
        },
        "Login successful",
    )
}

/// OAuth2 password-flow form; `username` carries the email.
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /api/auth/token
///
/// Form-encoded `username` and `password`. Answers with a bare
/// `{ "access_token", "token_type" }` object so OAuth2 clients can use it directly.
pub async fn token(
    State(app_state): State<AppState>,
    Form(form): Form<TokenForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let (_, _, access_token, _) = issue_token(&app_state, &form.username, &form.password).await?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".into(),
    }))
}
