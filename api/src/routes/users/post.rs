use axum::{
    Json,
    extract::{Multipart, State},
};
use common::{normalize_position, normalize_student_number};
use db::models::{
    ssg_profile,
    student_profile::{self, NewStudentProfile},
    user::{self, NewUser, UserDetails},
};
use serde::{Deserialize, Serialize};
use util::faces::encoding_to_bytes;
use util::state::AppState;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::response::{ApiError, ApiResult, created, ok};
use crate::routes::common::{read_upload, validate_body};
use crate::routes::users::parse_roles;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,

    pub middle_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,

    #[serde(default)]
    pub roles: Vec<String>,
}

/// POST /api/users
///
/// Creates a user with the given roles in one step.
///
/// ### Request Body
/// ```json
/// {
///   "email": "jane@example.com",
///   "password": "Secret123",
///   "first_name": "Jane",
///   "last_name": "Doe",
///   "roles": ["student"]
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the user and its relations
/// - `400 Bad Request` on validation failure, unknown role, or duplicate email
pub async fn create_user(
    State(app_state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<UserDetails> {
    validate_body(&req)?;
    let roles = parse_roles(&req.roles)?;
    let db = app_state.db();

    let new = NewUser {
        email: req.email,
        password: req.password,
        first_name: req.first_name,
        middle_name: req.middle_name,
        last_name: req.last_name,
    };
    let created_user = user::Model::create_with_roles(db, &new, &roles).await?;
    created(created_user.details(db).await?, "User created successfully")
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentProfileRequest {
    /// Target user; defaults to the caller. Only admins may name someone else.
    pub user_id: Option<i64>,

    #[validate(custom(function = "common::validate_student_number"))]
    pub student_id: String,

    pub department_id: i64,
    pub program_id: i64,

    #[validate(range(min = 1, max = 5, message = "Year level must be between 1 and 5"))]
    #[serde(default = "first_year")]
    pub year_level: i32,

    #[validate(length(max = 50, message = "Section must be at most 50 characters"))]
    pub section: Option<String>,

    #[validate(length(max = 100, message = "RFID tag must be at most 100 characters"))]
    pub rfid_tag: Option<String>,
}

fn first_year() -> i32 {
    1
}

/// Resolves whose profile is being created. Non-admins can only act on themselves.
fn target_user(current: &CurrentUser, requested: Option<i64>) -> Result<i64, ApiError> {
    match requested {
        Some(id) if id != current.id() && !current.roles.is_admin() => Err(ApiError::forbidden(
            "You can only create a profile for your own account",
        )),
        Some(id) => Ok(id),
        None => Ok(current.id()),
    }
}

/// POST /api/users/students
///
/// ### Request Body
/// ```json
/// {
///   "student_id": "cs-2023-001",
///   "department_id": 1,
///   "program_id": 2,
///   "year_level": 1,
///   "section": "A"
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the profile (student number stored upper-case)
/// - `400 Bad Request` for a malformed or duplicate student number, bad year level,
///   or an existing profile
/// - `403 Forbidden` when a student targets another user
/// - `404 Not Found` for an unknown user, department or program
pub async fn create_student_profile(
    State(app_state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<CreateStudentProfileRequest>,
) -> ApiResult<student_profile::Model> {
    validate_body(&req)?;
    let user_id = target_user(&current, req.user_id)?;
    let student_id = normalize_student_number(&req.student_id).map_err(ApiError::bad_request)?;

    let profile = student_profile::Model::create(
        app_state.db(),
        NewStudentProfile {
            user_id,
            student_id,
            department_id: req.department_id,
            program_id: req.program_id,
            year_level: req.year_level,
            section: req.section.filter(|s| !s.trim().is_empty()),
            rfid_tag: req.rfid_tag.filter(|s| !s.trim().is_empty()),
        },
    )
    .await?;

    created(profile, "Student profile created successfully")
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSsgProfileRequest {
    pub user_id: Option<i64>,

    #[validate(custom(function = "common::validate_position"))]
    pub position: String,
}

/// POST /api/users/ssg-profile
///
/// Positions are normalized: `vp` → `Vice President`, `p.r.o.` →
/// `Public Information Officer`, everything else title-cased.
///
/// - `201 Created`
/// - `400 Bad Request` for an unknown position or an existing profile
pub async fn create_ssg_profile(
    State(app_state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<CreateSsgProfileRequest>,
) -> ApiResult<ssg_profile::Model> {
    validate_body(&req)?;
    let user_id = target_user(&current, req.user_id)?;
    let position = normalize_position(&req.position)
        .ok_or_else(|| ApiError::bad_request("Invalid position"))?;

    let profile = ssg_profile::Model::create(app_state.db(), user_id, &position).await?;
    created(profile, "SSG profile created successfully")
}

#[derive(Debug, Serialize)]
pub struct FaceRegistration {
    pub student_id: String,
    pub is_face_registered: bool,
    pub registered_faces: usize,
}

/// POST /api/users/students/register-face
///
/// Multipart upload with a single `file` field holding the face capture.
///
/// - `200 OK` once the embedding is stored on the profile and in the registry
/// - `400 Bad Request` (`Face registration failed`) if no face embedding can be read
/// - `404 Not Found` if the caller has no student profile
pub async fn register_face(
    State(app_state): State<AppState>,
    current: CurrentUser,
    multipart: Multipart,
) -> ApiResult<FaceRegistration> {
    let db = app_state.db();
    let profile = student_profile::Model::find_by_user(db, current.id())
        .await?
        .ok_or_else(|| ApiError::not_found("Student profile not found"))?;

    let upload = read_upload(multipart).await?;
    let encoding = app_state.faces().encode(&upload).map_err(|e| {
        tracing::info!(error = %e, student = %profile.student_id, "Face registration failed");
        ApiError::bad_request("Face registration failed")
    })?;

    // The registry only learns the face once the profile says it is registered.
    let updated =
        student_profile::Model::store_face_encoding(db, profile.id, encoding_to_bytes(&encoding))
            .await?;
    app_state.faces().insert(&updated.student_id, encoding);
    tracing::info!(student = %updated.student_id, "Face registered");

    ok(
        FaceRegistration {
            student_id: updated.student_id,
            is_face_registered: updated.is_face_registered,
            registered_faces: app_state.faces().len(),
        },
        "Face registered successfully",
    )
}
