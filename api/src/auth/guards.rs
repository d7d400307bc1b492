//! Role-based access guards.
//!
//! Every guard decodes the bearer token, reloads the user and its roles from
//! the database, and checks the resulting [`RoleSet`] against the roles the
//! route allows. On success the request carries both [`AuthUser`] and
//! [`CurrentUser`] in its extensions.

use crate::auth::claims::AuthUser;
use crate::auth::extractors::CurrentUser;
use crate::auth::roles::RoleSet;
use crate::response::{ApiResponse, Empty};
use axum::{
    Json,
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use db::error::DomainError;
use db::models::{role::RoleName, user};
use util::state::AppState;

type GuardError = (StatusCode, Json<ApiResponse<Empty>>);

fn reject(status: StatusCode, message: impl Into<String>) -> GuardError {
    (status, Json(ApiResponse::error(message)))
}

/// Human-readable list for the 403 message, e.g. `admin, event-organizer`.
pub fn describe_roles(roles: &[RoleName]) -> String {
    roles
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Authenticates the request and checks it against `allowed`.
async fn authorize(
    app_state: &AppState,
    req: Request<Body>,
    allowed: &[RoleName],
) -> Result<Request<Body>, GuardError> {
    let (mut parts, body) = req.into_parts();
    let auth = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| reject(StatusCode::UNAUTHORIZED, "Authentication required"))?;

    let db = app_state.db();
    let account = match user::Model::get(db, auth.0.sub).await {
        Ok(u) if u.is_active => u,
        Ok(_) | Err(DomainError::NotFound(_)) => {
            return Err(reject(
                StatusCode::UNAUTHORIZED,
                "User account is inactive or no longer exists",
            ));
        }
        Err(e) => {
            tracing::warn!(error = %e, user_id = auth.0.sub, "Failed to load user for guard");
            return Err(reject(StatusCode::INTERNAL_SERVER_ERROR, "Database error"));
        }
    };

    let roles: RoleSet = match account.roles(db).await {
        Ok(names) => names.into_iter().collect(),
        Err(e) => {
            tracing::warn!(error = %e, user_id = account.id, "Failed to load roles; denying access");
            return Err(reject(StatusCode::INTERNAL_SERVER_ERROR, "Database error"));
        }
    };

    if !roles.permits(allowed) {
        tracing::info!(user_id = account.id, held = %roles, "Access denied");
        return Err(reject(
            StatusCode::FORBIDDEN,
            format!(
                "Insufficient permissions. Required roles: {}",
                describe_roles(allowed)
            ),
        ));
    }

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(auth);
    req.extensions_mut().insert(CurrentUser {
        user: account,
        roles,
    });
    Ok(req)
}

/// Basic guard to ensure the request is authenticated by an active user.
pub async fn allow_authenticated(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let req = authorize(&app_state, req, &[]).await?;
    Ok(next.run(req).await)
}

/// Admin-only guard.
pub async fn allow_admin(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let req = authorize(&app_state, req, &[RoleName::Admin]).await?;
    Ok(next.run(req).await)
}

/// SSG officers only.
pub async fn allow_ssg(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let req = authorize(&app_state, req, &[RoleName::Ssg]).await?;
    Ok(next.run(req).await)
}

pub async fn allow_ssg_or_admin(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let req = authorize(&app_state, req, &[RoleName::Admin, RoleName::Ssg]).await?;
    Ok(next.run(req).await)
}

/// Admins and event organizers.
pub async fn allow_event_managers(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let req = authorize(&app_state, req, &[RoleName::Admin, RoleName::EventOrganizer]).await?;
    Ok(next.run(req).await)
}

/// Event managers plus SSG officers; used for status transitions.
pub async fn allow_event_staff(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let req = authorize(
        &app_state,
        req,
        &[RoleName::Admin, RoleName::EventOrganizer, RoleName::Ssg],
    )
    .await?;
    Ok(next.run(req).await)
}

pub async fn allow_student(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let req = authorize(&app_state, req, &[RoleName::Student]).await?;
    Ok(next.run(req).await)
}

pub async fn allow_student_or_admin(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let req = authorize(&app_state, req, &[RoleName::Admin, RoleName::Student]).await?;
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::describe_roles;
    use db::models::role::RoleName;

    #[test]
    fn required_roles_are_listed_by_name() {
        assert_eq!(
            describe_roles(&[RoleName::Admin, RoleName::EventOrganizer]),
            "admin, event-organizer"
        );
    }
}
