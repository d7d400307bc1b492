#[cfg(test)]
mod tests {
    use crate::helpers::{
        app::send,
        fixtures::{PASSWORD, account},
        make_test_app,
    };
    use axum::http::StatusCode;
    use db::models::role::RoleName;
    use serde_json::json;

    #[tokio::test]
    async fn roles_are_replaced_and_take_effect_immediately() {
        let (app, state) = make_test_app().await;
        let admin = account(state.db(), "admin@example.com", &[RoleName::Admin]).await;
        let jane = account(state.db(), "jane@example.com", &[RoleName::Student]).await;

        let (status, _) = send(&app, "GET", "/api/users/by-role/student", Some(&jane.token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let uri = format!("/api/users/{}/roles", jane.user.id);
        let (status, json) = send(
            &app,
            "PUT",
            &uri,
            Some(&admin.token),
            Some(json!({ "roles": ["ssg"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], json!(["ssg"]));

        // Roles are reloaded per request, so the old token now carries ssg.
        let (status, json) = send(&app, "GET", "/api/users/by-role/ssg", Some(&jane.token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"][0]["id"], jane.user.id);
    }

    #[tokio::test]
    async fn password_change_checks_current_and_strength() {
        let (app, state) = make_test_app().await;
        let jane = account(state.db(), "jane@example.com", &[RoleName::Student]).await;

        let (status, json) = send(
            &app,
            "PUT",
            "/api/users/me/password",
            Some(&jane.token),
            Some(json!({ "current_password": "nope", "new_password": "Better123" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Current password is incorrect");

        let (status, json) = send(
            &app,
            "PUT",
            "/api/users/me/password",
            Some(&jane.token),
            Some(json!({ "current_password": PASSWORD, "new_password": "short" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Password must be at least 8 characters");

        let (status, _) = send(
            &app,
            "PUT",
            "/api/users/me/password",
            Some(&jane.token),
            Some(json!({ "current_password": PASSWORD, "new_password": "Better123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "jane@example.com", "password": "Better123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn deleted_user_is_gone() {
        let (app, state) = make_test_app().await;
        let admin = account(state.db(), "admin@example.com", &[RoleName::Admin]).await;
        let jane = account(state.db(), "jane@example.com", &[RoleName::Student]).await;

        let uri = format!("/api/users/{}", jane.user.id);
        let (status, _) = send(&app, "DELETE", &uri, Some(&admin.token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = send(&app, "GET", &uri, Some(&admin.token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "User not found");
    }
}
