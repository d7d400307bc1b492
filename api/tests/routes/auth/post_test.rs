#[cfg(test)]
mod tests {
    use crate::helpers::{
        app::{json_of, send},
        fixtures::{PASSWORD, account},
        make_test_app,
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use db::models::role::RoleName;
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn login_returns_token_and_roles() {
        let (app, state) = make_test_app().await;
        let admin = account(state.db(), "admin@example.com", &[RoleName::Admin]).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "ADMIN@example.com", "password": PASSWORD })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Login successful");
        let data = &json["data"];
        assert_eq!(data["token_type"], "bearer");
        assert_eq!(data["user_id"], admin.user.id);
        assert_eq!(data["roles"], json!(["admin"]));
        assert!(!data["access_token"].as_str().unwrap().is_empty());

        let token = data["access_token"].as_str().unwrap();
        let (status, _) = send(&app, "GET", "/api/users", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let (app, state) = make_test_app().await;
        account(state.db(), "jane@example.com", &[RoleName::Student]).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "jane@example.com", "password": "Wrong1234" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Incorrect email or password");
    }

    #[tokio::test]
    async fn token_endpoint_accepts_form_credentials() {
        let (app, state) = make_test_app().await;
        account(state.db(), "jane@example.com", &[RoleName::Student]).await;

        let req = Request::builder()
            .method("POST")
            .uri("/api/auth/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("username=jane%40example.com&password={PASSWORD}")))
            .unwrap();
        let (status, json) = json_of(app.oneshot(req).await.unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["token_type"], "bearer");
        assert!(json["access_token"].is_string());
        assert!(json.get("success").is_none());
    }
}
