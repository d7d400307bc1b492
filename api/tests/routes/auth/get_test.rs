#[cfg(test)]
mod tests {
    use crate::helpers::{app::send, fixtures::account, make_test_app};
    use axum::http::StatusCode;
    use db::models::{role::RoleName, user};
    use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};

    #[tokio::test]
    async fn me_requires_a_token() {
        let (app, _) = make_test_app().await;
        let (status, json) = send(&app, "GET", "/api/auth/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "Authentication required");
    }

    #[tokio::test]
    async fn me_rejects_garbage_token() {
        let (app, _) = make_test_app().await;
        let (status, _) = send(&app, "GET", "/api/auth/me", Some("not-a-jwt"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn me_returns_user_with_roles() {
        let (app, state) = make_test_app().await;
        let acct = account(state.db(), "ssg@example.com", &[RoleName::Student, RoleName::Ssg]).await;

        let (status, json) = send(&app, "GET", "/api/auth/me", Some(&acct.token), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "User data retrieved successfully");
        assert_eq!(json["data"]["id"], acct.user.id);
        assert_eq!(json["data"]["email"], "ssg@example.com");
        assert!(json["data"].get("password_hash").is_none());
        let roles = json["data"]["roles"].as_array().unwrap();
        assert_eq!(roles.len(), 2);
    }

    #[tokio::test]
    async fn deactivated_account_token_is_refused() {
        let (app, state) = make_test_app().await;
        let acct = account(state.db(), "gone@example.com", &[RoleName::Student]).await;

        let mut active = acct.user.clone().into_active_model();
        active.is_active = Set(false);
        let _: user::Model = active.update(state.db()).await.unwrap();

        let (status, _) = send(&app, "GET", "/api/auth/me", Some(&acct.token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
