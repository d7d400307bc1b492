#[cfg(test)]
mod tests {
    use crate::helpers::{
        app::send,
        fixtures::{account, campus},
        make_test_app,
    };
    use axum::http::StatusCode;
    use db::models::role::RoleName;
    use serde_json::json;

    fn new_user(email: &str, roles: &[&str]) -> serde_json::Value {
        json!({
            "email": email,
            "password": "Secret123",
            "first_name": "Jane",
            "last_name": "Doe",
            "roles": roles,
        })
    }

    #[tokio::test]
    async fn admin_creates_user_with_roles() {
        let (app, state) = make_test_app().await;
        let admin = account(state.db(), "admin@example.com", &[RoleName::Admin]).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/users",
            Some(&admin.token),
            Some(new_user("jane@example.com", &["student", "ssg"])),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["message"], "User created successfully");
        assert_eq!(json["data"]["email"], "jane@example.com");
        assert_eq!(json["data"]["roles"], json!(["student", "ssg"]));
        assert!(json["data"]["student_profile"].is_null());
    }

    #[tokio::test]
    async fn student_cannot_create_users() {
        let (app, state) = make_test_app().await;
        let student = account(state.db(), "s@example.com", &[RoleName::Student]).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/users",
            Some(&student.token),
            Some(new_user("x@example.com", &[])),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "Insufficient permissions. Required roles: admin");
    }

    #[tokio::test]
    async fn duplicate_email_and_unknown_role_are_rejected() {
        let (app, state) = make_test_app().await;
        let admin = account(state.db(), "admin@example.com", &[RoleName::Admin]).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/users",
            Some(&admin.token),
            Some(new_user("Admin@Example.com", &[])),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Email already registered");

        let (status, json) = send(
            &app,
            "POST",
            "/api/users",
            Some(&admin.token),
            Some(new_user("new@example.com", &["janitor"])),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Invalid role: janitor");
    }

    #[tokio::test]
    async fn student_creates_own_profile_only() {
        let (app, state) = make_test_app().await;
        let db = state.db();
        let campus = campus(db).await;
        let me = account(db, "me@example.com", &[RoleName::Student]).await;
        let other = account(db, "other@example.com", &[RoleName::Student]).await;

        let body = json!({
            "student_id": " cs-2023-001 ",
            "department_id": campus.department.id,
            "program_id": campus.program.id,
            "year_level": 2,
        });
        let (status, json) =
            send(&app, "POST", "/api/users/students", Some(&me.token), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["student_id"], "CS-2023-001");
        assert_eq!(json["data"]["user_id"], me.user.id);

        let (status, _) = send(
            &app,
            "POST",
            "/api/users/students",
            Some(&me.token),
            Some(json!({
                "user_id": other.user.id,
                "student_id": "CS-2023-002",
                "department_id": campus.department.id,
                "program_id": campus.program.id,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn malformed_student_number_is_rejected() {
        let (app, state) = make_test_app().await;
        let db = state.db();
        let campus = campus(db).await;
        let me = account(db, "me@example.com", &[RoleName::Student]).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/users/students",
            Some(&me.token),
            Some(json!({
                "student_id": "123456",
                "department_id": campus.department.id,
                "program_id": campus.program.id,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Student ID must contain at least one letter");
    }

    #[tokio::test]
    async fn ssg_profile_position_is_normalized() {
        let (app, state) = make_test_app().await;
        let officer = account(state.db(), "vp@example.com", &[RoleName::Ssg]).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/users/ssg-profile",
            Some(&officer.token),
            Some(json!({ "position": "vp" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["position"], "Vice President");

        let (status, json) =
            send(&app, "GET", "/api/users/ssg-members", Some(&officer.token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
    }
}
