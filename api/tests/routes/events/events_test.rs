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

    #[tokio::test]
    async fn organizer_creates_scoped_event() {
        let (app, state) = make_test_app().await;
        let db = state.db();
        let campus = campus(db).await;
        let organizer = account(db, "org@example.com", &[RoleName::EventOrganizer]).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/events",
            Some(&organizer.token),
            Some(json!({
                "name": "Freshman Orientation",
                "location": "Main Gym",
                "start_datetime": "2025-08-01T09:00:00Z",
                "end_datetime": "2025-08-01T12:00:00Z",
                "department_ids": [campus.department.id],
                "program_ids": [campus.program.id],
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["status"], "upcoming");
        assert_eq!(json["data"]["department_ids"], json!([campus.department.id]));
        let id = json["data"]["id"].as_i64().unwrap();

        let uri = format!("/api/events/{id}");
        let (status, json) = send(&app, "GET", &uri, Some(&organizer.token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["departments"][0]["name"], "College of Computing");
        assert_eq!(json["data"]["attendance"]["total"], 0);

        let uri = format!("/api/events?department_id={}", campus.department.id);
        let (_, json) = send(&app, "GET", &uri, Some(&organizer.token), None).await;
        assert_eq!(json["data"]["total"], 1);
    }

    #[tokio::test]
    async fn inverted_window_and_unknown_department_are_rejected() {
        let (app, state) = make_test_app().await;
        let admin = account(state.db(), "admin@example.com", &[RoleName::Admin]).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/events",
            Some(&admin.token),
            Some(json!({
                "name": "Backwards",
                "location": "Hall",
                "start_datetime": "2025-08-01T12:00:00Z",
                "end_datetime": "2025-08-01T09:00:00Z",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "End datetime must be after start datetime");

        let (status, _) = send(
            &app,
            "POST",
            "/api/events",
            Some(&admin.token),
            Some(json!({
                "name": "Ghost",
                "location": "Hall",
                "start_datetime": "2025-08-01T09:00:00Z",
                "end_datetime": "2025-08-01T12:00:00Z",
                "department_ids": [404],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn students_cannot_manage_events_but_ssg_can_move_status() {
        let (app, state) = make_test_app().await;
        let db = state.db();
        let admin = account(db, "admin@example.com", &[RoleName::Admin]).await;
        let student = account(db, "s@example.com", &[RoleName::Student]).await;
        let officer = account(db, "ssg@example.com", &[RoleName::Ssg]).await;

        let body = json!({
            "name": "Assembly",
            "location": "Quad",
            "start_datetime": "2025-08-01T09:00:00Z",
            "end_datetime": "2025-08-01T10:00:00Z",
        });
        let (status, json) =
            send(&app, "POST", "/api/events", Some(&student.token), Some(body.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            json["message"],
            "Insufficient permissions. Required roles: admin, event-organizer"
        );

        let (_, json) = send(&app, "POST", "/api/events", Some(&admin.token), Some(body)).await;
        let id = json["data"]["id"].as_i64().unwrap();

        let uri = format!("/api/events/{id}/status");
        let (status, json) = send(
            &app,
            "PATCH",
            &uri,
            Some(&officer.token),
            Some(json!({ "status": "ongoing" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "ongoing");

        let (status, _) = send(
            &app,
            "PATCH",
            &uri,
            Some(&student.token),
            Some(json!({ "status": "cancelled" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
