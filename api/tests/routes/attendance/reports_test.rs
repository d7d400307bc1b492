#[cfg(test)]
mod tests {
    use crate::helpers::{
        app::send,
        fixtures::{account, campus, event, student},
        make_test_app,
    };
    use axum::http::StatusCode;
    use db::models::{
        event::{self as event_model, EventStatus},
        role::RoleName,
    };
    use serde_json::json;

    #[tokio::test]
    async fn excuse_sweep_and_summary() {
        let (app, state) = make_test_app().await;
        let db = state.db();
        let campus = campus(db).await;
        let officer = account(db, "ssg@example.com", &[RoleName::Ssg]).await;
        let (alice, _) = student(db, &campus, "alice@example.com", "CS-2023-001").await;
        student(db, &campus, "bob@example.com", "CS-2023-002").await;
        let assembly = event(db, "General Assembly", EventStatus::Ongoing).await;

        let (status, _) = send(
            &app,
            "POST",
            "/api/attendance/manual",
            Some(&officer.token),
            Some(json!({ "event_id": assembly.id, "student_id": "CS-2023-001" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let base = format!("/api/attendance/events/{}", assembly.id);
        let (status, json) = send(
            &app,
            "POST",
            &format!("{base}/mark-excused"),
            Some(&officer.token),
            Some(json!({ "student_ids": ["CS-2023-002", "XX-0000-1"], "reason": "Varsity game" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["results"][0]["status"], "created");
        assert_eq!(json["data"]["results"][1]["status"], "not_found");

        let (status, _) =
            send(&app, "POST", &format!("{base}/mark-absent"), Some(&officer.token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        event_model::Model::set_status(db, assembly.id, EventStatus::Completed)
            .await
            .unwrap();

        let (status, json) =
            send(&app, "POST", &format!("{base}/mark-absent"), Some(&officer.token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["updated"], 1);

        let (status, json) =
            send(&app, "GET", &format!("{base}/summary"), Some(&officer.token), None).await;
        assert_eq!(status, StatusCode::OK);
        let summary = &json["data"];
        assert_eq!(summary["total"], 2);
        assert_eq!(summary["statuses"]["present"]["count"], 0);
        assert_eq!(summary["statuses"]["absent"]["count"], 1);
        assert_eq!(summary["statuses"]["excused"]["percentage"], 50.0);

        let (status, json) = send(
            &app,
            "GET",
            &format!("{base}/report/programs"),
            Some(&officer.token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"][0]["name"], "bs computer science");
        assert_eq!(json["data"][0]["total"], 2);

        let (status, json) = send(
            &app,
            "GET",
            &format!("{base}/attendances-with-students"),
            Some(&alice.token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let rows = json["data"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().any(|r| r["student_name"] == "Test alice"));

        let (status, json) = send(
            &app,
            "GET",
            &format!("{base}/attendances/absent"),
            Some(&alice.token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 1);

        let (status, _) =
            send(&app, "GET", &format!("{base}/summary"), Some(&alice.token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn bulk_reports_each_item() {
        let (app, state) = make_test_app().await;
        let db = state.db();
        let campus = campus(db).await;
        let officer = account(db, "ssg@example.com", &[RoleName::Ssg]).await;
        student(db, &campus, "alice@example.com", "CS-2023-001").await;
        let drill = event(db, "Fire Drill", EventStatus::Ongoing).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance/bulk",
            Some(&officer.token),
            Some(json!({ "records": [
                { "event_id": drill.id, "student_id": "CS-2023-001" },
                { "event_id": drill.id, "student_id": "CS-2023-001" },
                { "event_id": drill.id, "student_id": "NO-1" },
            ]})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["processed"], 3);
        let outcomes: Vec<_> = json["data"]["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["status"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(outcomes, ["recorded", "exists", "not_found"]);
    }

    #[tokio::test]
    async fn only_admin_overrides_status() {
        let (app, state) = make_test_app().await;
        let db = state.db();
        let campus = campus(db).await;
        let admin = account(db, "admin@example.com", &[RoleName::Admin]).await;
        let officer = account(db, "ssg@example.com", &[RoleName::Ssg]).await;
        student(db, &campus, "alice@example.com", "CS-2023-001").await;
        let seminar = event(db, "Seminar", EventStatus::Ongoing).await;

        let (_, json) = send(
            &app,
            "POST",
            "/api/attendance/manual",
            Some(&officer.token),
            Some(json!({ "event_id": seminar.id, "student_id": "CS-2023-001" })),
        )
        .await;
        let uri = format!("/api/attendance/{}/status", json["data"]["id"]);
        let body = json!({ "status": "excused", "notes": "Approved by dean" });

        let (status, _) = send(&app, "PUT", &uri, Some(&officer.token), Some(body.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, json) = send(&app, "PUT", &uri, Some(&admin.token), Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "excused");
        assert_eq!(json["data"]["notes"], "Approved by dean");
    }

    #[tokio::test]
    async fn trend_rejects_inverted_range() {
        let (app, state) = make_test_app().await;
        let admin = account(state.db(), "admin@example.com", &[RoleName::Admin]).await;

        let (status, json) = send(
            &app,
            "GET",
            "/api/attendance/reports/trend?start=2025-09-01T00:00:00Z&end=2025-08-01T00:00:00Z",
            Some(&admin.token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Report end must not be before start");
    }
}
