#[cfg(test)]
mod tests {
    use crate::helpers::{
        app::{json_of, send},
        fixtures::{account, campus, event, student},
        make_test_app,
    };
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
    };
    use db::models::{event::EventStatus, role::RoleName, student_profile};
    use sea_orm::ConnectionTrait;
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::ServiceExt;
    use util::config::AppConfig;
    use util::faces::EMBEDDING_LEN;

    const BOUNDARY: &str = "attendance-test-boundary";

    async fn upload(app: &Router, uri: &str, token: &str, embedding: &[f32]) -> (StatusCode, Value) {
        let payload = serde_json::to_string(embedding).unwrap();
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"face.json\"\r\n\
             Content-Type: application/json\r\n\r\n\
             {payload}\r\n\
             --{BOUNDARY}--\r\n"
        );
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        json_of(app.clone().oneshot(req).await.unwrap()).await
    }

    #[tokio::test]
    async fn orientation_manual_check_in_and_time_out() {
        let (app, state) = make_test_app().await;
        let db = state.db();
        let campus = campus(db).await;
        let officer = account(db, "ssg@example.com", &[RoleName::Ssg]).await;
        let (alice, _) = student(db, &campus, "alice@example.com", "CS-2023-001").await;
        let orientation = event(db, "Freshman Orientation", EventStatus::Ongoing).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance/manual",
            Some(&officer.token),
            Some(json!({ "event_id": orientation.id, "student_id": "cs-2023-001", "notes": "Late" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["status"], "present");
        assert_eq!(json["data"]["method"], "manual");
        assert_eq!(json["data"]["verified_by"], officer.user.id);
        assert!(json["data"]["time_out"].is_null());
        let attendance_id = json["data"]["id"].as_i64().unwrap();

        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance/manual",
            Some(&officer.token),
            Some(json!({ "event_id": orientation.id, "student_id": "CS-2023-001" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Attendance already exists for student CS-2023-001");

        let uri = format!("/api/attendance/{attendance_id}/time-out");
        let (status, json) = send(&app, "POST", &uri, Some(&officer.token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["attendance_id"], attendance_id);
        assert_eq!(json["data"]["duration_minutes"], 0);

        let (status, json) = send(&app, "POST", &uri, Some(&officer.token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Time-out already recorded");

        let (status, json) =
            send(&app, "GET", "/api/attendance/students/me", Some(&alice.token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
        assert_eq!(json["data"][0]["id"], attendance_id);
    }

    #[tokio::test]
    async fn students_cannot_record_attendance() {
        let (app, state) = make_test_app().await;
        let db = state.db();
        let campus = campus(db).await;
        let (alice, _) = student(db, &campus, "alice@example.com", "CS-2023-001").await;
        let rally = event(db, "Rally", EventStatus::Ongoing).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance/manual",
            Some(&alice.token),
            Some(json!({ "event_id": rally.id, "student_id": "CS-2023-001" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "Insufficient permissions. Required roles: ssg");
    }

    #[tokio::test]
    async fn cancelled_event_and_unknown_student_are_rejected() {
        let (app, state) = make_test_app().await;
        let db = state.db();
        let campus = campus(db).await;
        let officer = account(db, "ssg@example.com", &[RoleName::Ssg]).await;
        student(db, &campus, "alice@example.com", "CS-2023-001").await;
        let called_off = event(db, "Called Off", EventStatus::Cancelled).await;
        let open = event(db, "Open", EventStatus::Ongoing).await;

        let (status, _) = send(
            &app,
            "POST",
            "/api/attendance/manual",
            Some(&officer.token),
            Some(json!({ "event_id": called_off.id, "student_id": "CS-2023-001" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance/manual",
            Some(&officer.token),
            Some(json!({ "event_id": open.id, "student_id": "ZZ-9999-999" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Student ZZ-9999-999 not found");
    }

    #[tokio::test]
    #[serial]
    async fn face_scan_cooldown_then_re_entry() {
        AppConfig::set_scan_cooldown_seconds(300);
        let (app, state) = make_test_app().await;
        let db = state.db();
        let campus = campus(db).await;
        let officer = account(db, "ssg@example.com", &[RoleName::Ssg]).await;
        student(db, &campus, "alice@example.com", "CS-2023-001").await;
        let fair = event(db, "Job Fair", EventStatus::Ongoing).await;
        let scan = json!({ "event_id": fair.id, "student_id": "CS-2023-001" });

        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance/face-scan",
            Some(&officer.token),
            Some(scan.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["method"], "face_scan");

        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance/face-scan",
            Some(&officer.token),
            Some(scan.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["message"],
            "Duplicate scan detected. Last scan was 0 minutes ago."
        );

        let (status, _) = send(
            &app,
            "POST",
            "/api/attendance/face-scan-timeout",
            Some(&officer.token),
            Some(scan.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance/face-scan-timeout",
            Some(&officer.token),
            Some(scan.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "No active attendance record found");

        AppConfig::set_scan_cooldown_seconds(0);
        let (status, _) = send(
            &app,
            "POST",
            "/api/attendance/face-scan",
            Some(&officer.token),
            Some(scan),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        AppConfig::reset();
    }

    #[tokio::test]
    #[serial]
    async fn registered_face_is_recognized() {
        AppConfig::set_scan_cooldown_seconds(300);
        let (app, state) = make_test_app().await;
        let db = state.db();
        let campus = campus(db).await;
        let officer = account(db, "ssg@example.com", &[RoleName::Ssg]).await;
        let (alice, _) = student(db, &campus, "alice@example.com", "CS-2023-001").await;
        let fair = event(db, "Job Fair", EventStatus::Ongoing).await;

        let face = vec![0.1_f32; EMBEDDING_LEN];
        let (status, json) =
            upload(&app, "/api/users/students/register-face", &alice.token, &face).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["is_face_registered"], true);
        assert_eq!(json["data"]["registered_faces"], 1);

        let uri = format!("/api/attendance/face-scan/image?event_id={}", fair.id);
        let stranger = vec![5.0_f32; EMBEDDING_LEN];
        let (status, json) = upload(&app, &uri, &officer.token, &stranger).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Face recognition failed");

        let (status, json) = upload(&app, &uri, &officer.token, &face).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["student_id"], "CS-2023-001");
        assert_eq!(json["data"]["attendance"]["method"], "face_scan");
        AppConfig::reset();
    }

    #[tokio::test]
    async fn unreadable_face_upload_is_rejected() {
        let (app, state) = make_test_app().await;
        let db = state.db();
        let campus = campus(db).await;
        let (alice, _) = student(db, &campus, "alice@example.com", "CS-2023-001").await;

        let (status, json) =
            upload(&app, "/api/users/students/register-face", &alice.token, &[1.0, 2.0]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Face registration failed");
    }

    #[tokio::test]
    async fn face_stays_unknown_when_profile_write_fails() {
        let (app, state) = make_test_app().await;
        let db = state.db();
        let campus = campus(db).await;
        let (alice, profile) = student(db, &campus, "alice@example.com", "CS-2023-001").await;
        db.execute_unprepared(
            "CREATE TRIGGER freeze_profiles BEFORE UPDATE ON student_profiles \
             BEGIN SELECT RAISE(ABORT, 'profiles are read-only'); END",
        )
        .await
        .unwrap();

        let face = vec![0.1_f32; EMBEDDING_LEN];
        let (status, _) =
            upload(&app, "/api/users/students/register-face", &alice.token, &face).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        assert!(!state.faces().contains("CS-2023-001"));
        assert!(state.faces().is_empty());
        let stored = student_profile::Model::find_by_user(db, profile.user_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.is_face_registered);
    }
}
