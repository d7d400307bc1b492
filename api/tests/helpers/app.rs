use std::sync::Arc;

use api::app;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use db::test_utils::setup_test_db;
use serde_json::Value;
use tower::ServiceExt;
use util::faces::{EmbeddingUploadEncoder, FaceRegistry};
use util::state::AppState;

/// Fresh in-memory database with migrations and default roles, and a
/// face registry that is never persisted.
pub async fn make_test_app() -> (Router, AppState) {
    let db = setup_test_db().await;
    let faces = Arc::new(FaceRegistry::new(None, 0.6, Box::new(EmbeddingUploadEncoder)));
    let app_state = AppState::new(db, faces);
    (app(app_state.clone()), app_state)
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(req).await.unwrap();
    json_of(response).await
}

pub async fn json_of(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
