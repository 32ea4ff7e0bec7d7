use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use planner_server::app;
use planner_server::auth::{AllowAll, TokenAuthorizer};
use planner_server::db::Database;
use planner_server::state::AppState;

fn open_app() -> Router {
    app(AppState::new(Database::in_memory(), Arc::new(AllowAll)))
}

fn guarded_app() -> (Router, AppState) {
    let state = AppState::new(
        Database::in_memory(),
        Arc::new(TokenAuthorizer::new(["secret".to_string()])),
    );
    (app(state.clone()), state)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    call_with(app, method, uri, body, None).await
}

async fn call_with(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_task_lifecycle() {
    let app = open_app();

    let (status, created) = call(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({"date": "05-03-2025", "text": "Buy milk", "completed": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["text"], "Buy milk");
    assert_eq!(created["completed"], false);
    let id = created["_id"].as_str().unwrap().to_string();

    let (_, listed) = call(&app, Method::GET, "/api/tasks/05-03-2025", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    let (_, other_day) = call(&app, Method::GET, "/api/tasks/06-03-2025", None).await;
    assert_eq!(other_day, json!([]));

    let (status, updated) = call(
        &app,
        Method::PUT,
        &format!("/api/tasks/{}", id),
        Some(json!({"completed": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["text"], "Buy milk");

    let (status, deleted) = call(&app, Method::DELETE, &format!("/api/tasks/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({"message": "Task deleted"}));

    let (_, listed) = call(&app, Method::GET, "/api/tasks/05-03-2025", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_tasks_keep_insertion_order() {
    let app = open_app();
    for text in ["first", "second", "third"] {
        call(&app, Method::POST, "/api/tasks", Some(json!({"date": "01-01-2026", "text": text}))).await;
    }

    let (_, listed) = call(&app, Method::GET, "/api/tasks/01-01-2026", None).await;
    let texts: Vec<_> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["text"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_task_validation_errors() {
    let app = open_app();

    let (status, body) = call(&app, Method::POST, "/api/tasks", Some(json!({"date": "05-03-2025", "text": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, _) = call(&app, Method::POST, "/api/tasks", Some(json!({"date": "2025-03-05", "text": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, Method::GET, "/api/tasks/5-3-2025", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let app = open_app();

    let (status, _) = call(&app, Method::PUT, "/api/tasks/nope", Some(json!({"completed": true}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, Method::DELETE, "/api/tasks/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, Method::PUT, "/api/notes/nope", Some(json!({"body": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, Method::DELETE, "/api/notes/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_note_lifecycle() {
    let app = open_app();

    let (status, _) = call(&app, Method::POST, "/api/notes", Some(json!({"title": "Ideas"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = call(&app, Method::POST, "/api/notes", Some(json!({"title": "Ideas", "body": "rust"}))).await;
    assert_eq!(status, StatusCode::OK);
    let id = created["_id"].as_str().unwrap().to_string();

    let (_, updated) = call(&app, Method::PUT, &format!("/api/notes/{}", id), Some(json!({"body": "more rust"}))).await;
    assert_eq!(updated["body"], "more rust");
    assert_eq!(updated["title"], "Ideas");

    let (_, listed) = call(&app, Method::GET, "/api/notes", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (_, deleted) = call(&app, Method::DELETE, &format!("/api/notes/{}", id), None).await;
    assert_eq!(deleted, json!({"message": "Note deleted"}));

    let (_, listed) = call(&app, Method::GET, "/api/notes", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_day_notes_overwrite() {
    let app = open_app();

    let (_, empty) = call(&app, Method::GET, "/api/day-notes/05-03-2025", None).await;
    assert_eq!(empty, json!({"date": "05-03-2025", "body": ""}));

    call(&app, Method::PUT, "/api/day-notes/05-03-2025", Some(json!({"body": "first"}))).await;
    call(&app, Method::PUT, "/api/day-notes/05-03-2025", Some(json!({"body": "second"}))).await;

    let (_, note) = call(&app, Method::GET, "/api/day-notes/05-03-2025", None).await;
    assert_eq!(note["body"], "second");
}

#[tokio::test]
async fn test_unauthenticated_request_is_rejected_without_side_effects() {
    let (app, state) = guarded_app();

    let (status, body) = call(&app, Method::GET, "/api/notes", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"message": "Unauthorized"}));

    let (status, _) = call(&app, Method::POST, "/api/notes", Some(json!({"title": "t", "body": "b"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(state.db.read().await.notes.is_empty());

    let (status, _) = call_with(&app, Method::GET, "/api/notes", None, Some("wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call_with(&app, Method::GET, "/api/notes", None, Some("secret")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _) = guarded_app();
    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
