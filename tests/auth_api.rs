use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use credgate::{
    auth::{MemoryUserStore, UserStore},
    build_app, AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> (Router, Arc<MemoryUserStore>) {
    let store = Arc::new(MemoryUserStore::new());
    let state = AppState::from_parts(store.clone() as Arc<dyn UserStore>);
    (build_app(state), store)
}

async fn post_json(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn sign_up_then_sign_in_scenario() {
    let (app, store) = test_app();

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/sign-up",
        json!({"email": "a@b.com", "password": "p1", "firstName": "A", "lastName": "B"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/sign-up",
        json!({"email": "a@b.com", "password": "p1", "firstName": "A", "lastName": "B"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({"error": "User already exists"}));
    assert_eq!(store.count().unwrap(), 1);

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/sign-in",
        json!({"email": "a@b.com", "password": "wrong"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Invalid password"}));

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/sign-in",
        json!({"email": "a@b.com", "password": "p1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "a@b.com");
    assert_eq!(body["user"]["firstName"], "A");
    assert_eq!(body["user"]["lastName"], "B");
    assert!(body["user"]["id"].is_string());
    assert!(body["user"]["createdAt"].is_string());
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn sign_in_unknown_email() {
    let (app, _) = test_app();
    let (status, body) = post_json(
        &app,
        "/api/v1/auth/sign-in",
        json!({"email": "ghost@b.com", "password": "p1"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "No user found"}));
}

#[tokio::test]
async fn invalid_input_is_reported_separately_from_domain_errors() {
    let (app, store) = test_app();
    let (status, body) = post_json(
        &app,
        "/api/v1/auth/sign-up",
        json!({"email": "not-an-email", "password": "p1", "firstName": "A", "lastName": "B"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid email"}));
    assert_eq!(store.count().unwrap(), 0);
}

#[tokio::test]
async fn missing_fields_come_back_as_json_error() {
    let (app, store) = test_app();
    let (status, body) = post_json(
        &app,
        "/api/v1/auth/sign-up",
        json!({"email": "a@b.com", "password": "p1"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().expect("error message in JSON body");
    assert!(message.contains("firstName"), "got {message}");
    assert_eq!(store.count().unwrap(), 0);

    let (status, body) = post_json(&app, "/api/v1/auth/sign-in", json!({"email": "a@b.com"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unparseable_body_comes_back_as_json_error() {
    let (app, _) = test_app();
    let res = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/auth/sign-in")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        res.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "application/json"
    );
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn missing_content_type_comes_back_as_json_error() {
    let (app, _) = test_app();
    let res = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/auth/sign-up")
                .body(Body::from(r#"{"email":"a@b.com"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn health_is_ok() {
    let (app, _) = test_app();
    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}
