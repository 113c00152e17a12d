#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use flashdeck::{ServerConfig, create_app, db::Database, db::UserRole, password, revocation};
use serde_json::{Value, json};
use tower::ServiceExt;

pub async fn create_test_app() -> (axum::Router, Database) {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");
    let config = ServerConfig {
        db: db.clone(),
        jwt_secret: b"test-jwt-secret-for-testing-only".to_vec(),
        token_ttl_secs: 60 * 60,
        revocations: revocation::in_memory(),
    };
    (create_app(&config), db)
}

/// Build a JSON request, optionally with a bearer token.
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

/// Build a bodyless request, optionally with a bearer token.
pub fn request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).expect("Failed to build request")
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not valid JSON")
}

/// Insert a user directly into the database with a hashed password.
pub async fn insert_user(db: &Database, email: &str, pass: &str, role: UserRole) -> i64 {
    let digest = password::hash(pass).expect("Failed to hash password");
    db.users()
        .create(email, &digest, role)
        .await
        .expect("Failed to insert user")
}

/// Log in through the API and return the bearer token.
pub async fn login(app: &axum::Router, email: &str, pass: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/users/login",
            None,
            json!({ "email": email, "password": pass }),
        ))
        .await
        .expect("Login request failed");
    assert_eq!(response.status(), StatusCode::OK, "Login should succeed");
    let body = body_json(response).await;
    body["token"]
        .as_str()
        .expect("Login response should contain a token")
        .to_string()
}

/// Insert a user and log them in.
pub async fn login_as(app: &axum::Router, db: &Database, email: &str, role: UserRole) -> String {
    insert_user(db, email, "password123", role).await;
    login(app, email, "password123").await
}
