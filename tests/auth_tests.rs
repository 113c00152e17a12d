mod common;

use axum::http::StatusCode;
use common::*;
use flashdeck::db::UserRole;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_missing_token_rejected() {
    let (app, _db) = create_test_app().await;

    let response = app
        .oneshot(request("GET", "/flashcards", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn test_malformed_token_rejected() {
    let (app, _db) = create_test_app().await;

    let response = app
        .oneshot(request("GET", "/flashcards", Some("not-a-real-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn test_token_signed_with_wrong_secret_rejected() {
    let (app, _db) = create_test_app().await;

    let other = flashdeck::jwt::JwtConfig::new(b"a-completely-different-secret-key", 3600);
    let token = other
        .issue(1, "intruder@example.com", UserRole::Admin)
        .unwrap();

    let response = app
        .oneshot(request("GET", "/users", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn test_user_cannot_change_roles() {
    let (app, db) = create_test_app().await;

    let target_id = insert_user(&db, "target@example.com", "password123", UserRole::User).await;
    let token = login_as(&app, &db, "user@example.com", UserRole::User).await;

    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/users/{}/role", target_id),
            Some(&token),
            json!({ "role": "ADMIN" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Forbidden: Insufficient permissions");

    // Role must be unchanged
    let target = db.users().get_by_id(target_id).await.unwrap().unwrap();
    assert_eq!(target.role, UserRole::User);
}

#[tokio::test]
async fn test_teacher_cannot_change_roles() {
    let (app, db) = create_test_app().await;

    let target_id = insert_user(&db, "target@example.com", "password123", UserRole::User).await;
    let token = login_as(&app, &db, "teacher@example.com", UserRole::Teacher).await;

    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/users/{}/role", target_id),
            Some(&token),
            json!({ "role": "ADMIN" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_can_change_roles() {
    let (app, db) = create_test_app().await;

    let target_id = insert_user(&db, "target@example.com", "password123", UserRole::User).await;
    let token = login_as(&app, &db, "admin@example.com", UserRole::Admin).await;

    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/users/{}/role", target_id),
            Some(&token),
            json!({ "role": "TEACHER" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["role"], "TEACHER");

    let target = db.users().get_by_id(target_id).await.unwrap().unwrap();
    assert_eq!(target.role, UserRole::Teacher);
}

#[tokio::test]
async fn test_role_change_with_invalid_role_rejected() {
    let (app, db) = create_test_app().await;

    let target_id = insert_user(&db, "target@example.com", "password123", UserRole::User).await;
    let token = login_as(&app, &db, "admin@example.com", UserRole::Admin).await;

    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/users/{}/role", target_id),
            Some(&token),
            json!({ "role": "SUPERUSER" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid role");

    let target = db.users().get_by_id(target_id).await.unwrap().unwrap();
    assert_eq!(target.role, UserRole::User);
}

#[tokio::test]
async fn test_logout_invalidates_token() {
    let (app, db) = create_test_app().await;

    let token = login_as(&app, &db, "user@example.com", UserRole::User).await;

    // Token works before logout
    let response = app
        .clone()
        .oneshot(request("GET", "/flashcards", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request("POST", "/users/logout", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Successfully logged out");

    // Replaying the token now fails with the revocation message
    let response = app
        .oneshot(request("GET", "/flashcards", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Token has been invalidated");
}

#[tokio::test]
async fn test_logout_does_not_affect_other_sessions() {
    let (app, db) = create_test_app().await;

    insert_user(&db, "user@example.com", "password123", UserRole::User).await;
    let first = login(&app, "user@example.com", "password123").await;
    // iat has second resolution; wait so the second token differs
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    let second = login(&app, "user@example.com", "password123").await;
    assert_ne!(first, second);

    let response = app
        .clone()
        .oneshot(request("POST", "/users/logout", Some(&first)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The second token is untouched
    let response = app
        .oneshot(request("GET", "/flashcards", Some(&second)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_student_can_read_flashcards() {
    let (app, db) = create_test_app().await;

    let token = login_as(&app, &db, "student@example.com", UserRole::Student).await;

    let response = app
        .oneshot(request("GET", "/flashcards", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_student_cannot_create_flashcards() {
    let (app, db) = create_test_app().await;

    let token = login_as(&app, &db, "student@example.com", UserRole::Student).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/flashcards",
            Some(&token),
            json!({ "question": "Q?", "answer": "A." }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Forbidden: Insufficient permissions");
}

#[tokio::test]
async fn test_health_endpoint_is_public() {
    let (app, _db) = create_test_app().await;

    let response = app.oneshot(request("GET", "/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}
