mod common;

use axum::http::StatusCode;
use common::*;
use flashdeck::db::UserRole;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_create_assignment() {
    let (app, db) = create_test_app().await;

    let user_id = insert_user(&db, "learner@example.com", "secret123", UserRole::Student).await;
    let card_id = db.flashcards().create("Q?", "A.", None).await.unwrap();
    let token = login_as(&app, &db, "teacher@example.com", UserRole::Teacher).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/assignments",
            Some(&token),
            json!({ "user_id": user_id, "flashcard_id": card_id }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["user_id"], user_id);
    assert_eq!(body["flashcard_id"], card_id);
    assert!(body.get("assigned_at").is_some());
}

#[tokio::test]
async fn test_create_assignment_requires_staff() {
    let (app, db) = create_test_app().await;

    let user_id = insert_user(&db, "learner@example.com", "secret123", UserRole::Student).await;
    let card_id = db.flashcards().create("Q?", "A.", None).await.unwrap();
    let token = login_as(&app, &db, "student@example.com", UserRole::Student).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/assignments",
            Some(&token),
            json!({ "user_id": user_id, "flashcard_id": card_id }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_assignment_validates_references() {
    let (app, db) = create_test_app().await;

    let user_id = insert_user(&db, "learner@example.com", "secret123", UserRole::Student).await;
    let card_id = db.flashcards().create("Q?", "A.", None).await.unwrap();
    let token = login_as(&app, &db, "teacher@example.com", UserRole::Teacher).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/assignments",
            Some(&token),
            json!({ "user_id": 9999, "flashcard_id": card_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "User does not exist");

    let response = app
        .oneshot(json_request(
            "POST",
            "/assignments",
            Some(&token),
            json!({ "user_id": user_id, "flashcard_id": 9999 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Flashcard does not exist");
}

#[tokio::test]
async fn test_list_assignments_filters_by_user() {
    let (app, db) = create_test_app().await;

    let alice = insert_user(&db, "alice@example.com", "secret123", UserRole::Student).await;
    let bob = insert_user(&db, "bob@example.com", "secret123", UserRole::Student).await;
    let card_id = db.flashcards().create("Q?", "A.", None).await.unwrap();
    db.assignments().create(alice, card_id).await.unwrap();
    db.assignments().create(bob, card_id).await.unwrap();

    let token = login_as(&app, &db, "teacher@example.com", UserRole::Teacher).await;

    let response = app
        .clone()
        .oneshot(request("GET", "/assignments", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let response = app
        .oneshot(request(
            "GET",
            &format!("/assignments?user_id={}", alice),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["user_id"], alice);
}

#[tokio::test]
async fn test_list_assignments_requires_staff() {
    let (app, db) = create_test_app().await;

    let token = login_as(&app, &db, "student@example.com", UserRole::Student).await;

    let response = app
        .oneshot(request("GET", "/assignments", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_get_assignment() {
    let (app, db) = create_test_app().await;

    let user_id = insert_user(&db, "learner@example.com", "secret123", UserRole::Student).await;
    let card_id = db.flashcards().create("Q?", "A.", None).await.unwrap();
    let id = db.assignments().create(user_id, card_id).await.unwrap();

    let token = login_as(&app, &db, "student@example.com", UserRole::Student).await;

    let response = app
        .oneshot(request("GET", &format!("/assignments/{}", id), Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["flashcard_id"], card_id);
}

#[tokio::test]
async fn test_delete_assignment() {
    let (app, db) = create_test_app().await;

    let user_id = insert_user(&db, "learner@example.com", "secret123", UserRole::Student).await;
    let card_id = db.flashcards().create("Q?", "A.", None).await.unwrap();
    let id = db.assignments().create(user_id, card_id).await.unwrap();

    let token = login_as(&app, &db, "teacher@example.com", UserRole::Teacher).await;

    let response = app
        .oneshot(request("DELETE", &format!("/assignments/{}", id), Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(db.assignments().get(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_missing_assignment_not_found() {
    let (app, db) = create_test_app().await;

    let token = login_as(&app, &db, "teacher@example.com", UserRole::Teacher).await;

    let response = app
        .oneshot(request("DELETE", "/assignments/9999", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Assignment not found");
}
