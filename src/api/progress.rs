//! Progress tracking API endpoints.
//!
//! A review action sets the status, increments the review counter, and
//! stamps the review time in one update.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;

use super::error::{ApiError, ResultExt};
use crate::auth::{AnyRole, Auth, Staff};
use crate::db::{Database, ProgressStatus};
use crate::impl_has_auth_backend;
use crate::jwt::JwtConfig;
use crate::revocation::Revocations;

#[derive(Clone)]
pub struct ProgressState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub revocations: Revocations,
}

impl_has_auth_backend!(ProgressState);

pub fn router(state: ProgressState) -> Router {
    Router::new()
        .route("/", post(create_progress).get(list_progress))
        .route("/{id}", get(get_progress).delete(delete_progress))
        .route("/{id}/review", post(record_review))
        .with_state(state)
}

#[derive(Deserialize)]
struct CreateProgressRequest {
    user_id: i64,
    flashcard_id: i64,
}

async fn create_progress(
    State(state): State<ProgressState>,
    _auth: Auth<Staff>,
    Json(payload): Json<CreateProgressRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_exists = state
        .db
        .users()
        .get_by_id(payload.user_id)
        .await
        .db_err("Failed to check user")?
        .is_some();
    if !user_exists {
        return Err(ApiError::bad_request("User does not exist"));
    }

    let flashcard_exists = state
        .db
        .flashcards()
        .get(payload.flashcard_id)
        .await
        .db_err("Failed to check flashcard")?
        .is_some();
    if !flashcard_exists {
        return Err(ApiError::bad_request("Flashcard does not exist"));
    }

    let id = state
        .db
        .progress()
        .create(payload.user_id, payload.flashcard_id)
        .await
        .db_err("Failed to create progress record")?;

    let record = state
        .db
        .progress()
        .get(id)
        .await
        .db_err("Failed to load created progress record")?
        .ok_or_else(|| ApiError::internal("Created progress record not found"))?;

    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Deserialize)]
struct ListProgressQuery {
    user_id: Option<i64>,
}

async fn list_progress(
    State(state): State<ProgressState>,
    _auth: Auth<AnyRole>,
    Query(query): Query<ListProgressQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let records = match query.user_id {
        Some(user_id) => state
            .db
            .progress()
            .list_by_user(user_id)
            .await
            .db_err("Failed to list progress")?,
        None => state
            .db
            .progress()
            .list()
            .await
            .db_err("Failed to list progress")?,
    };
    Ok(Json(records))
}

async fn get_progress(
    State(state): State<ProgressState>,
    _auth: Auth<AnyRole>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .db
        .progress()
        .get(id)
        .await
        .db_err("Failed to get progress record")?
        .ok_or_else(|| ApiError::not_found("Progress record not found"))?;
    Ok(Json(record))
}

#[derive(Deserialize)]
struct RecordReviewRequest {
    status: String,
}

async fn record_review(
    State(state): State<ProgressState>,
    _auth: Auth<AnyRole>,
    Path(id): Path<i64>,
    Json(payload): Json<RecordReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let status = ProgressStatus::parse(&payload.status)
        .ok_or_else(|| ApiError::bad_request("Invalid status"))?;

    let updated = state
        .db
        .progress()
        .record_review(id, status)
        .await
        .db_err("Failed to record review")?;

    if !updated {
        return Err(ApiError::not_found("Progress record not found"));
    }

    let record = state
        .db
        .progress()
        .get(id)
        .await
        .db_err("Failed to load progress record")?
        .ok_or_else(|| ApiError::not_found("Progress record not found"))?;

    Ok(Json(record))
}

async fn delete_progress(
    State(state): State<ProgressState>,
    _auth: Auth<Staff>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .db
        .progress()
        .get(id)
        .await
        .db_err("Failed to get progress record")?
        .ok_or_else(|| ApiError::not_found("Progress record not found"))?;

    state
        .db
        .progress()
        .delete(id)
        .await
        .db_err("Failed to delete progress record")?;

    Ok(Json(record))
}
