//! Assignment API endpoints.

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
use crate::db::Database;
use crate::impl_has_auth_backend;
use crate::jwt::JwtConfig;
use crate::revocation::Revocations;

#[derive(Clone)]
pub struct AssignmentsState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub revocations: Revocations,
}

impl_has_auth_backend!(AssignmentsState);

pub fn router(state: AssignmentsState) -> Router {
    Router::new()
        .route("/", post(create_assignment).get(list_assignments))
        .route("/{id}", get(get_assignment).delete(delete_assignment))
        .with_state(state)
}

#[derive(Deserialize)]
struct CreateAssignmentRequest {
    user_id: i64,
    flashcard_id: i64,
}

async fn create_assignment(
    State(state): State<AssignmentsState>,
    _auth: Auth<Staff>,
    Json(payload): Json<CreateAssignmentRequest>,
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
        .assignments()
        .create(payload.user_id, payload.flashcard_id)
        .await
        .db_err("Failed to create assignment")?;

    let assignment = state
        .db
        .assignments()
        .get(id)
        .await
        .db_err("Failed to load created assignment")?
        .ok_or_else(|| ApiError::internal("Created assignment not found"))?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

#[derive(Deserialize)]
struct ListAssignmentsQuery {
    user_id: Option<i64>,
}

async fn list_assignments(
    State(state): State<AssignmentsState>,
    _auth: Auth<Staff>,
    Query(query): Query<ListAssignmentsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let assignments = match query.user_id {
        Some(user_id) => state
            .db
            .assignments()
            .list_by_user(user_id)
            .await
            .db_err("Failed to list assignments")?,
        None => state
            .db
            .assignments()
            .list()
            .await
            .db_err("Failed to list assignments")?,
    };
    Ok(Json(assignments))
}

async fn get_assignment(
    State(state): State<AssignmentsState>,
    _auth: Auth<AnyRole>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let assignment = state
        .db
        .assignments()
        .get(id)
        .await
        .db_err("Failed to get assignment")?
        .ok_or_else(|| ApiError::not_found("Assignment not found"))?;
    Ok(Json(assignment))
}

async fn delete_assignment(
    State(state): State<AssignmentsState>,
    _auth: Auth<Staff>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let assignment = state
        .db
        .assignments()
        .get(id)
        .await
        .db_err("Failed to get assignment")?
        .ok_or_else(|| ApiError::not_found("Assignment not found"))?;

    state
        .db
        .assignments()
        .delete(id)
        .await
        .db_err("Failed to delete assignment")?;

    Ok(Json(assignment))
}
