//! Flashcard API endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
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
pub struct FlashcardsState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub revocations: Revocations,
}

impl_has_auth_backend!(FlashcardsState);

pub fn router(state: FlashcardsState) -> Router {
    Router::new()
        .route("/", post(create_flashcard).get(list_flashcards))
        .route(
            "/{id}",
            get(get_flashcard).put(update_flashcard).delete(delete_flashcard),
        )
        .with_state(state)
}

/// Check that a referenced category exists.
async fn check_category(state: &FlashcardsState, category_id: i64) -> Result<(), ApiError> {
    let exists = state
        .db
        .categories()
        .get(category_id)
        .await
        .db_err("Failed to check category")?
        .is_some();
    if !exists {
        return Err(ApiError::bad_request("Category does not exist"));
    }
    Ok(())
}

#[derive(Deserialize)]
struct CreateFlashcardRequest {
    question: String,
    answer: String,
    category_id: Option<i64>,
}

async fn create_flashcard(
    State(state): State<FlashcardsState>,
    _auth: Auth<Staff>,
    Json(payload): Json<CreateFlashcardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let question = payload.question.trim();
    let answer = payload.answer.trim();

    if question.is_empty() {
        return Err(ApiError::bad_request("Question cannot be empty"));
    }
    if answer.is_empty() {
        return Err(ApiError::bad_request("Answer cannot be empty"));
    }
    if let Some(category_id) = payload.category_id {
        check_category(&state, category_id).await?;
    }

    let id = state
        .db
        .flashcards()
        .create(question, answer, payload.category_id)
        .await
        .db_err("Failed to create flashcard")?;

    let flashcard = state
        .db
        .flashcards()
        .get(id)
        .await
        .db_err("Failed to load created flashcard")?
        .ok_or_else(|| ApiError::internal("Created flashcard not found"))?;

    Ok((StatusCode::CREATED, Json(flashcard)))
}

async fn list_flashcards(
    State(state): State<FlashcardsState>,
    _auth: Auth<AnyRole>,
) -> Result<impl IntoResponse, ApiError> {
    let flashcards = state
        .db
        .flashcards()
        .list()
        .await
        .db_err("Failed to list flashcards")?;
    Ok(Json(flashcards))
}

async fn get_flashcard(
    State(state): State<FlashcardsState>,
    _auth: Auth<AnyRole>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let flashcard = state
        .db
        .flashcards()
        .get(id)
        .await
        .db_err("Failed to get flashcard")?
        .ok_or_else(|| ApiError::not_found("Flashcard not found"))?;
    Ok(Json(flashcard))
}

#[derive(Deserialize)]
struct UpdateFlashcardRequest {
    question: Option<String>,
    answer: Option<String>,
    category_id: Option<i64>,
}

async fn update_flashcard(
    State(state): State<FlashcardsState>,
    _auth: Auth<Staff>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateFlashcardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let question = payload.question.as_deref().map(str::trim);
    let answer = payload.answer.as_deref().map(str::trim);

    if question == Some("") {
        return Err(ApiError::bad_request("Question cannot be empty"));
    }
    if answer == Some("") {
        return Err(ApiError::bad_request("Answer cannot be empty"));
    }
    if let Some(category_id) = payload.category_id {
        check_category(&state, category_id).await?;
    }

    let updated = state
        .db
        .flashcards()
        .update(id, question, answer, payload.category_id)
        .await
        .db_err("Failed to update flashcard")?;

    if !updated {
        return Err(ApiError::not_found("Flashcard not found"));
    }

    let flashcard = state
        .db
        .flashcards()
        .get(id)
        .await
        .db_err("Failed to load updated flashcard")?
        .ok_or_else(|| ApiError::not_found("Flashcard not found"))?;

    Ok(Json(flashcard))
}

async fn delete_flashcard(
    State(state): State<FlashcardsState>,
    _auth: Auth<Staff>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let flashcard = state
        .db
        .flashcards()
        .get(id)
        .await
        .db_err("Failed to get flashcard")?
        .ok_or_else(|| ApiError::not_found("Flashcard not found"))?;

    state
        .db
        .flashcards()
        .delete(id)
        .await
        .db_err("Failed to delete flashcard")?;

    Ok(Json(flashcard))
}
