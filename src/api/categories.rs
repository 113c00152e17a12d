//! Category API endpoints.

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
pub struct CategoriesState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub revocations: Revocations,
}

impl_has_auth_backend!(CategoriesState);

pub fn router(state: CategoriesState) -> Router {
    Router::new()
        .route("/", post(create_category).get(list_categories))
        .route(
            "/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .with_state(state)
}

#[derive(Deserialize)]
struct CreateCategoryRequest {
    name: String,
    description: Option<String>,
}

async fn create_category(
    State(state): State<CategoriesState>,
    _auth: Auth<Staff>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Category name cannot be empty"));
    }

    let taken = state
        .db
        .categories()
        .name_taken(name)
        .await
        .db_err("Failed to check category name")?;

    if taken {
        return Err(ApiError::conflict("Category name is already taken"));
    }

    let id = state
        .db
        .categories()
        .create(name, payload.description.as_deref())
        .await
        .db_err("Failed to create category")?;

    let category = state
        .db
        .categories()
        .get(id)
        .await
        .db_err("Failed to load created category")?
        .ok_or_else(|| ApiError::internal("Created category not found"))?;

    Ok((StatusCode::CREATED, Json(category)))
}

async fn list_categories(
    State(state): State<CategoriesState>,
    _auth: Auth<AnyRole>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state
        .db
        .categories()
        .list()
        .await
        .db_err("Failed to list categories")?;
    Ok(Json(categories))
}

async fn get_category(
    State(state): State<CategoriesState>,
    _auth: Auth<AnyRole>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .db
        .categories()
        .get(id)
        .await
        .db_err("Failed to get category")?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;
    Ok(Json(category))
}

#[derive(Deserialize)]
struct UpdateCategoryRequest {
    name: Option<String>,
    description: Option<String>,
}

async fn update_category(
    State(state): State<CategoriesState>,
    _auth: Auth<Staff>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = payload.name.as_deref().map(str::trim);
    if let Some(name) = name {
        if name.is_empty() {
            return Err(ApiError::bad_request("Category name cannot be empty"));
        }
    }

    let existing = state
        .db
        .categories()
        .get(id)
        .await
        .db_err("Failed to get category")?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;

    if let Some(name) = name {
        if name != existing.name {
            let taken = state
                .db
                .categories()
                .name_taken(name)
                .await
                .db_err("Failed to check category name")?;
            if taken {
                return Err(ApiError::conflict("Category name is already taken"));
            }
        }
    }

    state
        .db
        .categories()
        .update(id, name, payload.description.as_deref())
        .await
        .db_err("Failed to update category")?;

    let category = state
        .db
        .categories()
        .get(id)
        .await
        .db_err("Failed to load updated category")?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;

    Ok(Json(category))
}

async fn delete_category(
    State(state): State<CategoriesState>,
    _auth: Auth<Staff>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .db
        .categories()
        .get(id)
        .await
        .db_err("Failed to get category")?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;

    // Flashcards in the category are orphaned, not deleted.
    state
        .db
        .categories()
        .delete(id)
        .await
        .db_err("Failed to delete category")?;

    Ok(Json(category))
}
