//! User account and session API endpoints.
//!
//! - POST `/` - Sign up (public)
//! - POST `/login` - Authenticate and receive a bearer token (public)
//! - POST `/logout` - Revoke the presented token
//! - GET `/` - List users (admin/teacher)
//! - GET `/{id}` - User with assignments and progress
//! - PUT `/{id}` - Partial update (admin)
//! - PATCH `/{id}/role` - Change role (admin)
//! - DELETE `/{id}` - Delete user (admin)

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::{ApiError, ResultExt, validate_email, validate_password};
use crate::auth::{AdminOnly, AnyRole, Auth, Staff, bearer_token};
use crate::db::{Assignment, Database, ProgressRecord, UserRole, UserSummary};
use crate::impl_has_auth_backend;
use crate::jwt::JwtConfig;
use crate::password;
use crate::revocation::Revocations;

#[derive(Clone)]
pub struct UsersState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub revocations: Revocations,
}

impl_has_auth_backend!(UsersState);

pub fn router(state: UsersState) -> Router {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route(
            "/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/{id}/role", patch(update_user_role))
        .with_state(state)
}

#[derive(Deserialize)]
struct CreateUserRequest {
    email: String,
    password: String,
    role: String,
}

async fn create_user(
    State(state): State<UsersState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = payload.email.trim();
    validate_email(email)?;
    validate_password(&payload.password)?;

    let role = UserRole::parse(&payload.role).ok_or_else(|| ApiError::bad_request("Invalid role"))?;

    let taken = state
        .db
        .users()
        .email_taken(email)
        .await
        .db_err("Failed to check email availability")?;

    if taken {
        return Err(ApiError::conflict("User with this email already exists"));
    }

    let digest = password::hash(&payload.password).hash_err("Failed to hash password")?;

    let id = state
        .db
        .users()
        .create(email, &digest, role)
        .await
        .db_err("Failed to create user")?;

    let user = state
        .db
        .users()
        .get_by_id(id)
        .await
        .db_err("Failed to load created user")?
        .ok_or_else(|| ApiError::internal("Created user not found"))?;

    Ok((StatusCode::CREATED, Json(user.summary())))
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    token: String,
    email: String,
    role: UserRole,
}

async fn login(
    State(state): State<UsersState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Same response for unknown email and wrong password, so the endpoint
    // does not reveal which one failed.
    let user = state
        .db
        .users()
        .get_by_email(payload.email.trim())
        .await
        .db_err("Failed to look up user")?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let valid = password::verify(&payload.password, &user.password_hash)
        .hash_err("Failed to verify password")?;

    if !valid {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = state
        .jwt
        .issue(user.id, &user.email, user.role)
        .map_err(|e| {
            tracing::error!("Failed to issue token: {}", e);
            ApiError::internal("Failed to issue token")
        })?;

    Ok(Json(LoginResponse {
        token,
        email: user.email,
        role: user.role,
    }))
}

async fn logout(
    State(state): State<UsersState>,
    headers: HeaderMap,
    _auth: Auth<AnyRole>,
) -> Result<impl IntoResponse, ApiError> {
    // The extractor already validated the header, so the token is present.
    let token = bearer_token(&headers).ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    state.revocations.revoke(token);

    Ok(Json(serde_json::json!({ "message": "Successfully logged out" })))
}

async fn list_users(
    State(state): State<UsersState>,
    _auth: Auth<Staff>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.db.users().list().await.db_err("Failed to list users")?;
    Ok(Json(users))
}

/// A user together with the assignments and progress records it owns.
#[derive(Serialize)]
struct UserDetailResponse {
    #[serde(flatten)]
    user: UserSummary,
    assignments: Vec<Assignment>,
    progresses: Vec<ProgressRecord>,
}

async fn get_user(
    State(state): State<UsersState>,
    _auth: Auth<AnyRole>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .users()
        .get_by_id(id)
        .await
        .db_err("Failed to get user")?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let assignments = state
        .db
        .assignments()
        .list_by_user(id)
        .await
        .db_err("Failed to list assignments")?;

    let progresses = state
        .db
        .progress()
        .list_by_user(id)
        .await
        .db_err("Failed to list progress")?;

    Ok(Json(UserDetailResponse {
        user: user.summary(),
        assignments,
        progresses,
    }))
}

#[derive(Deserialize)]
struct UpdateUserRequest {
    email: Option<String>,
    password: Option<String>,
    role: Option<String>,
}

async fn update_user(
    State(state): State<UsersState>,
    _auth: Auth<AdminOnly>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = payload.email.as_deref().map(str::trim);
    if let Some(email) = email {
        validate_email(email)?;
    }
    if let Some(ref password) = payload.password {
        validate_password(password)?;
    }
    let role = match payload.role.as_deref() {
        Some(s) => Some(UserRole::parse(s).ok_or_else(|| ApiError::bad_request("Invalid role"))?),
        None => None,
    };

    let existing = state
        .db
        .users()
        .get_by_id(id)
        .await
        .db_err("Failed to get user")?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    // Changing the email must not collide with another account.
    if let Some(email) = email {
        if !email.eq_ignore_ascii_case(&existing.email) {
            let taken = state
                .db
                .users()
                .email_taken(email)
                .await
                .db_err("Failed to check email availability")?;
            if taken {
                return Err(ApiError::conflict("User with this email already exists"));
            }
        }
    }

    let digest = match payload.password.as_deref() {
        Some(password) => Some(password::hash(password).hash_err("Failed to hash password")?),
        None => None,
    };

    state
        .db
        .users()
        .update(id, email, digest.as_deref(), role)
        .await
        .db_err("Failed to update user")?;

    let user = state
        .db
        .users()
        .get_by_id(id)
        .await
        .db_err("Failed to load updated user")?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(user.summary()))
}

#[derive(Deserialize)]
struct UpdateRoleRequest {
    role: String,
}

async fn update_user_role(
    State(state): State<UsersState>,
    _auth: Auth<AdminOnly>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let role = UserRole::parse(&payload.role).ok_or_else(|| ApiError::bad_request("Invalid role"))?;

    let updated = state
        .db
        .users()
        .set_role(id, role)
        .await
        .db_err("Failed to update role")?;

    if !updated {
        return Err(ApiError::not_found("User not found"));
    }

    let user = state
        .db
        .users()
        .get_by_id(id)
        .await
        .db_err("Failed to load updated user")?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(user.summary()))
}

async fn delete_user(
    State(state): State<UsersState>,
    _auth: Auth<AdminOnly>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .users()
        .get_by_id(id)
        .await
        .db_err("Failed to get user")?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    state
        .db
        .users()
        .delete(id)
        .await
        .db_err("Failed to delete user")?;

    Ok(Json(user.summary()))
}
