mod assignments;
mod categories;
mod error;
mod flashcards;
mod progress;
mod users;

use axum::Router;
use std::sync::Arc;

use crate::db::Database;
use crate::jwt::JwtConfig;
use crate::revocation::Revocations;

/// Create the API router.
pub fn create_api_router(db: Database, jwt: Arc<JwtConfig>, revocations: Revocations) -> Router {
    let users_state = users::UsersState {
        db: db.clone(),
        jwt: jwt.clone(),
        revocations: revocations.clone(),
    };

    let categories_state = categories::CategoriesState {
        db: db.clone(),
        jwt: jwt.clone(),
        revocations: revocations.clone(),
    };

    let flashcards_state = flashcards::FlashcardsState {
        db: db.clone(),
        jwt: jwt.clone(),
        revocations: revocations.clone(),
    };

    let assignments_state = assignments::AssignmentsState {
        db: db.clone(),
        jwt: jwt.clone(),
        revocations: revocations.clone(),
    };

    let progress_state = progress::ProgressState {
        db,
        jwt,
        revocations,
    };

    Router::new()
        .nest("/users", users::router(users_state))
        .nest("/categories", categories::router(categories_state))
        .nest("/flashcards", flashcards::router(flashcards_state))
        .nest("/assignments", assignments::router(assignments_state))
        .nest("/progress", progress::router(progress_state))
}
