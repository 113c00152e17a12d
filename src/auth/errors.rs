//! Authentication error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Why a request failed the authorization gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// No bearer token in the Authorization header
    MissingToken,
    /// Token failed signature, shape, or expiry checks
    InvalidToken,
    /// Token was revoked by a logout
    TokenRevoked,
    /// Valid identity, role not in the route's allowed set
    InsufficientRole,
}

/// Authorization gate rejection. Returns a JSON `{"error": ...}` body.
#[derive(Debug)]
pub struct AuthError(pub AuthErrorKind);

impl AuthError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            AuthErrorKind::MissingToken
            | AuthErrorKind::InvalidToken
            | AuthErrorKind::TokenRevoked => StatusCode::UNAUTHORIZED,
            AuthErrorKind::InsufficientRole => StatusCode::FORBIDDEN,
        }
    }

    fn message(&self) -> &'static str {
        match self.0 {
            AuthErrorKind::MissingToken => "Unauthorized",
            AuthErrorKind::InvalidToken => "Invalid token",
            AuthErrorKind::TokenRevoked => "Token has been invalidated",
            AuthErrorKind::InsufficientRole => "Forbidden: Insufficient permissions",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        #[derive(serde::Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        (
            self.status_code(),
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
