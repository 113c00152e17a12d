//! Axum extractors for authentication.

use std::marker::PhantomData;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

use super::errors::{AuthError, AuthErrorKind};
use super::policy::RoleConstraint;
use super::state::HasAuthBackend;
use crate::jwt::Claims;

/// Extract the bearer token from the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(str::trim)
}

/// Core authentication logic shared by all role constraints.
/// Checks header shape, revocation, then signature/expiry.
fn authenticate_request<S>(parts: &Parts, state: &S) -> Result<Claims, AuthErrorKind>
where
    S: HasAuthBackend,
{
    let token = bearer_token(&parts.headers).ok_or(AuthErrorKind::MissingToken)?;

    if token.is_empty() {
        return Err(AuthErrorKind::MissingToken);
    }

    // Revocation is checked first so a logged-out token is rejected with a
    // distinct message even after it would have expired.
    if state.revocations().is_revoked(token) {
        return Err(AuthErrorKind::TokenRevoked);
    }

    state
        .jwt()
        .verify(token)
        .map_err(|_| AuthErrorKind::InvalidToken)
}

/// Extractor for routes that require authentication.
///
/// The type parameter names the allowed role set, e.g. `Auth<AdminOnly>`.
/// Rejections are JSON errors: 401 for missing/invalid/revoked tokens,
/// 403 when the role claim is outside the allowed set.
pub struct Auth<R: RoleConstraint> {
    pub claims: Claims,
    _roles: PhantomData<R>,
}

impl<S, R> FromRequestParts<S> for Auth<R>
where
    S: HasAuthBackend + Send + Sync,
    R: RoleConstraint,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = authenticate_request(parts, state).map_err(AuthError)?;

        if !R::allows(claims.role) {
            return Err(AuthError(AuthErrorKind::InsufficientRole));
        }

        Ok(Auth {
            claims,
            _roles: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_present() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );

        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );

        assert_eq!(bearer_token(&headers), None);
    }
}
