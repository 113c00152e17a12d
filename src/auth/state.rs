//! Authentication state trait and macro.

use crate::jwt::JwtConfig;
use crate::revocation::Revocations;

/// Trait for state types that provide token verification and the
/// revocation registry for authentication.
pub trait HasAuthBackend {
    fn jwt(&self) -> &JwtConfig;
    fn revocations(&self) -> &Revocations;
}

/// Implement `HasAuthBackend` for state structs with the standard fields.
///
/// The struct must have these fields:
/// - `jwt: Arc<JwtConfig>`
/// - `revocations: Revocations`
#[macro_export]
macro_rules! impl_has_auth_backend {
    ($state_type:ty) => {
        impl $crate::auth::HasAuthBackend for $state_type {
            fn jwt(&self) -> &$crate::jwt::JwtConfig {
                &self.jwt
            }
            fn revocations(&self) -> &$crate::revocation::Revocations {
                &self.revocations
            }
        }
    };
}
