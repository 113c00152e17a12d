//! JWT bearer authentication with role-based access control.
//!
//! Every protected route extracts `Auth<R>` where `R` names the allowed
//! role set. The extractor checks the revocation registry before verifying
//! the token signature, so a logged-out token is rejected even while its
//! expiry has not passed.

mod errors;
mod extractors;
mod policy;
mod state;

pub use errors::{AuthError, AuthErrorKind};
pub use extractors::{Auth, bearer_token};
pub use policy::{AdminOnly, AnyRole, RoleConstraint, Staff};
pub use state::HasAuthBackend;
