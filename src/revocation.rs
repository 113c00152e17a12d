//! Token revocation registry.
//!
//! Revoked tokens are held for the lifetime of the process and consulted on
//! every authenticated request before signature verification. The store is
//! behind a trait so a multi-instance deployment can plug in a shared
//! backend; the default is an in-process set.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

/// A deny-list of revoked bearer tokens.
///
/// Implementations must tolerate concurrent revokes and lookups from many
/// simultaneous requests. `revoke` is idempotent; entries are never removed.
pub trait RevocationStore: Send + Sync {
    /// Mark a token as revoked. Accepts any string, even a malformed token.
    fn revoke(&self, token: &str);

    /// Whether a token has been revoked.
    fn is_revoked(&self, token: &str) -> bool;
}

/// In-memory revocation store. Contents are lost on restart, so a revoked
/// token becomes valid again only once its own expiry has passed anyway.
#[derive(Default)]
pub struct InMemoryRevocations {
    tokens: RwLock<HashSet<String>>,
}

impl RevocationStore for InMemoryRevocations {
    fn revoke(&self, token: &str) {
        let mut tokens = self.tokens.write().expect("revocation lock poisoned");
        tokens.insert(token.to_string());
    }

    fn is_revoked(&self, token: &str) -> bool {
        let tokens = self.tokens.read().expect("revocation lock poisoned");
        tokens.contains(token)
    }
}

/// Shared handle to a revocation store.
pub type Revocations = Arc<dyn RevocationStore>;

/// Create the default in-memory revocation store.
pub fn in_memory() -> Revocations {
    Arc::new(InMemoryRevocations::default())
}
