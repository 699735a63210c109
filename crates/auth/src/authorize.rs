use thiserror::Error;

use crate::{Capability, CredentialStore, Identity};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Missing/invalid token, or a token whose subject is no longer registered.
    #[error("invalid credentials")]
    Unauthorized,

    #[error("insufficient privileges: '{0}' required")]
    Forbidden(Capability),
}

/// Resolve a token subject to its identity and check its role covers `required`.
///
/// - No IO
/// - No panics
/// - Runs for every operation, reads included
pub fn authorize<'a>(
    credentials: &'a CredentialStore,
    username: &str,
    required: Capability,
) -> Result<&'a Identity, AuthError> {
    let identity = credentials.lookup(username).ok_or(AuthError::Unauthorized)?;

    if identity.role.grants(required) {
        Ok(identity)
    } else {
        tracing::debug!(username, role = %identity.role, %required, "authorization denied");
        Err(AuthError::Forbidden(required))
    }
}
