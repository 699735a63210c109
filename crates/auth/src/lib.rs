//! `phonebook-auth`: pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows how
//! to check a password, mint and verify a bearer token, and decide whether an
//! identity's role covers a capability.

pub mod authorize;
pub mod claims;
pub mod credentials;
pub mod permissions;
pub mod roles;
pub mod token;

pub use authorize::{authorize, AuthError};
pub use claims::{validate_claims, TokenClaims};
pub use credentials::{CredentialStore, Identity, PasswordVerifier, Sha256Verifier};
pub use permissions::Capability;
pub use roles::Role;
pub use token::{Hs256Tokens, TokenError, TokenIssuer, TokenVerifier, DEFAULT_TOKEN_TTL_MINUTES};
