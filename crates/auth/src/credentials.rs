//! Registered identities and password verification.

use std::collections::HashMap;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use rand::RngCore;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::Role;

/// One-way password check.
///
/// Implementations must do the same amount of work whether or not the
/// password matches.
pub trait PasswordVerifier: Send + Sync {
    /// Produce a verifier string for `plaintext` (salted, one-way).
    fn hash(&self, plaintext: &str) -> String;

    /// Check `plaintext` against a verifier previously produced by [`hash`](Self::hash).
    fn verify(&self, plaintext: &str, verifier: &str) -> bool;
}

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

/// Salted SHA-256 verifier: `sha256$<salt>$<digest>`, both parts unpadded base64.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Verifier;

impl Sha256Verifier {
    pub fn new() -> Self {
        Self
    }

    fn digest(salt: &[u8], plaintext: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(plaintext.as_bytes());
        hasher.finalize().into()
    }
}

impl PasswordVerifier for Sha256Verifier {
    fn hash(&self, plaintext: &str) -> String {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let digest = Self::digest(&salt, plaintext);
        format!(
            "{SCHEME}${}${}",
            STANDARD_NO_PAD.encode(salt),
            STANDARD_NO_PAD.encode(digest)
        )
    }

    fn verify(&self, plaintext: &str, verifier: &str) -> bool {
        let mut parts = verifier.splitn(3, '$');
        let (Some(SCHEME), Some(salt), Some(expected)) = (parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        let (Ok(salt), Ok(expected)) = (STANDARD_NO_PAD.decode(salt), STANDARD_NO_PAD.decode(expected))
        else {
            return false;
        };

        let actual = Self::digest(&salt, plaintext);
        actual.as_slice().ct_eq(expected.as_slice()).into()
    }
}

/// A registered identity.
///
/// Identities are fixed at start-up and never change while the process runs.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Identity {
    pub username: String,
    pub password_verifier: String,
    pub role: Role,
}

impl core::fmt::Debug for Identity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Identity")
            .field("username", &self.username)
            .field("password_verifier", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Fixed username → identity mapping plus the verifier used to check passwords.
#[derive(Clone)]
pub struct CredentialStore {
    identities: HashMap<String, Identity>,
    verifier: Arc<dyn PasswordVerifier>,
    // Checked when the username is unknown so both paths cost one verify.
    decoy: String,
}

impl CredentialStore {
    pub fn new(identities: impl IntoIterator<Item = Identity>, verifier: Arc<dyn PasswordVerifier>) -> Self {
        let decoy = verifier.hash("");
        let identities = identities
            .into_iter()
            .map(|identity| (identity.username.clone(), identity))
            .collect();
        Self {
            identities,
            verifier,
            decoy,
        }
    }

    /// Check a username/password pair; returns the identity only on a match.
    pub fn verify(&self, username: &str, password: &str) -> Option<Identity> {
        match self.identities.get(username) {
            Some(identity) if self.verifier.verify(password, &identity.password_verifier) => {
                Some(identity.clone())
            }
            Some(_) => None,
            None => {
                let _ = self.verifier.verify(password, &self.decoy);
                None
            }
        }
    }

    pub fn lookup(&self, username: &str) -> Option<&Identity> {
        self.identities.get(username)
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

impl core::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut usernames: Vec<&str> = self.identities.keys().map(String::as_str).collect();
        usernames.sort_unstable();
        f.debug_struct("CredentialStore")
            .field("usernames", &usernames)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CredentialStore {
        let verifier = Arc::new(Sha256Verifier::new());
        CredentialStore::new(
            [
                Identity {
                    username: "readonlyuser".to_string(),
                    password_verifier: verifier.hash("readonlypassword"),
                    role: Role::Read,
                },
                Identity {
                    username: "adminuser".to_string(),
                    password_verifier: verifier.hash("adminpassword"),
                    role: Role::ReadWrite,
                },
            ],
            verifier,
        )
    }

    #[test]
    fn sha256_verifier_round_trips() {
        let v = Sha256Verifier::new();
        let hashed = v.hash("hunter2");
        assert!(hashed.starts_with("sha256$"));
        assert!(v.verify("hunter2", &hashed));
        assert!(!v.verify("hunter3", &hashed));
    }

    #[test]
    fn sha256_verifier_salts_each_hash() {
        let v = Sha256Verifier::new();
        assert_ne!(v.hash("same"), v.hash("same"));
    }

    #[test]
    fn malformed_verifiers_never_match() {
        let v = Sha256Verifier::new();
        assert!(!v.verify("x", ""));
        assert!(!v.verify("x", "plain-text-password"));
        assert!(!v.verify("x", "md5$abc$def"));
        assert!(!v.verify("x", "sha256$!!!$???"));
    }

    #[test]
    fn verify_returns_identity_on_match() {
        let store = store();
        let identity = store.verify("adminuser", "adminpassword").unwrap();
        assert_eq!(identity.role, Role::ReadWrite);
    }

    #[test]
    fn verify_rejects_wrong_password_and_unknown_user() {
        let store = store();
        assert!(store.verify("adminuser", "readonlypassword").is_none());
        assert!(store.verify("nobody", "adminpassword").is_none());
    }

    #[test]
    fn debug_output_hides_verifiers() {
        let store = store();
        let identity = store.lookup("adminuser").unwrap();
        let rendered = format!("{identity:?} {store:?}");
        assert!(!rendered.contains(&identity.password_verifier));
        assert!(rendered.contains("<redacted>"));
    }
}
