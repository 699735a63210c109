//! Runtime settings: optional `phonebook.toml` overlaid by `PHONEBOOK_*` env vars.

use std::path::PathBuf;

use serde::Deserialize;

use phonebook_auth::{Identity, PasswordVerifier, Role, DEFAULT_TOKEN_TTL_MINUTES};

/// Signing secret used when none is configured. Only fit for local development.
pub const DEV_JWT_SECRET: &str = "phonebook-dev-secret-change-me";

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bind_address: String,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    /// SQLite URL; the record table stays in memory when unset.
    pub database_url: Option<String>,
    pub audit_log_path: PathBuf,
    pub users: Vec<Identity>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            database_url: None,
            audit_log_path: PathBuf::from("audit.log"),
            users: Vec::new(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("phonebook")
    }

    /// Load from `<file_stem>.{toml,json,...}` if present, then the environment.
    pub fn load_from(file_stem: &str) -> Result<Self, config::ConfigError> {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::with_name(file_stem).required(false))
            .add_source(config::Environment::with_prefix("PHONEBOOK").try_parsing(true))
            .build()?
            .try_deserialize()?;

        if settings.token_ttl_minutes <= 0 {
            return Err(config::ConfigError::Message(
                "token_ttl_minutes must be positive".to_string(),
            ));
        }
        if settings.jwt_secret.is_empty() {
            return Err(config::ConfigError::Message(
                "jwt_secret must not be empty".to_string(),
            ));
        }
        if settings.jwt_secret == DEV_JWT_SECRET {
            tracing::warn!("PHONEBOOK_JWT_SECRET not set, using the development secret");
        }
        Ok(settings)
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.token_ttl_minutes)
    }

    /// Configured identities, or the two development identities when none are configured.
    pub fn identities_or_dev_defaults(&self, verifier: &dyn PasswordVerifier) -> Vec<Identity> {
        if !self.users.is_empty() {
            return self.users.clone();
        }

        tracing::warn!("no users configured, seeding development identities");
        dev_identities(verifier)
    }
}

/// `readonlyuser` (read) and `adminuser` (read/write) with their well-known passwords.
pub fn dev_identities(verifier: &dyn PasswordVerifier) -> Vec<Identity> {
    [
        ("readonlyuser", "readonlypassword", Role::Read),
        ("adminuser", "adminpassword", Role::ReadWrite),
    ]
    .into_iter()
    .map(|(username, password, role)| Identity {
        username: username.to_string(),
        password_verifier: verifier.hash(password),
        role,
    })
    .collect()
}

impl core::fmt::Debug for Settings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Settings")
            .field("bind_address", &self.bind_address)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("database_url", &self.database_url)
            .field("audit_log_path", &self.audit_log_path)
            .field("users", &self.users.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phonebook_auth::Sha256Verifier;

    fn write_config(body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("phonebook-{}.toml", uuid::Uuid::now_v7()));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings = Settings::load_from("/nonexistent/phonebook-settings").unwrap();
        assert_eq!(settings.bind_address, "0.0.0.0:8000");
        assert_eq!(settings.token_ttl_minutes, 30);
        assert!(settings.database_url.is_none());
        assert_eq!(settings.audit_log_path, PathBuf::from("audit.log"));
    }

    #[test]
    fn file_supplies_users_and_overrides() {
        let verifier = Sha256Verifier::new();
        let hashed = verifier.hash("s3cret");
        let path = write_config(&format!(
            r#"
bind_address = "127.0.0.1:9000"
jwt_secret = "from-file"
token_ttl_minutes = 5

[[users]]
username = "clerk"
password_verifier = "{hashed}"
role = "read/write"
"#
        ));

        let stem = path.with_extension("");
        let settings = Settings::load_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(settings.bind_address, "127.0.0.1:9000");
        assert_eq!(settings.token_ttl(), chrono::Duration::minutes(5));

        let users = settings.identities_or_dev_defaults(&verifier);
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, Role::ReadWrite);
        assert!(verifier.verify("s3cret", &users[0].password_verifier));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn non_positive_ttl_is_rejected() {
        let path = write_config("token_ttl_minutes = 0\n");
        let stem = path.with_extension("");
        assert!(Settings::load_from(stem.to_str().unwrap()).is_err());
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn dev_identities_cover_both_roles() {
        let verifier = Sha256Verifier::new();
        let users = Settings::default().identities_or_dev_defaults(&verifier);
        let admin = users.iter().find(|u| u.username == "adminuser").unwrap();
        let reader = users.iter().find(|u| u.username == "readonlyuser").unwrap();
        assert_eq!(admin.role, Role::ReadWrite);
        assert_eq!(reader.role, Role::Read);
        assert!(verifier.verify("adminpassword", &admin.password_verifier));
        assert!(!verifier.verify("adminpassword", &reader.password_verifier));
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let settings = Settings {
            jwt_secret: "top-secret".to_string(),
            ..Settings::default()
        };
        assert!(!format!("{settings:?}").contains("top-secret"));
    }
}
