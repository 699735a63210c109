//! Infrastructure wiring: which record table, audit sink and token scheme back the API.

use std::sync::Arc;

use anyhow::Context;

use phonebook_auth::{CredentialStore, Hs256Tokens, PasswordVerifier, Sha256Verifier, TokenIssuer, TokenVerifier};
use phonebook_infra::audit::{AuditSink, FileAuditLog, InMemoryAuditLog};
use phonebook_infra::config::{dev_identities, Settings};
use phonebook_infra::record_store::{InMemoryRecordTable, RecordTable, SqliteRecordTable};
use phonebook_infra::DirectoryService;

const SQLITE_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone)]
pub struct AppServices {
    pub directory: DirectoryService,
    pub issuer: Arc<dyn TokenIssuer>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppServices {
    pub fn new(directory: DirectoryService, tokens: Arc<Hs256Tokens>) -> Self {
        Self {
            directory,
            issuer: tokens.clone(),
            verifier: tokens,
        }
    }

    /// Fully in-memory wiring with the development identities (dev/test).
    ///
    /// Returns the audit log too so callers can inspect what was recorded.
    pub fn in_memory(tokens: Hs256Tokens) -> (Self, Arc<InMemoryAuditLog>) {
        let verifier: Arc<dyn PasswordVerifier> = Arc::new(Sha256Verifier::new());
        let credentials = CredentialStore::new(dev_identities(verifier.as_ref()), verifier);
        let audit = Arc::new(InMemoryAuditLog::new());

        let directory = DirectoryService::new(
            Arc::new(InMemoryRecordTable::new()),
            audit.clone(),
            Arc::new(credentials),
        );
        (Self::new(directory, Arc::new(tokens)), audit)
    }
}

pub async fn build_services(settings: &Settings) -> anyhow::Result<AppServices> {
    let verifier: Arc<dyn PasswordVerifier> = Arc::new(Sha256Verifier::new());
    let identities = settings.identities_or_dev_defaults(verifier.as_ref());
    let credentials = Arc::new(CredentialStore::new(identities, verifier));

    let table: Arc<dyn RecordTable> = match &settings.database_url {
        Some(url) => {
            let table = SqliteRecordTable::connect(url, SQLITE_MAX_CONNECTIONS)
                .await
                .with_context(|| format!("failed to open record table at {url}"))?;
            tracing::info!(database_url = %url, "using SQLite record table");
            Arc::new(table)
        }
        None => {
            tracing::warn!("no database_url configured, records are kept in memory");
            Arc::new(InMemoryRecordTable::new())
        }
    };

    let audit: Arc<dyn AuditSink> = Arc::new(
        FileAuditLog::open(&settings.audit_log_path)
            .await
            .with_context(|| format!("failed to open audit log {}", settings.audit_log_path.display()))?,
    );

    let tokens = Arc::new(Hs256Tokens::with_ttl(
        settings.jwt_secret.as_bytes(),
        settings.token_ttl(),
    ));

    tracing::info!(users = credentials.len(), "credential store ready");
    Ok(AppServices::new(
        DirectoryService::new(table, audit, credentials),
        tokens,
    ))
}
