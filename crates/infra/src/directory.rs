//! Directory service: the record lifecycle behind the authorization gate.
//!
//! Every operation runs in the same order:
//! 1. `authorize` the token subject for the required capability
//! 2. validate inputs (name before phone; first failure wins)
//! 3. touch the record table
//! 4. append one audit entry (after the table operation committed)
//!
//! A mutation is either applied and audited, or not applied: when the audit
//! entry for a committed add/delete cannot be written, the table change is
//! reverted and the caller gets `Internal`. Failed audits of reads and
//! denials change nothing and are only logged with `warn!`.

use std::sync::Arc;

use thiserror::Error;

use phonebook_auth::{authorize, AuthError, Capability, CredentialStore};
use phonebook_core::RecordId;
use phonebook_directory::{DirectoryRecord, FullName, PhoneNumber, RecordKey};

use crate::audit::{AuditAction, AuditEntry, AuditSink};
use crate::record_store::{RecordTable, StoreError};

/// Which field a delete looked records up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupField {
    Name,
    Number,
}

impl LookupField {
    fn noun(&self) -> &'static str {
        match self {
            LookupField::Name => "person",
            LookupField::Number => "number",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("invalid credentials")]
    Unauthorized,

    #[error("insufficient privileges")]
    Forbidden,

    #[error("invalid input for name")]
    InvalidName,

    #[error("invalid input for phone number")]
    InvalidPhone,

    #[error("person already exists")]
    Duplicate,

    #[error("{} not found", .0.noun())]
    NotFound(LookupField),

    /// Storage failure. The message is diagnostic and must not reach clients.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for DirectoryError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::Unauthorized => DirectoryError::Unauthorized,
            AuthError::Forbidden(_) => DirectoryError::Forbidden,
        }
    }
}

impl From<StoreError> for DirectoryError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Duplicate => DirectoryError::Duplicate,
            StoreError::Backend(msg) => {
                tracing::error!(error = %msg, "record table failure");
                DirectoryError::Internal(msg)
            }
        }
    }
}

/// How to take back a committed mutation whose audit entry was lost.
enum Revert {
    Remove(RecordId),
    Reinsert(DirectoryRecord),
}

/// Owns the record table; credentials and the audit sink are shared collaborators.
#[derive(Clone)]
pub struct DirectoryService {
    table: Arc<dyn RecordTable>,
    audit: Arc<dyn AuditSink>,
    credentials: Arc<CredentialStore>,
}

impl DirectoryService {
    pub fn new(
        table: Arc<dyn RecordTable>,
        audit: Arc<dyn AuditSink>,
        credentials: Arc<CredentialStore>,
    ) -> Self {
        Self {
            table,
            audit,
            credentials,
        }
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    /// All records in insertion order.
    pub async fn list(&self, subject: &str) -> Result<Vec<DirectoryRecord>, DirectoryError> {
        self.authorize(subject, Capability::Read, "list").await?;

        let records = self.table.list().await?;
        self.audit(AuditAction::List, "Listed phonebook entries".to_string())
            .await;
        Ok(records)
    }

    pub async fn add(
        &self,
        subject: &str,
        full_name: &str,
        phone_number: &str,
    ) -> Result<DirectoryRecord, DirectoryError> {
        self.authorize(subject, Capability::Write, "add").await?;

        let denied = || format!("Denied these input: {full_name}, {phone_number}");
        let Ok(name) = FullName::parse(full_name) else {
            self.audit(AuditAction::AddDeniedInvalidName, denied()).await;
            return Err(DirectoryError::InvalidName);
        };
        let Ok(phone) = PhoneNumber::parse(phone_number) else {
            self.audit(AuditAction::AddDeniedInvalidPhone, denied()).await;
            return Err(DirectoryError::InvalidPhone);
        };

        // Fast path only; the table enforces uniqueness on insert.
        if self.table.contains(&name, &phone).await? {
            self.audit(AuditAction::AddDeniedDuplicate, denied()).await;
            return Err(DirectoryError::Duplicate);
        }

        match self.table.insert(DirectoryRecord::new(name, phone)).await {
            Ok(record) => {
                self.audit_mutation(
                    AuditAction::Add,
                    format!("Added: {}, {}", record.full_name, record.phone_number),
                    Revert::Remove(record.id),
                )
                .await?;
                tracing::info!(id = %record.id, username = subject, "record added");
                Ok(record)
            }
            Err(StoreError::Duplicate) => {
                self.audit(AuditAction::AddDeniedDuplicate, denied()).await;
                Err(DirectoryError::Duplicate)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the oldest record whose name matches exactly.
    pub async fn delete_by_name(
        &self,
        subject: &str,
        full_name: &str,
    ) -> Result<DirectoryRecord, DirectoryError> {
        self.authorize(subject, Capability::Write, "delete by name").await?;

        let denied = || format!("Denied these input: {full_name}");
        let Ok(name) = FullName::parse(full_name) else {
            self.audit(AuditAction::DeleteByNameDeniedInvalidName, denied()).await;
            return Err(DirectoryError::InvalidName);
        };

        match self.table.delete_first(&RecordKey::Name(name)).await? {
            Some(record) => {
                self.audit_mutation(
                    AuditAction::Delete,
                    format!(
                        "Deleted by name, details: {},{}",
                        record.full_name, record.phone_number
                    ),
                    Revert::Reinsert(record.clone()),
                )
                .await?;
                tracing::info!(id = %record.id, username = subject, "record deleted by name");
                Ok(record)
            }
            None => {
                self.audit(AuditAction::DeleteByNameDeniedNotFound, denied()).await;
                Err(DirectoryError::NotFound(LookupField::Name))
            }
        }
    }

    /// Delete the oldest record whose number matches exactly (as entered, no normalization).
    pub async fn delete_by_number(
        &self,
        subject: &str,
        phone_number: &str,
    ) -> Result<DirectoryRecord, DirectoryError> {
        self.authorize(subject, Capability::Write, "delete by number").await?;

        let denied = || format!("Denied these input: {phone_number}");
        let Ok(phone) = PhoneNumber::parse(phone_number) else {
            self.audit(AuditAction::DeleteByNumberDeniedInvalidPhone, denied()).await;
            return Err(DirectoryError::InvalidPhone);
        };

        match self.table.delete_first(&RecordKey::Number(phone)).await? {
            Some(record) => {
                self.audit_mutation(
                    AuditAction::Delete,
                    format!(
                        "Deleted by phone number, details: {},{}",
                        record.phone_number, record.full_name
                    ),
                    Revert::Reinsert(record.clone()),
                )
                .await?;
                tracing::info!(id = %record.id, username = subject, "record deleted by number");
                Ok(record)
            }
            None => {
                self.audit(AuditAction::DeleteByNumberDeniedNotFound, denied()).await;
                Err(DirectoryError::NotFound(LookupField::Number))
            }
        }
    }

    /// Check `subject` holds `required` for `operation`; `Forbidden` is audited.
    ///
    /// Every public operation calls this first. It is exposed so transports can
    /// run the gate before rejecting malformed requests.
    pub async fn authorize(
        &self,
        subject: &str,
        required: Capability,
        operation: &str,
    ) -> Result<(), DirectoryError> {
        match authorize(&self.credentials, subject, required) {
            Ok(_) => Ok(()),
            Err(err @ AuthError::Forbidden(_)) => {
                self.audit(
                    AuditAction::AccessDenied,
                    format!("Attempt to {operation} without privileges by {subject}"),
                )
                .await;
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Audit a committed mutation, reverting it if the entry cannot be written.
    async fn audit_mutation(
        &self,
        action: AuditAction,
        details: String,
        revert: Revert,
    ) -> Result<(), DirectoryError> {
        let Err(audit_err) = self.audit.record(AuditEntry::new(action, details)).await else {
            return Ok(());
        };
        tracing::error!(error = %audit_err, %action, "audit write failed, reverting mutation");

        let reverted = match revert {
            Revert::Remove(id) => self.table.remove(&id).await.map(|_| ()),
            Revert::Reinsert(record) => self.table.insert(record).await.map(|_| ()),
        };
        if let Err(e) = reverted {
            tracing::error!(error = %e, %action, "revert of unaudited mutation failed");
        }
        Err(DirectoryError::Internal(format!("audit write failed: {audit_err}")))
    }

    async fn audit(&self, action: AuditAction, details: String) {
        if let Err(e) = self.audit.record(AuditEntry::new(action, details)).await {
            tracing::warn!(error = %e, %action, "audit write failed");
        }
    }
}

impl core::fmt::Debug for DirectoryService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DirectoryService")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
