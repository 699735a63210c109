//! Append-only audit trail of directory operations.
//!
//! This is separate from `tracing`: every list, mutation and denial produces
//! exactly one entry here, whatever the log filter says.

pub mod file;
pub mod in_memory;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

pub use file::FileAuditLog;
pub use in_memory::InMemoryAuditLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditAction {
    List,
    Add,
    Delete,
    AccessDenied,
    AddDeniedInvalidName,
    AddDeniedInvalidPhone,
    AddDeniedDuplicate,
    DeleteByNameDeniedInvalidName,
    DeleteByNameDeniedNotFound,
    DeleteByNumberDeniedInvalidPhone,
    DeleteByNumberDeniedNotFound,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::List => "LIST",
            AuditAction::Add => "ADD",
            AuditAction::Delete => "DELETE",
            AuditAction::AccessDenied => "ACCESS_DENIED",
            AuditAction::AddDeniedInvalidName => "ADD_DENIED_INVALID_NAME",
            AuditAction::AddDeniedInvalidPhone => "ADD_DENIED_INVALID_PHONE",
            AuditAction::AddDeniedDuplicate => "ADD_DENIED_DUPLICATE",
            AuditAction::DeleteByNameDeniedInvalidName => "DELETE_BY_NAME_DENIED_INVALID_NAME",
            AuditAction::DeleteByNameDeniedNotFound => "DELETE_BY_NAME_DENIED_NOT_FOUND",
            AuditAction::DeleteByNumberDeniedInvalidPhone => "DELETE_BY_NUMBER_DENIED_INVALID_PHONE",
            AuditAction::DeleteByNumberDeniedNotFound => "DELETE_BY_NUMBER_DENIED_NOT_FOUND",
        }
    }
}

impl core::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub action: AuditAction,
    pub details: String,
}

impl AuditEntry {
    pub fn new(action: AuditAction, details: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            action,
            details: details.into(),
        }
    }

    /// `<timestamp> - <ACTION>: <details>` with a trailing newline.
    ///
    /// Line breaks inside `details` are escaped so one entry is always one line.
    pub fn to_line(&self) -> String {
        let details = self.details.replace('\r', "\\r").replace('\n', "\\n");
        format!(
            "{} - {}: {}\n",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            self.action,
            details
        )
    }
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: AuditEntry) -> Result<(), AuditError>;
}

#[async_trait]
impl<S> AuditSink for Arc<S>
where
    S: AuditSink + ?Sized,
{
    async fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        (**self).record(entry).await
    }
}
