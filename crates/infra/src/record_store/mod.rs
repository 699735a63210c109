//! Record table abstraction (the directory's only shared mutable state).

pub mod in_memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use phonebook_core::RecordId;
use phonebook_directory::{DirectoryRecord, FullName, PhoneNumber, RecordKey};

pub use in_memory::InMemoryRecordTable;
pub use sqlite::SqliteRecordTable;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The (full_name, phone_number) pair is already present.
    #[error("record already exists")]
    Duplicate,

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Table of directory records.
///
/// ## Implementation Requirements
///
/// Implementations must:
/// - enforce uniqueness of the (full_name, phone_number) pair on `insert`,
///   independent of any `contains` check the caller made earlier
/// - make `delete_first` a single atomic lookup-then-delete
/// - resolve "first" as insertion order (oldest record wins)
/// - return `list` in insertion order
#[async_trait]
pub trait RecordTable: Send + Sync {
    async fn list(&self) -> Result<Vec<DirectoryRecord>, StoreError>;

    async fn contains(&self, full_name: &FullName, phone_number: &PhoneNumber) -> Result<bool, StoreError>;

    async fn insert(&self, record: DirectoryRecord) -> Result<DirectoryRecord, StoreError>;

    /// Remove and return the oldest record matching `key`, if any.
    async fn delete_first(&self, key: &RecordKey) -> Result<Option<DirectoryRecord>, StoreError>;

    /// Remove the record with exactly this id, if still present.
    async fn remove(&self, id: &RecordId) -> Result<Option<DirectoryRecord>, StoreError>;
}

#[async_trait]
impl<T> RecordTable for Arc<T>
where
    T: RecordTable + ?Sized,
{
    async fn list(&self) -> Result<Vec<DirectoryRecord>, StoreError> {
        (**self).list().await
    }

    async fn contains(&self, full_name: &FullName, phone_number: &PhoneNumber) -> Result<bool, StoreError> {
        (**self).contains(full_name, phone_number).await
    }

    async fn insert(&self, record: DirectoryRecord) -> Result<DirectoryRecord, StoreError> {
        (**self).insert(record).await
    }

    async fn delete_first(&self, key: &RecordKey) -> Result<Option<DirectoryRecord>, StoreError> {
        (**self).delete_first(key).await
    }

    async fn remove(&self, id: &RecordId) -> Result<Option<DirectoryRecord>, StoreError> {
        (**self).remove(id).await
    }
}
