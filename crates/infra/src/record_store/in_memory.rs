use std::sync::RwLock;

use async_trait::async_trait;

use phonebook_core::RecordId;
use phonebook_directory::{DirectoryRecord, FullName, PhoneNumber, RecordKey};

use super::{RecordTable, StoreError};

/// In-memory record table.
///
/// Intended for tests/dev. Records live in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryRecordTable {
    records: RwLock<Vec<DirectoryRecord>>,
}

impl InMemoryRecordTable {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

#[async_trait]
impl RecordTable for InMemoryRecordTable {
    async fn list(&self) -> Result<Vec<DirectoryRecord>, StoreError> {
        Ok(self.records.read().map_err(poisoned)?.clone())
    }

    async fn contains(&self, full_name: &FullName, phone_number: &PhoneNumber) -> Result<bool, StoreError> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .iter()
            .any(|r| &r.full_name == full_name && &r.phone_number == phone_number))
    }

    async fn insert(&self, record: DirectoryRecord) -> Result<DirectoryRecord, StoreError> {
        let mut records = self.records.write().map_err(poisoned)?;
        if records
            .iter()
            .any(|r| r.full_name == record.full_name && r.phone_number == record.phone_number)
        {
            return Err(StoreError::Duplicate);
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn delete_first(&self, key: &RecordKey) -> Result<Option<DirectoryRecord>, StoreError> {
        let mut records = self.records.write().map_err(poisoned)?;
        Ok(records
            .iter()
            .position(|r| r.matches(key))
            .map(|idx| records.remove(idx)))
    }

    async fn remove(&self, id: &RecordId) -> Result<Option<DirectoryRecord>, StoreError> {
        let mut records = self.records.write().map_err(poisoned)?;
        Ok(records
            .iter()
            .position(|r| r.id == *id)
            .map(|idx| records.remove(idx)))
    }
}
