//! SQLite-backed record table.
//!
//! Uniqueness of the (full_name, phone_number) pair is a table constraint, so
//! two concurrent inserts of the same pair cannot both succeed. "First match"
//! on delete is the lowest `seq`, i.e. the oldest row.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use phonebook_core::RecordId;
use phonebook_directory::{DirectoryRecord, FullName, PhoneNumber, RecordKey};

use super::{RecordTable, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS phonebook (
    seq          INTEGER PRIMARY KEY AUTOINCREMENT,
    id           TEXT NOT NULL UNIQUE,
    full_name    TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    UNIQUE (full_name, phone_number)
)
"#;

#[derive(Debug, Clone)]
pub struct SqliteRecordTable {
    pool: SqlitePool,
}

impl SqliteRecordTable {
    /// Open (creating if needed) the database at `url` and ensure the schema exists.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(backend)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(backend)?;
        Self::with_pool(pool).await
    }

    /// Private in-memory database (tests/dev).
    ///
    /// A single connection that never idles out, since every SQLite memory
    /// connection is its own database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<std::time::Duration>)
            .max_lifetime(None::<std::time::Duration>)
            .connect("sqlite::memory:")
            .await
            .map_err(backend)?;
        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(SCHEMA).execute(&pool).await.map_err(backend)?;
        Ok(Self { pool })
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn decode(row: &SqliteRow) -> Result<DirectoryRecord, StoreError> {
    let id: String = row.try_get("id").map_err(backend)?;
    let full_name: String = row.try_get("full_name").map_err(backend)?;
    let phone_number: String = row.try_get("phone_number").map_err(backend)?;

    // Rows are re-validated on the way out; anything else is a corrupt table.
    Ok(DirectoryRecord {
        id: RecordId::from_str(&id).map_err(|e| StoreError::Backend(e.to_string()))?,
        full_name: FullName::parse(full_name).map_err(|e| StoreError::Backend(e.to_string()))?,
        phone_number: PhoneNumber::parse(phone_number).map_err(|e| StoreError::Backend(e.to_string()))?,
    })
}

#[async_trait]
impl RecordTable for SqliteRecordTable {
    async fn list(&self) -> Result<Vec<DirectoryRecord>, StoreError> {
        let rows = sqlx::query("SELECT id, full_name, phone_number FROM phonebook ORDER BY seq")
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        rows.iter().map(decode).collect()
    }

    async fn contains(&self, full_name: &FullName, phone_number: &PhoneNumber) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 FROM phonebook WHERE full_name = ? AND phone_number = ? LIMIT 1")
            .bind(full_name.as_str())
            .bind(phone_number.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        Ok(row.is_some())
    }

    async fn insert(&self, record: DirectoryRecord) -> Result<DirectoryRecord, StoreError> {
        let result = sqlx::query("INSERT INTO phonebook (id, full_name, phone_number) VALUES (?, ?, ?)")
            .bind(record.id.to_string())
            .bind(record.full_name.as_str())
            .bind(record.phone_number.as_str())
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(record),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(StoreError::Duplicate),
            Err(e) => Err(backend(e)),
        }
    }

    async fn delete_first(&self, key: &RecordKey) -> Result<Option<DirectoryRecord>, StoreError> {
        let (column, value) = match key {
            RecordKey::Name(name) => ("full_name", name.as_str()),
            RecordKey::Number(number) => ("phone_number", number.as_str()),
        };
        let sql = format!(
            "DELETE FROM phonebook \
             WHERE seq = (SELECT seq FROM phonebook WHERE {column} = ? ORDER BY seq LIMIT 1) \
             RETURNING id, full_name, phone_number"
        );

        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.as_ref().map(decode).transpose()
    }

    async fn remove(&self, id: &RecordId) -> Result<Option<DirectoryRecord>, StoreError> {
        let row = sqlx::query("DELETE FROM phonebook WHERE id = ? RETURNING id, full_name, phone_number")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.as_ref().map(decode).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, phone: &str) -> DirectoryRecord {
        DirectoryRecord::new(FullName::parse(name).unwrap(), PhoneNumber::parse(phone).unwrap())
    }

    #[tokio::test]
    async fn unique_constraint_maps_to_duplicate() {
        let table = SqliteRecordTable::in_memory().await.unwrap();
        table.insert(record("Jane Doe", "123-4567")).await.unwrap();

        let err = table.insert(record("Jane Doe", "123-4567")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
        assert!(table
            .contains(&FullName::parse("Jane Doe").unwrap(), &PhoneNumber::parse("123-4567").unwrap())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let table = SqliteRecordTable::in_memory().await.unwrap();
        let a = table.insert(record("Zed Last", "999-9999")).await.unwrap();
        let b = table.insert(record("Abe First", "111-1111")).await.unwrap();

        let ids: Vec<_> = table.list().await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn delete_first_by_number_removes_oldest_match() {
        let table = SqliteRecordTable::in_memory().await.unwrap();
        let first = table.insert(record("Jane Doe", "22.22.22.22")).await.unwrap();
        let second = table.insert(record("John Doe", "22.22.22.22")).await.unwrap();

        let key = RecordKey::Number(PhoneNumber::parse("22.22.22.22").unwrap());
        let removed = table.delete_first(&key).await.unwrap().unwrap();
        assert_eq!(removed, first);

        let remaining = table.list().await.unwrap();
        assert_eq!(remaining, vec![second]);

        table.delete_first(&key).await.unwrap().unwrap();
        assert!(table.delete_first(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_by_id_leaves_same_named_rows() {
        let table = SqliteRecordTable::in_memory().await.unwrap();
        let first = table.insert(record("Jane Doe", "111-1111")).await.unwrap();
        let second = table.insert(record("Jane Doe", "222-2222")).await.unwrap();

        assert_eq!(table.remove(&second.id).await.unwrap(), Some(second.clone()));
        assert_eq!(table.list().await.unwrap(), vec![first]);
        assert!(table.remove(&second.id).await.unwrap().is_none());
    }
}
