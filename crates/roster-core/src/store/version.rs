//! SQLite-backed version store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

use crate::error::{RosterError, RosterResult};
use crate::traits::VersionStore;
use crate::types::{FieldChange, NewVersionEntry, Operation, VersionEntry};

/// SQLite-backed append-only version store.
///
/// The schema intentionally has no UPDATE or DELETE path in this module;
/// entries are written once and only ever read back. Timestamps are stored
/// as integer milliseconds so ordering in SQL matches ordering by instant.
pub struct SqliteVersionStore {
    conn: Mutex<Connection>,
}

impl SqliteVersionStore {
    /// Create a new store at the given path.
    pub fn new(path: impl AsRef<Path>) -> RosterResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> RosterResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> RosterResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS employee_versions (
                id            TEXT PRIMARY KEY,
                record_id     TEXT NOT NULL,
                operation     TEXT NOT NULL,
                changes       TEXT NOT NULL,
                changed_by    TEXT NOT NULL,
                change_reason TEXT,
                timestamp     INTEGER NOT NULL,
                sequence      INTEGER NOT NULL
            );

            -- Index for newest-first history listing
            CREATE INDEX IF NOT EXISTS idx_versions_record_order
                ON employee_versions(record_id, timestamp DESC, sequence DESC);
        "#,
        )?;
        Ok(())
    }

    fn row_to_entry(row: &rusqlite::Row<'_>) -> RosterResult<VersionEntry> {
        let id: String = row.get(0)?;
        let record_id: String = row.get(1)?;
        let operation: String = row.get(2)?;
        let changes: String = row.get(3)?;
        let changed_by: String = row.get(4)?;
        let change_reason: Option<String> = row.get(5)?;
        let timestamp: i64 = row.get(6)?;
        let sequence: i64 = row.get(7)?;

        let changes: Vec<FieldChange> = serde_json::from_str(&changes)?;

        Ok(VersionEntry {
            id: Uuid::parse_str(&id).map_err(|e| RosterError::parse(e.to_string()))?,
            record_id: Uuid::parse_str(&record_id)
                .map_err(|e| RosterError::parse(e.to_string()))?,
            operation: Operation::parse(&operation)
                .map_err(|_| RosterError::parse(format!("unknown operation '{}'", operation)))?,
            changes,
            changed_by,
            change_reason,
            timestamp: millis_to_datetime(timestamp)?,
            sequence: sequence as u64,
        })
    }
}

fn millis_to_datetime(millis: i64) -> RosterResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| RosterError::parse(format!("timestamp out of range: {}", millis)))
}

const SELECT_COLUMNS: &str =
    "id, record_id, operation, changes, changed_by, change_reason, timestamp, sequence";

#[async_trait]
impl VersionStore for SqliteVersionStore {
    async fn append(&self, entry: NewVersionEntry) -> RosterResult<VersionEntry> {
        let conn = self.conn.lock().unwrap();
        let id = Uuid::new_v4();
        let changes = serde_json::to_string(&entry.changes)?;

        conn.execute(
            r#"INSERT INTO employee_versions
               (id, record_id, operation, changes, changed_by, change_reason, timestamp, sequence)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
            params![
                id.to_string(),
                entry.record_id.to_string(),
                entry.operation.as_str(),
                changes,
                entry.changed_by,
                entry.change_reason,
                entry.timestamp.timestamp_millis(),
                entry.sequence as i64,
            ],
        )?;

        Ok(entry.with_id(id))
    }

    async fn query_by_record(
        &self,
        record_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> RosterResult<(Vec<VersionEntry>, u64)> {
        let conn = self.conn.lock().unwrap();

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM employee_versions WHERE record_id = ?1",
            params![record_id.to_string()],
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
            r#"SELECT {SELECT_COLUMNS}
               FROM employee_versions
               WHERE record_id = ?1
               ORDER BY timestamp DESC, sequence DESC
               LIMIT ?2 OFFSET ?3"#
        ))?;

        let results = stmt.query_map(
            params![record_id.to_string(), limit as i64, offset as i64],
            |row| Ok(Self::row_to_entry(row)),
        )?;

        let entries = results
            .map(|r| r.map_err(RosterError::from).and_then(|inner| inner))
            .collect::<RosterResult<Vec<_>>>()?;

        Ok((entries, total as u64))
    }

    async fn get_by_id(
        &self,
        record_id: Uuid,
        version_id: Uuid,
    ) -> RosterResult<Option<VersionEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            r#"SELECT {SELECT_COLUMNS}
               FROM employee_versions
               WHERE record_id = ?1 AND id = ?2"#
        ))?;

        stmt.query_row(
            params![record_id.to_string(), version_id.to_string()],
            |row| Ok(Self::row_to_entry(row)),
        )
        .optional()?
        .transpose()
    }

    async fn latest_cursor(&self) -> RosterResult<Option<(i64, u64)>> {
        let conn = self.conn.lock().unwrap();
        let cursor = conn
            .query_row(
                r#"SELECT timestamp, sequence FROM employee_versions
                   ORDER BY timestamp DESC, sequence DESC
                   LIMIT 1"#,
                [],
                |row| {
                    let millis: i64 = row.get(0)?;
                    let sequence: i64 = row.get(1)?;
                    Ok((millis, sequence as u64))
                },
            )
            .optional()?;
        Ok(cursor)
    }

    async fn count_all(&self) -> RosterResult<u64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM employee_versions", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(record_id: Uuid, millis: i64, sequence: u64, operation: Operation) -> NewVersionEntry {
        NewVersionEntry {
            record_id,
            operation,
            changes: Vec::new(),
            changed_by: "admin".to_string(),
            change_reason: None,
            timestamp: millis_to_datetime(millis).unwrap(),
            sequence,
        }
    }

    #[tokio::test]
    async fn test_append_assigns_id() {
        let store = SqliteVersionStore::in_memory().unwrap();
        let record_id = Uuid::new_v4();

        let stored = store
            .append(entry(record_id, 1_000, 1, Operation::Create))
            .await
            .unwrap();
        assert_eq!(stored.record_id, record_id);

        let fetched = store.get_by_id(record_id, stored.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, stored.id);
        assert_eq!(fetched.operation, Operation::Create);
        assert_eq!(fetched.sequence, 1);
    }

    #[tokio::test]
    async fn test_query_newest_first_with_offset() {
        let store = SqliteVersionStore::in_memory().unwrap();
        let record_id = Uuid::new_v4();

        for (millis, seq) in [(1_000, 1), (2_000, 2), (2_000, 3), (3_000, 4)] {
            store
                .append(entry(record_id, millis, seq, Operation::Update))
                .await
                .unwrap();
        }

        let (entries, total) = store.query_by_record(record_id, 0, 10).await.unwrap();
        assert_eq!(total, 4);
        let order: Vec<u64> = entries.iter().map(|e| e.sequence).collect();
        assert_eq!(order, vec![4, 3, 2, 1]);

        let (page2, total) = store.query_by_record(record_id, 2, 2).await.unwrap();
        assert_eq!(total, 4);
        assert_eq!(page2.len(), 2);
        assert_eq!(page2[0].sequence, 2);

        // Offset past the end: empty page, correct total.
        let (beyond, total) = store.query_by_record(record_id, 10, 2).await.unwrap();
        assert!(beyond.is_empty());
        assert_eq!(total, 4);
    }

    #[tokio::test]
    async fn test_get_by_id_scoped_to_record() {
        let store = SqliteVersionStore::in_memory().unwrap();
        let record_a = Uuid::new_v4();
        let record_b = Uuid::new_v4();

        let stored = store
            .append(entry(record_a, 1_000, 1, Operation::Create))
            .await
            .unwrap();

        assert!(store.get_by_id(record_a, stored.id).await.unwrap().is_some());
        assert!(store.get_by_id(record_b, stored.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_latest_cursor() {
        let store = SqliteVersionStore::in_memory().unwrap();
        assert!(store.latest_cursor().await.unwrap().is_none());

        let record_id = Uuid::new_v4();
        store
            .append(entry(record_id, 5_000, 7, Operation::Create))
            .await
            .unwrap();
        store
            .append(entry(record_id, 5_000, 8, Operation::Update))
            .await
            .unwrap();

        assert_eq!(store.latest_cursor().await.unwrap(), Some((5_000, 8)));
    }

    #[tokio::test]
    async fn test_changes_round_trip() {
        let store = SqliteVersionStore::in_memory().unwrap();
        let record_id = Uuid::new_v4();

        let mut e = entry(record_id, 1_000, 1, Operation::Update);
        e.changes = vec![FieldChange::new(
            "salary",
            Some(50000.0.into()),
            Some(55000.0.into()),
        )];
        e.change_reason = Some("Annual revision".to_string());

        let stored = store.append(e).await.unwrap();
        let fetched = store.get_by_id(record_id, stored.id).await.unwrap().unwrap();

        assert_eq!(fetched.changes.len(), 1);
        assert_eq!(fetched.changes[0].field, "salary");
        assert_eq!(fetched.change_reason.as_deref(), Some("Annual revision"));
    }
}
