//! Version recorder.
//!
//! Wraps every record mutation: validates the operation/snapshot pair,
//! computes the field-level diff, stamps the entry with a strictly
//! increasing (timestamp, sequence) pair, and appends it through the
//! version store. One call, one new immutable entry.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::diff::diff_snapshots;
use crate::error::{RosterError, RosterResult};
use crate::traits::VersionStore;
use crate::types::{NewVersionEntry, Operation, Snapshot, VersionEntry};

/// Monotonic stamp source for version entries.
///
/// Wall-clock milliseconds, clamped so they never move backwards, plus a
/// global sequence counter. Two entries can share a millisecond; they can
/// never share a (timestamp, sequence) pair, so total order is always
/// well defined.
#[derive(Debug)]
struct LogicalClock {
    last_millis: i64,
    sequence: u64,
}

impl LogicalClock {
    fn new(last_millis: i64, sequence: u64) -> Self {
        Self {
            last_millis,
            sequence,
        }
    }

    fn tick(&mut self) -> (DateTime<Utc>, u64) {
        let now = Utc::now().timestamp_millis();
        if now > self.last_millis {
            self.last_millis = now;
        }
        self.sequence += 1;
        let stamp = DateTime::from_timestamp_millis(self.last_millis)
            .unwrap_or_else(Utc::now);
        (stamp, self.sequence)
    }
}

/// Records one version entry per record mutation.
pub struct VersionRecorder {
    versions: Arc<dyn VersionStore>,
    clock: Mutex<LogicalClock>,
}

impl VersionRecorder {
    /// Create a recorder over an empty or fresh store.
    pub fn new(versions: Arc<dyn VersionStore>) -> Self {
        Self {
            versions,
            clock: Mutex::new(LogicalClock::new(0, 0)),
        }
    }

    /// Create a recorder resuming the clock from the store's newest entry,
    /// so ordering stays monotonic across restarts.
    pub async fn resume(versions: Arc<dyn VersionStore>) -> RosterResult<Self> {
        let (last_millis, sequence) = versions.latest_cursor().await?.unwrap_or((0, 0));
        Ok(Self {
            versions,
            clock: Mutex::new(LogicalClock::new(last_millis, sequence)),
        })
    }

    /// Record one mutation as an immutable version entry.
    ///
    /// Snapshot pair rules: CREATE must have no `before`, DELETE must have
    /// no `after`, UPDATE must have both. Changes are computed only for
    /// UPDATE; for CREATE and DELETE the operation tag alone conveys what
    /// happened. Store failures propagate unchanged so the caller reports
    /// the whole mutation as failed; an unaudited write must never look
    /// like success.
    pub async fn record(
        &self,
        operation: Operation,
        record_id: Uuid,
        before: Option<&Snapshot>,
        after: Option<&Snapshot>,
        changed_by: &str,
        change_reason: Option<&str>,
    ) -> RosterResult<VersionEntry> {
        check_snapshot_pair(operation, before, after)?;

        let changes = match operation {
            Operation::Update => diff_snapshots(before, after),
            Operation::Create | Operation::Delete => Vec::new(),
        };

        let (timestamp, sequence) = {
            let mut clock = self.clock.lock().unwrap();
            clock.tick()
        };

        let entry = self
            .versions
            .append(NewVersionEntry {
                record_id,
                operation,
                changes,
                changed_by: changed_by.to_string(),
                change_reason: change_reason.map(|s| s.to_string()),
                timestamp,
                sequence,
            })
            .await?;

        debug!(
            record_id = %record_id,
            operation = %operation,
            changes = entry.changes.len(),
            sequence = entry.sequence,
            "Recorded version entry"
        );

        Ok(entry)
    }
}

fn check_snapshot_pair(
    operation: Operation,
    before: Option<&Snapshot>,
    after: Option<&Snapshot>,
) -> RosterResult<()> {
    match operation {
        Operation::Create if before.is_some() => Err(RosterError::inconsistent_pair(
            "CREATE must not carry a prior snapshot",
        )),
        Operation::Delete if after.is_some() => Err(RosterError::inconsistent_pair(
            "DELETE must not carry a new snapshot",
        )),
        Operation::Update if before.is_none() || after.is_none() => {
            Err(RosterError::inconsistent_pair(
                "UPDATE requires both a prior and a new snapshot",
            ))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteVersionStore;
    use async_trait::async_trait;

    fn snap(value: serde_json::Value) -> Snapshot {
        Snapshot::from_json(&value).unwrap()
    }

    fn recorder() -> VersionRecorder {
        VersionRecorder::new(Arc::new(SqliteVersionStore::in_memory().unwrap()))
    }

    #[tokio::test]
    async fn test_create_yields_empty_changes() {
        let recorder = recorder();
        let after = snap(serde_json::json!({"fullName": "Alice", "salary": 50000}));

        let entry = recorder
            .record(Operation::Create, Uuid::new_v4(), None, Some(&after), "admin", None)
            .await
            .unwrap();

        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.changes.is_empty());
        assert_eq!(entry.changed_by, "admin");
    }

    #[tokio::test]
    async fn test_delete_yields_empty_changes() {
        let recorder = recorder();
        let before = snap(serde_json::json!({"fullName": "Alice", "salary": 50000}));

        let entry = recorder
            .record(Operation::Delete, Uuid::new_v4(), Some(&before), None, "admin", None)
            .await
            .unwrap();

        assert_eq!(entry.operation, Operation::Delete);
        assert!(entry.changes.is_empty());
    }

    #[tokio::test]
    async fn test_update_records_diff() {
        let recorder = recorder();
        let before = snap(serde_json::json!({"department": "IT", "salary": 50000}));
        let after = snap(serde_json::json!({"department": "Finance", "salary": 55000}));

        let entry = recorder
            .record(
                Operation::Update,
                Uuid::new_v4(),
                Some(&before),
                Some(&after),
                "admin",
                Some("Transfer"),
            )
            .await
            .unwrap();

        assert_eq!(entry.changes.len(), 2);
        assert_eq!(entry.changes[0].field, "department");
        assert_eq!(entry.changes[1].field, "salary");
        assert_eq!(entry.change_reason.as_deref(), Some("Transfer"));
    }

    #[tokio::test]
    async fn test_rejects_inconsistent_pairs() {
        let recorder = recorder();
        let s = snap(serde_json::json!({"fullName": "Alice"}));
        let id = Uuid::new_v4();

        let err = recorder
            .record(Operation::Create, id, Some(&s), Some(&s), "admin", None)
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::InconsistentSnapshotPair { .. }));

        let err = recorder
            .record(Operation::Delete, id, Some(&s), Some(&s), "admin", None)
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::InconsistentSnapshotPair { .. }));

        let err = recorder
            .record(Operation::Update, id, Some(&s), None, "admin", None)
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::InconsistentSnapshotPair { .. }));

        let err = recorder
            .record(Operation::Update, id, None, Some(&s), "admin", None)
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::InconsistentSnapshotPair { .. }));
    }

    #[tokio::test]
    async fn test_stamps_strictly_increase() {
        let recorder = recorder();
        let id = Uuid::new_v4();
        let before = snap(serde_json::json!({"salary": 1}));

        let mut last: Option<(i64, u64)> = None;
        for i in 0..50u32 {
            let after = snap(serde_json::json!({ "salary": i + 2 }));
            let entry = recorder
                .record(Operation::Update, id, Some(&before), Some(&after), "admin", None)
                .await
                .unwrap();
            let stamp = (entry.timestamp.timestamp_millis(), entry.sequence);
            if let Some(last) = last {
                assert!(stamp > last, "stamp {stamp:?} not after {last:?}");
            }
            last = Some(stamp);
        }
    }

    #[tokio::test]
    async fn test_resume_continues_after_existing_entries() {
        let store = Arc::new(SqliteVersionStore::in_memory().unwrap());
        let first = VersionRecorder::new(store.clone());
        let id = Uuid::new_v4();

        let entry = first
            .record(Operation::Create, id, None, Some(&snap(serde_json::json!({}))), "a", None)
            .await
            .unwrap();

        let resumed = VersionRecorder::resume(store.clone()).await.unwrap();
        let next = resumed
            .record(Operation::Delete, id, Some(&snap(serde_json::json!({}))), None, "a", None)
            .await
            .unwrap();

        assert!(
            (next.timestamp.timestamp_millis(), next.sequence)
                > (entry.timestamp.timestamp_millis(), entry.sequence)
        );
    }

    /// A store whose append always fails, to check propagation.
    struct FailingStore;

    #[async_trait]
    impl VersionStore for FailingStore {
        async fn append(&self, _entry: NewVersionEntry) -> RosterResult<VersionEntry> {
            Err(RosterError::database("disk full"))
        }

        async fn query_by_record(
            &self,
            _record_id: Uuid,
            _offset: u64,
            _limit: u64,
        ) -> RosterResult<(Vec<VersionEntry>, u64)> {
            Ok((Vec::new(), 0))
        }

        async fn get_by_id(
            &self,
            _record_id: Uuid,
            _version_id: Uuid,
        ) -> RosterResult<Option<VersionEntry>> {
            Ok(None)
        }

        async fn latest_cursor(&self) -> RosterResult<Option<(i64, u64)>> {
            Ok(None)
        }

        async fn count_all(&self) -> RosterResult<u64> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_append_failure_propagates() {
        let recorder = VersionRecorder::new(Arc::new(FailingStore));
        let err = recorder
            .record(
                Operation::Create,
                Uuid::new_v4(),
                None,
                Some(&snap(serde_json::json!({"fullName": "Alice"}))),
                "admin",
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::Database { .. }));
    }
}
