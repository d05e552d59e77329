//! Version store trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RosterResult;
use crate::types::{NewVersionEntry, VersionEntry};

/// Append-only storage for version entries.
///
/// The append-only invariant is enforced structurally: this trait exposes no
/// update or delete operation, so nothing built on top of it can alter an
/// entry once written. Total order over a record's entries is
/// (timestamp, sequence), both assigned by the recorder before the append.
#[async_trait]
pub trait VersionStore: Send + Sync {
    /// Persist one entry, assigning its id. Exactly one new entry exists
    /// after a successful call; a failure leaves the store untouched.
    async fn append(&self, entry: NewVersionEntry) -> RosterResult<VersionEntry>;

    /// Entries for a record, newest first (timestamp desc, sequence desc),
    /// with the total entry count for the record.
    async fn query_by_record(
        &self,
        record_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> RosterResult<(Vec<VersionEntry>, u64)>;

    /// Fetch one entry, scoped to the record it belongs to. An entry id that
    /// exists under a different record is `None` here.
    async fn get_by_id(
        &self,
        record_id: Uuid,
        version_id: Uuid,
    ) -> RosterResult<Option<VersionEntry>>;

    /// The (timestamp millis, sequence) of the most recent entry across all
    /// records, used to resume the recorder's monotonic clock on restart.
    async fn latest_cursor(&self) -> RosterResult<Option<(i64, u64)>>;

    /// Total entries in the store.
    async fn count_all(&self) -> RosterResult<u64>;
}
