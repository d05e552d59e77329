//! Record store trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RosterResult;
use crate::types::{EmployeeFilter, EmployeeRecord, StatsOverview};

/// Storage for employee records.
///
/// The record store owns all mutation of employee documents; the history
/// engine only reads snapshots from it. Mutating operations return the prior
/// record so the version recorder can diff without a second read.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Get a record by id, including soft-deleted records (history pages for
    /// deleted employees still need the summary).
    async fn get(&self, id: Uuid) -> RosterResult<Option<EmployeeRecord>>;

    /// Look up a record by its business-facing employee code.
    async fn get_by_employee_id(&self, employee_id: &str)
        -> RosterResult<Option<EmployeeRecord>>;

    /// Insert a new record.
    async fn insert(&self, record: &EmployeeRecord) -> RosterResult<()>;

    /// Replace a record, returning the prior version.
    ///
    /// Fails with `NotFound` when the record is absent or soft-deleted.
    async fn update(&self, id: Uuid, record: &EmployeeRecord)
        -> RosterResult<EmployeeRecord>;

    /// Soft-delete a record, returning the version prior to deletion.
    ///
    /// Fails with `NotFound` when the record is absent or already deleted.
    async fn soft_delete(&self, id: Uuid) -> RosterResult<EmployeeRecord>;

    /// List non-deleted records matching the filter, with 1-indexed
    /// pagination. Returns the page of records and the total match count.
    async fn list(
        &self,
        filter: &EmployeeFilter,
        page: u32,
        page_size: u32,
    ) -> RosterResult<(Vec<EmployeeRecord>, u64)>;

    /// Aggregate counts over non-deleted records.
    async fn stats(&self) -> RosterResult<StatsOverview>;
}
