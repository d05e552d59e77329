//! History reader.
//!
//! Serves paginated, newest-first history for a record and point-in-time
//! comparison between two versions. Strictly read-only over both stores.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RosterError, RosterResult};
use crate::traits::{RecordStore, VersionStore};
use crate::types::{EmployeeSummary, VersionEntry};

/// Pagination block returned with every history page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-indexed page number, as requested.
    pub page: u32,
    /// Page size, as requested.
    pub limit: u32,
    /// Total entries across all pages.
    pub total: u64,
    /// `ceil(total / limit)`.
    pub total_pages: u64,
}

/// One page of history for an employee.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    pub employee: EmployeeSummary,
    /// Newest first: descending timestamp, ties broken by descending
    /// sequence. The UI timeline relies on this ordering.
    pub history: Vec<VersionEntry>,
    pub pagination: Pagination,
}

/// Two version entries side by side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionComparison {
    pub employee: EmployeeSummary,
    pub version1: VersionEntry,
    pub version2: VersionEntry,
}

/// Read-side of the history engine.
pub struct HistoryReader {
    records: Arc<dyn RecordStore>,
    versions: Arc<dyn VersionStore>,
}

impl HistoryReader {
    pub fn new(records: Arc<dyn RecordStore>, versions: Arc<dyn VersionStore>) -> Self {
        Self { records, versions }
    }

    /// List one page of history for a record, newest first.
    ///
    /// `page` is 1-indexed and `page_size` must be at least 1. A page past
    /// the end is not an error: it returns an empty entry list with the
    /// correct totals so the UI pager can recover.
    pub async fn list(
        &self,
        record_id: Uuid,
        page: u32,
        page_size: u32,
    ) -> RosterResult<HistoryPage> {
        if page == 0 {
            return Err(RosterError::validation("page is 1-indexed"));
        }
        if page_size == 0 {
            return Err(RosterError::validation("page size must be at least 1"));
        }

        let employee = self.summary(record_id).await?;

        let offset = (page as u64 - 1) * page_size as u64;
        let (history, total) = self
            .versions
            .query_by_record(record_id, offset, page_size as u64)
            .await?;

        Ok(HistoryPage {
            employee,
            history,
            pagination: Pagination {
                page,
                limit: page_size,
                total,
                total_pages: total.div_ceil(page_size as u64),
            },
        })
    }

    /// Fetch two versions of one record side by side.
    ///
    /// Fails with `VersionNotFound` when either id does not belong to the
    /// record, including ids that exist under a different record.
    pub async fn compare(
        &self,
        record_id: Uuid,
        version_id_1: Uuid,
        version_id_2: Uuid,
    ) -> RosterResult<VersionComparison> {
        let employee = self.summary(record_id).await?;

        let version1 = self
            .versions
            .get_by_id(record_id, version_id_1)
            .await?
            .ok_or_else(|| RosterError::version_not_found(version_id_1.to_string()))?;
        let version2 = self
            .versions
            .get_by_id(record_id, version_id_2)
            .await?
            .ok_or_else(|| RosterError::version_not_found(version_id_2.to_string()))?;

        Ok(VersionComparison {
            employee,
            version1,
            version2,
        })
    }

    async fn summary(&self, record_id: Uuid) -> RosterResult<EmployeeSummary> {
        // Soft-deleted employees still serve history.
        let record = self
            .records
            .get(record_id)
            .await?
            .ok_or_else(|| RosterError::not_found(record_id.to_string()))?;
        Ok(record.summary())
    }
}
