//! Employee service - the orchestrator tying records to their history.
//!
//! Every mutation goes through here: the record store applies the write and
//! hands back the prior record, the recorder appends the matching version
//! entry in the same call. A failed append fails the whole request, so no
//! mutation is ever left unaudited.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;
use uuid::Uuid;

use crate::error::{RosterError, RosterResult};
use crate::history::{HistoryPage, HistoryReader, VersionComparison, VersionRecorder};
use crate::traits::{RecordStore, VersionStore};
use crate::types::{
    EmployeeFilter, EmployeeRecord, EmployeeUpdate, NewEmployee, Operation, StatsOverview,
};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Actor recorded when a mutation carries no explicit `changed_by`.
pub const DEFAULT_ACTOR: &str = "system";

/// Main entry point for employee CRUD with change history.
pub struct EmployeeService {
    records: Arc<dyn RecordStore>,
    recorder: VersionRecorder,
    reader: HistoryReader,
}

impl EmployeeService {
    /// Create a service over the given stores, resuming the recorder's
    /// clock from the newest persisted entry.
    pub async fn new(
        records: Arc<dyn RecordStore>,
        versions: Arc<dyn VersionStore>,
    ) -> RosterResult<Self> {
        let recorder = VersionRecorder::resume(versions.clone()).await?;
        let reader = HistoryReader::new(records.clone(), versions);
        Ok(Self {
            records,
            recorder,
            reader,
        })
    }

    /// Create an employee and record the CREATE version entry.
    pub async fn create(
        &self,
        input: NewEmployee,
        changed_by: &str,
        change_reason: Option<&str>,
    ) -> RosterResult<EmployeeRecord> {
        validate_new(&input)?;

        if let Some(existing) = self.records.get_by_employee_id(&input.employee_id).await? {
            return Err(RosterError::validation_with_suggestion(
                format!("Employee code '{}' is already in use", existing.employee_id),
                "Employee codes must be unique",
            ));
        }

        let record = EmployeeRecord::new(input);
        self.records.insert(&record).await?;

        self.recorder
            .record(
                Operation::Create,
                record.id,
                None,
                Some(&record.snapshot()),
                changed_by,
                change_reason,
            )
            .await?;

        info!(id = %record.id, employee_id = %record.employee_id, "Employee created");
        Ok(record)
    }

    /// Get an employee by id. Soft-deleted employees are not served here.
    pub async fn get(&self, id: Uuid) -> RosterResult<EmployeeRecord> {
        self.records
            .get(id)
            .await?
            .filter(|r| !r.is_deleted)
            .ok_or_else(|| RosterError::not_found(id.to_string()))
    }

    /// Apply a partial update and record the UPDATE version entry with the
    /// field-level diff against the prior version.
    pub async fn update(
        &self,
        id: Uuid,
        patch: EmployeeUpdate,
        changed_by: &str,
        change_reason: Option<&str>,
    ) -> RosterResult<EmployeeRecord> {
        let mut record = self.get(id).await?;
        record.apply(patch);
        validate_record(&record)?;

        // The store returns the prior version, so the recorder can diff
        // without a second read.
        let prior = self.records.update(id, &record).await?;

        self.recorder
            .record(
                Operation::Update,
                id,
                Some(&prior.snapshot()),
                Some(&record.snapshot()),
                changed_by,
                change_reason,
            )
            .await?;

        info!(id = %id, "Employee updated");
        Ok(record)
    }

    /// Soft-delete an employee and record the DELETE version entry.
    pub async fn delete(
        &self,
        id: Uuid,
        changed_by: &str,
        change_reason: Option<&str>,
    ) -> RosterResult<()> {
        let prior = self.records.soft_delete(id).await?;

        self.recorder
            .record(
                Operation::Delete,
                id,
                Some(&prior.snapshot()),
                None,
                changed_by,
                change_reason,
            )
            .await?;

        info!(id = %id, "Employee deleted");
        Ok(())
    }

    /// List non-deleted employees with filters and pagination.
    pub async fn list(
        &self,
        filter: &EmployeeFilter,
        page: u32,
        page_size: u32,
    ) -> RosterResult<(Vec<EmployeeRecord>, u64)> {
        if page == 0 || page_size == 0 {
            return Err(RosterError::validation(
                "page is 1-indexed and page size must be at least 1",
            ));
        }
        self.records.list(filter, page, page_size).await
    }

    /// Aggregate counts for the dashboard.
    pub async fn stats(&self) -> RosterResult<StatsOverview> {
        self.records.stats().await
    }

    /// One page of change history for an employee, newest first.
    pub async fn history(
        &self,
        id: Uuid,
        page: u32,
        page_size: u32,
    ) -> RosterResult<HistoryPage> {
        self.reader.list(id, page, page_size).await
    }

    /// Two versions of an employee side by side.
    pub async fn compare(
        &self,
        id: Uuid,
        version_id_1: Uuid,
        version_id_2: Uuid,
    ) -> RosterResult<VersionComparison> {
        self.reader.compare(id, version_id_1, version_id_2).await
    }
}

fn validate_new(input: &NewEmployee) -> RosterResult<()> {
    if input.employee_id.trim().is_empty() {
        return Err(RosterError::missing_field("employeeId"));
    }
    if input.full_name.trim().is_empty() {
        return Err(RosterError::missing_field("fullName"));
    }
    validate_email(&input.email)?;
    validate_salary(input.salary)?;
    if input.department.trim().is_empty() {
        return Err(RosterError::missing_field("department"));
    }
    Ok(())
}

fn validate_record(record: &EmployeeRecord) -> RosterResult<()> {
    if record.employee_id.trim().is_empty() {
        return Err(RosterError::missing_field("employeeId"));
    }
    if record.full_name.trim().is_empty() {
        return Err(RosterError::missing_field("fullName"));
    }
    validate_email(&record.email)?;
    validate_salary(record.salary)?;
    if record.department.trim().is_empty() {
        return Err(RosterError::missing_field("department"));
    }
    Ok(())
}

fn validate_email(email: &str) -> RosterResult<()> {
    if !EMAIL_RE.is_match(email) {
        return Err(RosterError::validation_with_suggestion(
            format!("'{}' is not a valid email address", email),
            "Use the form name@example.com",
        ));
    }
    Ok(())
}

fn validate_salary(salary: f64) -> RosterResult<()> {
    if !salary.is_finite() || salary < 0.0 {
        return Err(RosterError::validation("Salary must be a non-negative number"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{SqliteRecordStore, SqliteVersionStore};

    async fn service_with_versions() -> (EmployeeService, Arc<SqliteVersionStore>) {
        let records = Arc::new(SqliteRecordStore::in_memory().unwrap());
        let versions = Arc::new(SqliteVersionStore::in_memory().unwrap());
        let service = EmployeeService::new(records, versions.clone()).await.unwrap();
        (service, versions)
    }

    fn alice() -> NewEmployee {
        NewEmployee {
            employee_id: "EMP-001".to_string(),
            full_name: "Alice Mokashi".to_string(),
            email: "alice@example.com".to_string(),
            phone: None,
            department: "IT".to_string(),
            designation: "Engineer".to_string(),
            salary: 50000.0,
            status: None,
            date_of_joining: "2023-06-01T00:00:00Z".parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn test_validation_failure_records_nothing() {
        let (service, versions) = service_with_versions().await;

        let mut bad = alice();
        bad.email = "not-an-email".to_string();
        assert!(service.create(bad, "admin", None).await.is_err());

        let mut bad = alice();
        bad.salary = -1.0;
        assert!(service.create(bad, "admin", None).await.is_err());

        let mut bad = alice();
        bad.full_name = "  ".to_string();
        assert!(service.create(bad, "admin", None).await.is_err());

        assert_eq!(versions.count_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_employee_code_rejected() {
        let (service, versions) = service_with_versions().await;
        service.create(alice(), "admin", None).await.unwrap();

        let err = service.create(alice(), "admin", None).await.unwrap_err();
        assert!(matches!(err, RosterError::Validation { .. }));
        // Only the first create was audited.
        assert_eq!(versions.count_all().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_hides_soft_deleted() {
        let (service, _) = service_with_versions().await;
        let record = service.create(alice(), "admin", None).await.unwrap();

        service.delete(record.id, "admin", None).await.unwrap();

        let err = service.get(record.id).await.unwrap_err();
        assert!(matches!(err, RosterError::NotFound { .. }));

        // History is still served for the deleted employee.
        let page = service.history(record.id, 1, 10).await.unwrap();
        assert_eq!(page.pagination.total, 2);
    }
}
