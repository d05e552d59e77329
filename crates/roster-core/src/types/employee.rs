//! Employee record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::diff::TRACKED_FIELDS;
use crate::error::{RosterError, RosterResult};
use crate::types::snapshot::{FieldValue, Snapshot};

/// Employment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EmploymentStatus {
    #[default]
    Active,
    Inactive,
}

impl EmploymentStatus {
    /// Convert to string for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentStatus::Active => "Active",
            EmploymentStatus::Inactive => "Inactive",
        }
    }

    /// Parse from string.
    pub fn parse(s: &str) -> RosterResult<Self> {
        match s {
            "Active" => Ok(EmploymentStatus::Active),
            "Inactive" => Ok(EmploymentStatus::Inactive),
            other => Err(RosterError::validation_with_suggestion(
                format!("Unknown employment status '{}'", other),
                "Status must be 'Active' or 'Inactive'",
            )),
        }
    }
}

/// An employee record, the mutable entity the history engine observes.
///
/// The engine itself never mutates a record; it only reads snapshots. The
/// record store owns all writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    /// Internal identifier. Excluded from diffing.
    pub id: Uuid,
    /// Business-facing employee code (e.g. "EMP-0042").
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Open set of department names; no enum, new departments appear freely.
    pub department: String,
    pub designation: String,
    /// Non-negative.
    pub salary: f64,
    pub status: EmploymentStatus,
    pub date_of_joining: DateTime<Utc>,
    /// Soft-delete flag. Excluded from diffing; a DELETE entry documents it.
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmployeeRecord {
    /// Build a fresh record from validated input.
    pub fn new(input: NewEmployee) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            employee_id: input.employee_id,
            full_name: input.full_name,
            email: input.email,
            phone: input.phone,
            department: input.department,
            designation: input.designation,
            salary: input.salary,
            status: input.status.unwrap_or_default(),
            date_of_joining: input.date_of_joining,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update, refreshing the update timestamp.
    pub fn apply(&mut self, patch: EmployeeUpdate) {
        if let Some(employee_id) = patch.employee_id {
            self.employee_id = employee_id;
        }
        if let Some(full_name) = patch.full_name {
            self.full_name = full_name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            // An explicit empty string clears the phone number.
            self.phone = if phone.is_empty() { None } else { Some(phone) };
        }
        if let Some(department) = patch.department {
            self.department = department;
        }
        if let Some(designation) = patch.designation {
            self.designation = designation;
        }
        if let Some(salary) = patch.salary {
            self.salary = salary;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(date_of_joining) = patch.date_of_joining {
            self.date_of_joining = date_of_joining;
        }
        self.updated_at = Utc::now();
    }

    /// Capture the trackable fields as a snapshot for diffing.
    ///
    /// The internal id, timestamps, and the soft-delete flag are not part of
    /// the snapshot.
    pub fn snapshot(&self) -> Snapshot {
        let mut snap = Snapshot::new();
        for field in TRACKED_FIELDS {
            snap.set(field.name, self.field_value(field.name));
        }
        snap
    }

    fn field_value(&self, name: &str) -> Option<FieldValue> {
        match name {
            "employeeId" => Some(self.employee_id.as_str().into()),
            "fullName" => Some(self.full_name.as_str().into()),
            "email" => Some(self.email.as_str().into()),
            "phone" => self.phone.as_deref().map(Into::into),
            "department" => Some(self.department.as_str().into()),
            "designation" => Some(self.designation.as_str().into()),
            "salary" => Some(self.salary.into()),
            "status" => Some(self.status.as_str().into()),
            "dateOfJoining" => Some(self.date_of_joining.into()),
            _ => None,
        }
    }

    /// Short identification used in history listings.
    pub fn summary(&self) -> EmployeeSummary {
        EmployeeSummary {
            id: self.id,
            employee_id: self.employee_id.clone(),
            full_name: self.full_name.clone(),
        }
    }
}

/// Input for creating an employee.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub department: String,
    pub designation: String,
    pub salary: f64,
    #[serde(default)]
    pub status: Option<EmploymentStatus>,
    pub date_of_joining: DateTime<Utc>,
}

/// Partial update for an employee; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default)]
    pub status: Option<EmploymentStatus>,
    #[serde(default)]
    pub date_of_joining: Option<DateTime<Utc>>,
}

/// Short identification of an employee, served alongside history pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub id: Uuid,
    pub employee_id: String,
    pub full_name: String,
}

/// Filters for listing employees.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub department: Option<String>,
    pub status: Option<EmploymentStatus>,
    /// Matches against full name or employee code, case-insensitive.
    pub search: Option<String>,
}

/// Per-department employee count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentCount {
    pub department: String,
    pub count: u64,
}

/// Aggregate counts for the dashboard overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsOverview {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub departments: Vec<DepartmentCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> NewEmployee {
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

    #[test]
    fn test_new_record_defaults() {
        let record = EmployeeRecord::new(sample_input());
        assert_eq!(record.status, EmploymentStatus::Active);
        assert!(!record.is_deleted);
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_snapshot_excludes_bookkeeping() {
        let record = EmployeeRecord::new(sample_input());
        let snap = record.snapshot();

        assert_eq!(snap.get("fullName"), Some(&"Alice Mokashi".into()));
        assert_eq!(snap.get("salary"), Some(&FieldValue::Number(50000.0)));
        assert_eq!(snap.get("status"), Some(&"Active".into()));
        // Empty phone is absent, not null.
        assert_eq!(snap.get("phone"), None);
        // Identifier and bookkeeping fields never appear.
        assert_eq!(snap.get("id"), None);
        assert_eq!(snap.get("isDeleted"), None);
        assert_eq!(snap.get("createdAt"), None);
    }

    #[test]
    fn test_apply_patch() {
        let mut record = EmployeeRecord::new(sample_input());
        record.apply(EmployeeUpdate {
            department: Some("Finance".to_string()),
            salary: Some(55000.0),
            ..Default::default()
        });

        assert_eq!(record.department, "Finance");
        assert_eq!(record.salary, 55000.0);
        assert_eq!(record.full_name, "Alice Mokashi");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            EmploymentStatus::parse("Active").unwrap(),
            EmploymentStatus::Active
        );
        assert!(EmploymentStatus::parse("Retired").is_err());
    }
}
