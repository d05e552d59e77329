//! Core types for roster.

mod employee;
mod snapshot;
mod version;

pub use employee::{
    DepartmentCount, EmployeeFilter, EmployeeRecord, EmployeeSummary, EmployeeUpdate,
    EmploymentStatus, NewEmployee, StatsOverview,
};
pub use snapshot::{FieldValue, Snapshot};
pub use version::{FieldChange, NewVersionEntry, Operation, VersionEntry};
