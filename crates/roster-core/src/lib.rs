//! roster-core - Core library for roster.
//!
//! This crate provides the employee record types, the field-level diff
//! engine, and the append-only change history (version recorder + history
//! reader) behind the roster employee management API.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use roster_core::{EmployeeService, SqliteRecordStore, SqliteVersionStore};
//!
//! let records = Arc::new(SqliteRecordStore::new("roster.db")?);
//! let versions = Arc::new(SqliteVersionStore::new("roster.db")?);
//! let service = EmployeeService::new(records, versions).await?;
//!
//! let employee = service.create(input, "admin", Some("Initial onboarding")).await?;
//! let page = service.history(employee.id, 1, 20).await?;
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod history;
pub mod service;
pub mod store;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::RosterConfig;
pub use diff::{diff_snapshots, FieldKind, TrackedField, TRACKED_FIELDS};
pub use error::{ErrorCode, RosterError, RosterResult};
pub use history::{HistoryPage, HistoryReader, Pagination, VersionComparison, VersionRecorder};
pub use service::EmployeeService;
pub use store::{SqliteRecordStore, SqliteVersionStore};
pub use traits::{RecordStore, VersionStore};
pub use types::{
    EmployeeFilter, EmployeeRecord, EmployeeSummary, EmployeeUpdate, EmploymentStatus,
    FieldChange, FieldValue, NewEmployee, NewVersionEntry, Operation, Snapshot, StatsOverview,
    VersionEntry,
};
