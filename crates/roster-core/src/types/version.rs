//! Version entry types for the append-only change history.
//!
//! A version entry is one immutable audit record describing a single mutation
//! event. Entries are created exactly once, synchronously with the mutation
//! they document, and are never modified or deleted afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RosterError, RosterResult};
use crate::types::snapshot::FieldValue;

/// Operation tag for a version entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Convert to string for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
        }
    }

    /// Parse from string, failing with `InvalidOperation` for unknown tags.
    pub fn parse(s: &str) -> RosterResult<Self> {
        match s {
            "CREATE" => Ok(Operation::Create),
            "UPDATE" => Ok(Operation::Update),
            "DELETE" => Ok(Operation::Delete),
            other => Err(RosterError::invalid_operation(other)),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (field, oldValue, newValue) triple inside an UPDATE version entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    /// Trackable field name, as declared in the field table.
    pub field: String,
    /// Value before the mutation, `None` when the field was empty.
    pub old_value: Option<FieldValue>,
    /// Value after the mutation, `None` when the field became empty.
    pub new_value: Option<FieldValue>,
}

impl FieldChange {
    pub fn new(
        field: impl Into<String>,
        old_value: Option<FieldValue>,
        new_value: Option<FieldValue>,
    ) -> Self {
        Self {
            field: field.into(),
            old_value,
            new_value,
        }
    }
}

/// An immutable version entry, as persisted in the version store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    /// Unique entry identifier (assigned by the store on append).
    pub id: Uuid,
    /// Employee record this entry documents.
    pub record_id: Uuid,
    /// What kind of mutation produced this entry.
    pub operation: Operation,
    /// Field-level changes, in trackable field order. Empty for
    /// CREATE and DELETE; the operation tag alone conveys those.
    pub changes: Vec<FieldChange>,
    /// Actor who made the change.
    pub changed_by: String,
    /// Optional free-text reason for the change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_reason: Option<String>,
    /// When the mutation happened.
    pub timestamp: DateTime<Utc>,
    /// Monotonic tie-breaker; entries with equal timestamps are ordered by
    /// this. Internal to the engine, never exposed on the wire.
    #[serde(skip)]
    pub sequence: u64,
}

/// A version entry prepared by the recorder but not yet persisted.
///
/// The version store assigns the entry id on append; everything else is
/// fixed by the recorder before the write.
#[derive(Debug, Clone)]
pub struct NewVersionEntry {
    pub record_id: Uuid,
    pub operation: Operation,
    pub changes: Vec<FieldChange>,
    pub changed_by: String,
    pub change_reason: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub sequence: u64,
}

impl NewVersionEntry {
    /// Attach the store-assigned id, producing the persisted entry.
    pub fn with_id(self, id: Uuid) -> VersionEntry {
        VersionEntry {
            id,
            record_id: self.record_id,
            operation: self.operation,
            changes: self.changes,
            changed_by: self.changed_by,
            change_reason: self.change_reason,
            timestamp: self.timestamp,
            sequence: self.sequence,
        }
    }
}
