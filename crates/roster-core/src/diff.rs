//! Field-level diff engine.
//!
//! Computes the ordered list of field changes between two snapshots of an
//! employee record. The comparison is driven entirely by a statically
//! declared table of trackable fields, so diff behavior is deterministic and
//! testable in isolation: output order follows the table, not the insertion
//! order of the inputs, and fields outside the table are never compared.

use crate::types::{FieldChange, FieldValue, Snapshot};

/// Value kind of a trackable field, used for comparison and for coercing
/// snapshot input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
}

/// One entry of the trackable field table.
#[derive(Debug, Clone, Copy)]
pub struct TrackedField {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// The fixed set of employee fields eligible for diffing, in output order.
///
/// The internal identifier, created/updated timestamps, and the soft-delete
/// flag are deliberately not listed here.
pub const TRACKED_FIELDS: &[TrackedField] = &[
    TrackedField { name: "employeeId", kind: FieldKind::Text },
    TrackedField { name: "fullName", kind: FieldKind::Text },
    TrackedField { name: "email", kind: FieldKind::Text },
    TrackedField { name: "phone", kind: FieldKind::Text },
    TrackedField { name: "department", kind: FieldKind::Text },
    TrackedField { name: "designation", kind: FieldKind::Text },
    TrackedField { name: "salary", kind: FieldKind::Number },
    TrackedField { name: "status", kind: FieldKind::Text },
    TrackedField { name: "dateOfJoining", kind: FieldKind::Date },
];

/// Look up a trackable field by name.
pub fn tracked_field(name: &str) -> Option<&'static TrackedField> {
    TRACKED_FIELDS.iter().find(|f| f.name == name)
}

/// Compute the ordered field changes between two snapshots.
///
/// When either side is absent (a creation or a deletion) the result is empty;
/// the version entry's operation tag alone conveys what happened. Equality is
/// type-aware per [`FieldValue`], and an absent field equals an absent field,
/// so no change is reported when both sides are empty.
pub fn diff_snapshots(before: Option<&Snapshot>, after: Option<&Snapshot>) -> Vec<FieldChange> {
    let (Some(before), Some(after)) = (before, after) else {
        return Vec::new();
    };

    TRACKED_FIELDS
        .iter()
        .filter_map(|field| {
            let old = before.get(field.name);
            let new = after.get(field.name);
            if values_equal(old, new) {
                None
            } else {
                Some(FieldChange::new(field.name, old.cloned(), new.cloned()))
            }
        })
        .collect()
}

fn values_equal(a: Option<&FieldValue>, b: Option<&FieldValue>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
