//! Snapshot and field value types.
//!
//! A snapshot is a flat mapping of trackable field names to scalar values,
//! capturing one employee record at one instant. Snapshots are what the diff
//! engine consumes; they carry no identifiers or internal bookkeeping fields.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::diff::{tracked_field, FieldKind};
use crate::error::{RosterError, RosterResult};

/// A scalar value held by one snapshot field.
///
/// Equality is type-aware: numbers compare numerically, dates by instant,
/// strings exactly. Mismatched kinds never compare equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Date(DateTime<Utc>),
    Text(String),
}

impl FieldValue {
    /// Render the value for log/display purposes.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Date(d) => d.to_rfc3339(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(d: DateTime<Utc>) -> Self {
        FieldValue::Date(d)
    }
}

/// A flat mapping of field name to value.
///
/// Null/absent fields are simply not present in the map, so "null",
/// "undefined" and "missing" collapse into one empty representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot(BTreeMap<String, FieldValue>);

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Set a field value. A `None` value removes the field.
    pub fn set(&mut self, field: impl Into<String>, value: Option<FieldValue>) {
        let field = field.into();
        match value {
            Some(v) => {
                self.0.insert(field, v);
            }
            None => {
                self.0.remove(&field);
            }
        }
    }

    /// Get a field value, `None` when the field is empty.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    /// Number of populated fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the snapshot has no populated fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build a snapshot from a JSON object.
    ///
    /// Fails with `InvalidSnapshot` when the value is not an object or when
    /// any field holds a nested (object/array) value. Tracked date fields are
    /// parsed by their declared kind; JSON nulls are treated as absent.
    pub fn from_json(value: &serde_json::Value) -> RosterResult<Self> {
        let obj = value.as_object().ok_or_else(|| {
            RosterError::invalid_snapshot("snapshot must be a flat JSON object")
        })?;

        let mut snapshot = Snapshot::new();
        for (name, v) in obj {
            let parsed = match v {
                serde_json::Value::Null => continue,
                serde_json::Value::Bool(b) => FieldValue::Bool(*b),
                serde_json::Value::Number(n) => {
                    let n = n.as_f64().ok_or_else(|| {
                        RosterError::invalid_snapshot(format!(
                            "field '{}' holds a non-finite number",
                            name
                        ))
                    })?;
                    FieldValue::Number(n)
                }
                serde_json::Value::String(s) => match tracked_field(name).map(|f| f.kind) {
                    Some(FieldKind::Date) => {
                        let instant = DateTime::parse_from_rfc3339(s).map_err(|_| {
                            RosterError::invalid_snapshot(format!(
                                "field '{}' is not a valid RFC 3339 date: '{}'",
                                name, s
                            ))
                        })?;
                        FieldValue::Date(instant.with_timezone(&Utc))
                    }
                    _ => FieldValue::Text(s.clone()),
                },
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(RosterError::invalid_snapshot(format!(
                        "field '{}' holds a nested value; snapshots must be flat",
                        name
                    )));
                }
            };
            snapshot.set(name.clone(), Some(parsed));
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_aware_equality() {
        assert_eq!(FieldValue::Number(50000.0), FieldValue::Number(50000.0));
        assert_ne!(FieldValue::Number(50000.0), FieldValue::Text("50000".into()));
        assert_eq!(FieldValue::Text("IT".into()), FieldValue::Text("IT".into()));

        let a: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        let b: DateTime<Utc> = "2024-01-01T01:00:00+01:00".parse().unwrap();
        // Same instant, different offsets.
        assert_eq!(FieldValue::Date(a), FieldValue::Date(b));
    }

    #[test]
    fn test_null_is_absent() {
        let snap = Snapshot::from_json(&json!({"fullName": "Alice", "phone": null})).unwrap();
        assert_eq!(snap.get("fullName"), Some(&FieldValue::Text("Alice".into())));
        assert_eq!(snap.get("phone"), None);
        assert_eq!(snap.len(), 1);
    }

    #[test]
    fn test_nested_value_rejected() {
        let err = Snapshot::from_json(&json!({"address": {"city": "Pune"}})).unwrap_err();
        assert!(matches!(err, RosterError::InvalidSnapshot { .. }));

        let err = Snapshot::from_json(&json!(["not", "an", "object"])).unwrap_err();
        assert!(matches!(err, RosterError::InvalidSnapshot { .. }));
    }

    #[test]
    fn test_tracked_date_parsed_by_kind() {
        let snap =
            Snapshot::from_json(&json!({"dateOfJoining": "2023-06-01T00:00:00Z"})).unwrap();
        assert!(matches!(snap.get("dateOfJoining"), Some(FieldValue::Date(_))));

        let err = Snapshot::from_json(&json!({"dateOfJoining": "yesterday"})).unwrap_err();
        assert!(matches!(err, RosterError::InvalidSnapshot { .. }));
    }

    #[test]
    fn test_set_none_removes() {
        let mut snap = Snapshot::new();
        snap.set("phone", Some("555-0100".into()));
        assert_eq!(snap.len(), 1);
        snap.set("phone", None);
        assert!(snap.is_empty());
    }
}
