//! Directory records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One directory entry: field name to value.
///
/// Serializes as a plain JSON object, which is exactly what gets indexed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Get a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Get a string field.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Whether the record carries `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Remove `field` if present.
    pub fn without(mut self, field: &str) -> Self {
        self.0.remove(field);
        self
    }

    /// Turn raw input into an indexable record.
    ///
    /// Fails when `value` is not an object, or when dropping
    /// `excluded_field` leaves nothing to index.
    pub fn prepare(value: Value, excluded_field: Option<&str>) -> Result<Self, SkipReason> {
        let mut record = Record::try_from(value)?;

        if let Some(field) = excluded_field {
            record = record.without(field);
        }

        if record.is_empty() {
            return Err(SkipReason::EmptyAfterExclusion);
        }

        Ok(record)
    }
}

impl TryFrom<Value> for Record {
    type Error = SkipReason;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Record(map)),
            _ => Err(SkipReason::NotAnObject),
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Record(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}

/// Why a record was not submitted for indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Input was an array, string, number, bool or null.
    NotAnObject,
    /// No fields remained once the excluded field was removed.
    EmptyAfterExclusion,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotAnObject => write!(f, "record is not an object"),
            SkipReason::EmptyAfterExclusion => write!(f, "no fields left after exclusion"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prepare_strips_excluded_field() {
        let raw = json!({ "EmployeeID": "E1", "Department": "IT", "Gender": "Male" });
        let record = Record::prepare(raw, Some("Department")).unwrap();

        assert!(!record.contains("Department"));
        assert_eq!(record.fields().collect::<Vec<_>>(), vec!["EmployeeID", "Gender"]);
    }

    #[test]
    fn test_prepare_missing_excluded_field_is_noop() {
        let raw = json!({ "EmployeeID": "E1" });
        let record = Record::prepare(raw.clone(), Some("Salary")).unwrap();
        assert_eq!(Value::from(record), raw);
    }

    #[test]
    fn test_prepare_without_exclusion() {
        let record = Record::prepare(json!({ "Name": "Sam" }), None).unwrap();
        assert_eq!(record.get_str("Name"), Some("Sam"));
    }

    #[test]
    fn test_prepare_empty_after_exclusion() {
        let err = Record::prepare(json!({ "Department": "IT" }), Some("Department")).unwrap_err();
        assert_eq!(err, SkipReason::EmptyAfterExclusion);
    }

    #[test]
    fn test_prepare_empty_input() {
        let err = Record::prepare(json!({}), None).unwrap_err();
        assert_eq!(err, SkipReason::EmptyAfterExclusion);
    }

    #[test]
    fn test_prepare_rejects_non_objects() {
        for raw in [json!(null), json!("E1"), json!(42), json!([{ "a": 1 }]), json!(true)] {
            assert_eq!(Record::prepare(raw, None).unwrap_err(), SkipReason::NotAnObject);
        }
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let record = Record::new().with("EmployeeID", "E1").with("Name", "John Doe");
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({ "EmployeeID": "E1", "Name": "John Doe" })
        );
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::NotAnObject.to_string(), "record is not an object");
        assert_eq!(
            serde_json::to_value(SkipReason::EmptyAfterExclusion).unwrap(),
            json!("empty_after_exclusion")
        );
    }
}
