//! The fixed record set loaded by the demo and by `roster index` without `--file`.

use serde_json::{Value, json};

/// Four employees across three departments.
pub fn sample_records() -> Vec<Value> {
    vec![
        json!({ "EmployeeID": "E02001", "Name": "John Doe", "Department": "IT", "Gender": "Male" }),
        json!({ "EmployeeID": "E02002", "Name": "Jane Smith", "Department": "HR", "Gender": "Female" }),
        json!({ "EmployeeID": "E02003", "Name": "Sam Brown", "Department": "IT", "Gender": "Male" }),
        json!({ "EmployeeID": "E02004", "Name": "Lucy Black", "Department": "Finance", "Gender": "Female" }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_shape() {
        let records = sample_records();
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.as_object().map(|o| o.len()) == Some(4)));
        assert_eq!(
            records.iter().filter(|r| r["Department"] == "IT").count(),
            2
        );
    }
}
