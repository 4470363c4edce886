//! Per-record results of a batch insert.

use crate::record::SkipReason;
use serde::Serialize;

/// What happened to one input record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecordOutcome {
    /// Accepted by the search service under the generated `id`.
    Indexed {
        /// Document ID assigned by the service.
        id: String,
    },
    /// Never sent.
    Skipped {
        /// Why the record was rejected locally.
        reason: SkipReason,
    },
    /// Sent and rejected, or the request failed.
    Failed {
        /// Service or transport error message.
        reason: String,
    },
}

/// Outcome of [`index_records`](crate::EmployeeDirectory::index_records),
/// one entry per input record in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    /// Target collection.
    pub collection: String,
    /// Field stripped from every record, if any.
    pub excluded_field: Option<String>,
    /// Outcomes, aligned with the input sequence.
    pub outcomes: Vec<RecordOutcome>,
}

impl BatchReport {
    pub(crate) fn new(collection: &str, excluded_field: Option<&str>) -> Self {
        Self {
            collection: collection.to_string(),
            excluded_field: excluded_field.map(String::from),
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, outcome: RecordOutcome) {
        self.outcomes.push(outcome);
    }

    /// Number of records the service accepted.
    pub fn indexed(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Indexed { .. }))
    }

    /// Number of records rejected locally.
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Skipped { .. }))
    }

    /// Number of records the service rejected.
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Failed { .. }))
    }

    /// IDs of the indexed records.
    pub fn indexed_ids(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                RecordOutcome::Indexed { id } => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    /// True when nothing failed. Skips do not count as failures.
    pub fn is_complete(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&RecordOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}
