//! Per-field match policy.
//!
//! Dynamically mapped string fields are indexed twice by the search service:
//! as analyzed `text` under the field name and as an exact `keyword` under
//! `<field>.keyword`. The policy picks which of the two a lookup targets.

use roster_search::{MatchQuery, Query};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a field is compared against a lookup value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// `term` query on the keyword sub-field; case and whitespace sensitive.
    Exact,
    /// `match` query on the text field; tokenized, relevance ranked.
    Analyzed,
}

/// Field names and match modes used by the directory.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPolicy {
    identifier_field: String,
    department_field: String,
    keyword_suffix: String,
    default_mode: MatchMode,
    overrides: HashMap<String, MatchMode>,
    match_operator: Option<String>,
}

impl Default for FieldPolicy {
    fn default() -> Self {
        Self {
            identifier_field: "EmployeeID".to_string(),
            department_field: "Department".to_string(),
            keyword_suffix: ".keyword".to_string(),
            default_mode: MatchMode::Analyzed,
            overrides: HashMap::new(),
            match_operator: None,
        }
    }
}

impl FieldPolicy {
    /// Default policy: `EmployeeID` exact, everything else analyzed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different identifier field. It is matched exactly unless a
    /// mode is set for it explicitly.
    pub fn with_identifier_field(mut self, field: impl Into<String>) -> Self {
        self.identifier_field = field.into();
        self
    }

    /// Use a different department field for [`department_facet`](crate::EmployeeDirectory::department_facet).
    pub fn with_department_field(mut self, field: impl Into<String>) -> Self {
        self.department_field = field.into();
        self
    }

    /// Change the keyword sub-field suffix (default `.keyword`).
    pub fn with_keyword_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.keyword_suffix = suffix.into();
        self
    }

    /// Mode for fields without an explicit override.
    pub fn with_default_mode(mut self, mode: MatchMode) -> Self {
        self.default_mode = mode;
        self
    }

    /// Set the mode for one field.
    pub fn with_mode(mut self, field: impl Into<String>, mode: MatchMode) -> Self {
        self.overrides.insert(field.into(), mode);
        self
    }

    /// Combine analyzed tokens with `and` or `or` (service default `or`).
    pub fn with_match_operator(mut self, operator: impl Into<String>) -> Self {
        self.match_operator = Some(operator.into());
        self
    }

    /// Identifier field name.
    pub fn identifier_field(&self) -> &str {
        &self.identifier_field
    }

    /// Department field name.
    pub fn department_field(&self) -> &str {
        &self.department_field
    }

    /// Mode used for `field`: an explicit override, then exact for the
    /// identifier, then the default mode.
    pub fn mode_for(&self, field: &str) -> MatchMode {
        match self.overrides.get(field) {
            Some(mode) => *mode,
            None if field == self.identifier_field => MatchMode::Exact,
            None => self.default_mode,
        }
    }

    /// The non-analyzed variant of `field`.
    pub fn keyword_field(&self, field: &str) -> String {
        if self.keyword_suffix.is_empty() || field.ends_with(&self.keyword_suffix) {
            field.to_string()
        } else {
            format!("{}{}", field, self.keyword_suffix)
        }
    }

    /// Query matching `field == value` under this policy.
    pub fn query_for(&self, field: &str, value: &str) -> Query {
        match self.mode_for(field) {
            MatchMode::Exact => Query::term(self.keyword_field(field), value),
            MatchMode::Analyzed => match &self.match_operator {
                Some(op) => Query::Match(MatchQuery::new(field, value).operator(op.clone())),
                None => Query::match_field(field, value),
            },
        }
    }

    /// Field that terms aggregations over `field` must target.
    pub fn aggregation_field(&self, field: &str) -> String {
        self.keyword_field(field)
    }
}
