//! Query DSL.

use serde_json::{Value, json};

/// The query shapes the directory issues.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Match every document.
    MatchAll,
    /// Analyzed full-text match.
    Match(MatchQuery),
    /// Exact, non-analyzed term match.
    Term(TermQuery),
}

impl Query {
    /// Shorthand for a match query.
    pub fn match_field(field: impl Into<String>, value: impl Into<String>) -> Self {
        Query::Match(MatchQuery::new(field, value))
    }

    /// Shorthand for a term query.
    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Query::Term(TermQuery::new(field, value))
    }

    /// Convert query to JSON.
    pub fn to_json(&self) -> Value {
        match self {
            Query::MatchAll => json!({ "match_all": {} }),
            Query::Match(m) => m.to_json(),
            Query::Term(t) => t.to_json(),
        }
    }
}

/// Match query for full-text search.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    /// Field to search.
    pub field: String,
    /// Search text.
    pub query: String,
    /// `and` / `or` between analyzed tokens.
    pub operator: Option<String>,
}

impl MatchQuery {
    /// Create a new match query.
    pub fn new(field: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            query: query.into(),
            operator: None,
        }
    }

    /// Set the operator.
    pub fn operator(mut self, op: impl Into<String>) -> Self {
        self.operator = Some(op.into());
        self
    }

    fn to_json(&self) -> Value {
        let mut query = json!({ "query": self.query });

        if let Some(op) = &self.operator {
            query["operator"] = json!(op);
        }

        json!({ "match": { &self.field: query } })
    }
}

/// Term query for exact matching.
#[derive(Debug, Clone, PartialEq)]
pub struct TermQuery {
    /// Field name.
    pub field: String,
    /// Exact value to match.
    pub value: Value,
}

impl TermQuery {
    /// Create a new term query.
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    fn to_json(&self) -> Value {
        json!({ "term": { &self.field: { "value": self.value } } })
    }
}
