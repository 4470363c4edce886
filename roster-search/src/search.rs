//! Search builder and results.

use crate::{
    error::{SearchError, Result, error_reason},
    query::Query,
};
use opensearch::{CountParts, OpenSearch, SearchParts};
use roster_log::debug;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use std::sync::Arc;

/// Search builder for constructing and executing searches.
#[derive(Clone)]
pub struct SearchBuilder {
    client: Arc<OpenSearch>,
    indices: Vec<String>,
    query: Option<Query>,
    size: Option<u64>,
    aggregations: serde_json::Map<String, Value>,
}

impl SearchBuilder {
    pub(crate) fn new(client: Arc<OpenSearch>) -> Self {
        Self {
            client,
            indices: Vec::new(),
            query: None,
            size: None,
            aggregations: serde_json::Map::new(),
        }
    }

    /// Add an index to search.
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.indices.push(index.into());
        self
    }

    /// Set the query.
    pub fn query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    /// Set result size limit. `0` returns aggregations only.
    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Add a named aggregation.
    pub fn aggregation(mut self, name: impl Into<String>, agg: Aggregation) -> Self {
        self.aggregations.insert(name.into(), agg.to_json());
        self
    }

    /// Request body for `_search`.
    pub fn build_body(&self) -> Value {
        let mut body = serde_json::Map::new();

        if let Some(query) = &self.query {
            body.insert("query".to_string(), query.to_json());
        }

        if let Some(size) = self.size {
            body.insert("size".to_string(), json!(size));
        }

        if !self.aggregations.is_empty() {
            body.insert("aggs".to_string(), Value::Object(self.aggregations.clone()));
        }

        Value::Object(body)
    }

    fn index_refs(&self) -> Result<Vec<&str>> {
        if self.indices.is_empty() {
            return Err(SearchError::Validation(
                "search requires at least one index".to_string(),
            ));
        }
        Ok(self.indices.iter().map(|s| s.as_str()).collect())
    }

    /// Execute the search and return `_source` documents.
    pub async fn execute<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        let result = self.execute_with_meta::<T>().await?;
        Ok(result.hits.into_iter().map(|h| h.source).collect())
    }

    /// Execute the search and return hits with metadata and aggregations.
    pub async fn execute_with_meta<T: DeserializeOwned>(self) -> Result<SearchResult<T>> {
        let indices = self.index_refs()?;
        debug!("Searching indices: {:?}", indices);

        let response = self
            .client
            .search(SearchParts::Index(&indices))
            .body(self.build_body())
            .send()
            .await?;

        let status = response.status_code();
        let result: Value = response.json().await?;

        if !status.is_success() {
            return Err(SearchError::Query(error_reason(&result, "Search failed")));
        }

        SearchResult::from_response(result)
    }

    /// Count matching documents. Without a query, counts everything.
    pub async fn count(self) -> Result<u64> {
        let indices = self.index_refs()?;
        debug!("Counting documents in: {:?}", indices);

        let body = match &self.query {
            Some(query) => json!({ "query": query.to_json() }),
            None => json!({ "query": Query::MatchAll.to_json() }),
        };

        let response = self
            .client
            .count(CountParts::Index(&indices))
            .body(body)
            .send()
            .await?;

        let status = response.status_code();
        let result: Value = response.json().await?;

        if !status.is_success() {
            return Err(SearchError::Query(error_reason(&result, "Count failed")));
        }

        result["count"]
            .as_u64()
            .ok_or_else(|| SearchError::Query("count missing from response".to_string()))
    }
}

/// Search result.
#[derive(Debug, Clone)]
pub struct SearchResult<T> {
    /// Total matching documents.
    pub total: u64,
    /// Matching documents, relevance order.
    pub hits: Vec<Hit<T>>,
    /// Raw `aggregations` object, if any were requested.
    pub aggregations: Option<Value>,
    /// Time taken in milliseconds.
    pub took_ms: u64,
}

impl<T: DeserializeOwned> SearchResult<T> {
    /// Parse a `_search` response body.
    pub fn from_response(result: Value) -> Result<Self> {
        let mut hits = Vec::new();

        if let Some(hits_arr) = result["hits"]["hits"].as_array() {
            for hit in hits_arr {
                let source = hit
                    .get("_source")
                    .ok_or_else(|| SearchError::Query("hit without _source".to_string()))?;

                hits.push(Hit {
                    id: hit["_id"].as_str().unwrap_or("").to_string(),
                    index: hit["_index"].as_str().unwrap_or("").to_string(),
                    score: hit["_score"].as_f64(),
                    source: serde_json::from_value(source.clone())?,
                });
            }
        }

        // Older nodes report a bare number instead of {value, relation}.
        let total = result["hits"]["total"]["value"]
            .as_u64()
            .or_else(|| result["hits"]["total"].as_u64())
            .unwrap_or(hits.len() as u64);

        Ok(SearchResult {
            total,
            hits,
            aggregations: result.get("aggregations").cloned(),
            took_ms: result["took"].as_u64().unwrap_or(0),
        })
    }
}

impl<T> SearchResult<T> {
    /// Buckets of a named terms aggregation.
    pub fn terms_buckets(&self, name: &str) -> Result<Vec<TermsBucket>> {
        let buckets = self
            .aggregations
            .as_ref()
            .and_then(|aggs| aggs.get(name))
            .and_then(|agg| agg.get("buckets"))
            .ok_or_else(|| SearchError::Query(format!("aggregation '{}' missing", name)))?;

        Ok(serde_json::from_value(buckets.clone())?)
    }
}

/// A search hit.
#[derive(Debug, Clone)]
pub struct Hit<T> {
    /// Document ID.
    pub id: String,
    /// Index the hit came from.
    pub index: String,
    /// Relevance score; absent for `size: 0` or sorted searches.
    pub score: Option<f64>,
    /// The document.
    pub source: T,
}

/// Aggregation types.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    /// Terms aggregation.
    Terms {
        /// Field to aggregate on. Must be a keyword (non-analyzed) field.
        field: String,
        /// Maximum number of buckets.
        size: Option<u64>,
    },
}

impl Aggregation {
    /// Create a terms aggregation.
    pub fn terms(field: impl Into<String>) -> Self {
        Aggregation::Terms {
            field: field.into(),
            size: None,
        }
    }

    /// Set the bucket limit.
    pub fn with_size(self, size: u64) -> Self {
        match self {
            Aggregation::Terms { field, .. } => Aggregation::Terms {
                field,
                size: Some(size),
            },
        }
    }

    /// Convert to JSON.
    pub fn to_json(&self) -> Value {
        match self {
            Aggregation::Terms { field, size } => {
                let mut terms = json!({ "field": field });
                if let Some(s) = size {
                    terms["size"] = json!(s);
                }
                json!({ "terms": terms })
            }
        }
    }
}

/// One bucket of a terms aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermsBucket {
    /// Field value. Numeric keys are rendered as strings.
    #[serde(deserialize_with = "key_as_string")]
    pub key: String,
    /// Number of documents with this value.
    pub doc_count: u64,
}

fn key_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        other => other.to_string(),
    })
}
