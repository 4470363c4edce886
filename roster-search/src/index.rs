//! Index management.

use crate::error::{SearchError, Result};
use opensearch::{
    OpenSearch,
    http::StatusCode,
    indices::{
        IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesRefreshParts,
    },
};
use roster_log::{debug, info};
use serde_json::{Value, json};
use std::sync::Arc;

/// Index manager for creating and dropping indices.
#[derive(Clone)]
pub struct IndexManager {
    client: Arc<OpenSearch>,
}

impl IndexManager {
    pub(crate) fn new(client: Arc<OpenSearch>) -> Self {
        Self { client }
    }

    /// Create a new index.
    pub async fn create(&self, name: &str, settings: &IndexSettings) -> Result<()> {
        info!("Creating index: {}", name);

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(name))
            .body(settings.to_json())
            .send()
            .await?;

        let status = response.status_code();
        if status.is_success() {
            return Ok(());
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        let error_type = body["error"]["type"].as_str().unwrap_or("");

        if error_type == "resource_already_exists_exception" {
            return Err(SearchError::IndexExists(name.to_string()));
        }

        Err(SearchError::internal(status.as_u16(), &body))
    }

    /// Delete an index.
    pub async fn delete(&self, name: &str) -> Result<()> {
        info!("Deleting index: {}", name);

        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[name]))
            .send()
            .await?;

        let status = response.status_code();

        if status == StatusCode::NOT_FOUND {
            return Err(SearchError::IndexNotFound(name.to_string()));
        }

        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            return Err(SearchError::internal(status.as_u16(), &body));
        }

        Ok(())
    }

    /// Check if an index exists.
    pub async fn exists(&self, name: &str) -> Result<bool> {
        debug!("Checking if index exists: {}", name);

        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[name]))
            .send()
            .await?;

        match response.status_code() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(SearchError::internal(status.as_u16(), &Value::Null)),
        }
    }

    /// Make recent writes visible to searches.
    pub async fn refresh(&self, name: &str) -> Result<()> {
        debug!("Refreshing index: {}", name);

        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[name]))
            .send()
            .await?;

        let status = response.status_code();

        if status == StatusCode::NOT_FOUND {
            return Err(SearchError::IndexNotFound(name.to_string()));
        }

        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            return Err(SearchError::internal(status.as_u16(), &body));
        }

        Ok(())
    }
}

/// Settings sent when creating an index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexSettings {
    /// Number of shards.
    pub number_of_shards: Option<u32>,
    /// Number of replicas.
    pub number_of_replicas: Option<u32>,
    /// Refresh interval, e.g. `1s`.
    pub refresh_interval: Option<String>,
}

impl IndexSettings {
    /// Create new index settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set number of shards.
    pub fn shards(mut self, shards: u32) -> Self {
        self.number_of_shards = Some(shards);
        self
    }

    /// Set number of replicas.
    pub fn replicas(mut self, replicas: u32) -> Self {
        self.number_of_replicas = Some(replicas);
        self
    }

    /// Set refresh interval.
    pub fn refresh_interval(mut self, interval: impl Into<String>) -> Self {
        self.refresh_interval = Some(interval.into());
        self
    }

    /// Request body for index creation. Empty settings produce `{}`.
    pub fn to_json(&self) -> Value {
        let mut settings = serde_json::Map::new();

        if let Some(shards) = self.number_of_shards {
            settings.insert("number_of_shards".to_string(), json!(shards));
        }
        if let Some(replicas) = self.number_of_replicas {
            settings.insert("number_of_replicas".to_string(), json!(replicas));
        }
        if let Some(interval) = &self.refresh_interval {
            settings.insert("refresh_interval".to_string(), json!(interval));
        }

        if settings.is_empty() {
            json!({})
        } else {
            json!({ "settings": settings })
        }
    }
}
