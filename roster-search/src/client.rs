//! Search client implementation.

use crate::{
    config::SearchConfig,
    error::{SearchError, Result, error_reason},
    index::IndexManager,
    query::Query,
    search::SearchBuilder,
};
use opensearch::{
    DeleteByQueryParts, IndexParts, OpenSearch,
    auth::Credentials,
    http::{
        Url,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
};
use roster_log::{debug, info};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Client for one search node.
///
/// Cloning is cheap; clones share the underlying transport.
#[derive(Clone)]
pub struct SearchClient {
    client: Arc<OpenSearch>,
    config: Arc<SearchConfig>,
}

impl SearchClient {
    /// Create a new client. No request is sent until the first operation.
    pub fn new(config: SearchConfig) -> Result<Self> {
        info!("Initializing search client for: {}", config.url);

        let url = Url::parse(&config.url)
            .map_err(|e| SearchError::Validation(format!("Invalid URL '{}': {}", config.url, e)))?;

        let conn_pool = SingleNodeConnectionPool::new(url);
        let mut builder = TransportBuilder::new(conn_pool).timeout(config.request_timeout);

        if config.disable_proxy {
            builder = builder.disable_proxy();
        }

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.auth(Credentials::Basic(user.clone(), pass.clone()));
        }

        let transport = builder
            .build()
            .map_err(|e| SearchError::Connection(e.to_string()))?;

        debug!("Search client initialized");

        Ok(Self {
            client: Arc::new(OpenSearch::new(transport)),
            config: Arc::new(config),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Get an index manager for index operations.
    pub fn indices(&self) -> IndexManager {
        IndexManager::new(self.client.clone())
    }

    /// Create a search builder.
    pub fn search(&self) -> SearchBuilder {
        SearchBuilder::new(self.client.clone())
    }

    /// Index a document with an auto-generated ID and return that ID.
    pub async fn index_document<T: Serialize>(&self, index: &str, doc: &T) -> Result<String> {
        debug!("Indexing document with auto-generated ID in index {}", index);

        let response = self
            .client
            .index(IndexParts::Index(index))
            .body(doc)
            .send()
            .await?;

        let status = response.status_code();
        let body: Value = response.json().await?;

        if !status.is_success() {
            return Err(SearchError::internal(status.as_u16(), &body));
        }

        Ok(body["_id"].as_str().unwrap_or("").to_string())
    }

    /// Delete every document matching `query` and return how many were removed.
    ///
    /// With `refresh`, the index is refreshed before the call returns.
    pub async fn delete_by_query(&self, index: &str, query: &Query, refresh: bool) -> Result<u64> {
        debug!("Deleting documents by query in index {}", index);

        let response = self
            .client
            .delete_by_query(DeleteByQueryParts::Index(&[index]))
            .refresh(refresh)
            .body(json!({ "query": query.to_json() }))
            .send()
            .await?;

        let status = response.status_code();
        let body: Value = response.json().await?;

        if !status.is_success() {
            return Err(SearchError::Query(error_reason(&body, "Delete by query failed")));
        }

        Ok(body["deleted"].as_u64().unwrap_or(0))
    }

    /// Count every document in an index.
    pub async fn count(&self, index: &str) -> Result<u64> {
        self.search().index(index).count().await
    }

    /// Refresh an index to make recent changes searchable.
    pub async fn refresh(&self, index: &str) -> Result<()> {
        self.indices().refresh(index).await
    }

    /// Ping the node. Transport failures are reported as `false`.
    pub async fn ping(&self) -> bool {
        match self.client.ping().send().await {
            Ok(response) => response.status_code().is_success(),
            Err(e) => {
                debug!("Ping failed: {}", e);
                false
            }
        }
    }
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("url", &self.config.url)
            .finish()
    }
}
