//! The employee directory facade.

use crate::{
    config::DirectoryConfig,
    error::{DirectoryError, Result},
    policy::FieldPolicy,
    record::Record,
    report::{BatchReport, RecordOutcome},
};
use roster_log::{debug, error, info, warn};
use roster_search::{Aggregation, IndexSettings, SearchClient};
use serde::Serialize;
use serde_json::Value;

const FACET_AGGREGATION: &str = "facet";

/// One `(value, count)` pair of a facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetBucket {
    /// Field value.
    pub key: String,
    /// Records carrying that value.
    pub count: u64,
}

/// Employee records stored in a search service, one collection per index.
///
/// Owns its client; dropping the directory releases the connection pool.
/// Every operation is a single awaited round trip except
/// [`reset_collection`](Self::reset_collection) and
/// [`index_records`](Self::index_records).
#[derive(Debug, Clone)]
pub struct EmployeeDirectory {
    client: SearchClient,
    policy: FieldPolicy,
    index_settings: IndexSettings,
    search_size: u64,
    facet_size: u64,
}

impl EmployeeDirectory {
    /// Wrap a client with a match policy and service-default sizes.
    pub fn new(client: SearchClient, policy: FieldPolicy) -> Self {
        Self {
            client,
            policy,
            index_settings: IndexSettings::new(),
            search_size: 10,
            facet_size: 10,
        }
    }

    /// Build the client and policy from configuration.
    pub fn from_config(config: &DirectoryConfig) -> Result<Self> {
        let client = SearchClient::new(config.search_config())?;

        Ok(Self::new(client, config.field_policy())
            .with_index_settings(config.index_settings())
            .with_search_size(config.search_size)
            .with_facet_size(config.facet_size))
    }

    /// Settings used when a collection is created.
    pub fn with_index_settings(mut self, settings: IndexSettings) -> Self {
        self.index_settings = settings;
        self
    }

    /// Maximum hits returned by [`search_by_field`](Self::search_by_field).
    pub fn with_search_size(mut self, size: u64) -> Self {
        self.search_size = size;
        self
    }

    /// Maximum buckets returned by [`facet`](Self::facet).
    pub fn with_facet_size(mut self, size: u64) -> Self {
        self.facet_size = size;
        self
    }

    /// The underlying client.
    pub fn client(&self) -> &SearchClient {
        &self.client
    }

    /// The match policy.
    pub fn policy(&self) -> &FieldPolicy {
        &self.policy
    }

    /// Whether the search service answers.
    pub async fn ping(&self) -> bool {
        self.client.ping().await
    }

    /// Drop the collection if it exists, then create it empty.
    pub async fn reset_collection(&self, name: &str) -> Result<()> {
        check_collection(name)?;
        let indices = self.client.indices();

        if indices.exists(name).await? {
            indices.delete(name).await?;
            info!("Existing collection {} deleted", name);
        }

        indices.create(name, &self.index_settings).await?;
        info!("Collection {} created", name);
        Ok(())
    }

    /// Index each record after removing `excluded_field`, then refresh.
    ///
    /// Records that are not objects, or are empty once the field is gone,
    /// are skipped. A record the service rejects is reported as failed and
    /// the batch carries on. Only a failed refresh fails the whole call.
    pub async fn index_records<I>(
        &self,
        name: &str,
        excluded_field: Option<&str>,
        records: I,
    ) -> Result<BatchReport>
    where
        I: IntoIterator<Item = Value>,
    {
        check_collection(name)?;
        let mut report = BatchReport::new(name, excluded_field);

        for (position, raw) in records.into_iter().enumerate() {
            let record = match Record::prepare(raw, excluded_field) {
                Ok(record) => record,
                Err(reason) => {
                    warn!("Record {} not indexed into {}: {}", position, name, reason);
                    report.push(RecordOutcome::Skipped { reason });
                    continue;
                }
            };

            debug!("Indexing record {} into {}", position, name);
            let outcome = match self.client.index_document(name, &record).await {
                Ok(id) => RecordOutcome::Indexed { id },
                Err(e) => {
                    error!("Record {} rejected by {}: {}", position, name, e);
                    RecordOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            report.push(outcome);
        }

        self.client.refresh(name).await?;

        info!(
            "Indexed {} of {} records into {} (excluded field: {})",
            report.indexed(),
            report.outcomes.len(),
            name,
            excluded_field.unwrap_or("none")
        );
        Ok(report)
    }

    /// Records whose `field` matches `value` under the field's match mode.
    pub async fn search_by_field(&self, name: &str, field: &str, value: &str) -> Result<Vec<Record>> {
        check_collection(name)?;
        debug!("Searching {} for {} = {:?}", name, field, value);

        let records = self
            .client
            .search()
            .index(name)
            .query(self.policy.query_for(field, value))
            .size(self.search_size)
            .execute::<Record>()
            .await?;

        Ok(records)
    }

    /// Number of records in the collection.
    pub async fn count(&self, name: &str) -> Result<u64> {
        check_collection(name)?;
        Ok(self.client.count(name).await?)
    }

    /// Delete every record whose identifier matches and return how many
    /// were removed. The deletion is visible to the next read.
    pub async fn delete_by_identifier(&self, name: &str, identifier: &str) -> Result<u64> {
        check_collection(name)?;

        let field = self.policy.identifier_field();
        let query = self.policy.query_for(field, identifier);
        let deleted = self.client.delete_by_query(name, &query, true).await?;

        info!("Deleted {} record(s) with {} {} from {}", deleted, field, identifier, name);
        Ok(deleted)
    }

    /// Distribution of `field` values across the collection, most frequent first.
    pub async fn facet(&self, name: &str, field: &str) -> Result<Vec<FacetBucket>> {
        check_collection(name)?;

        let aggregation = Aggregation::terms(self.policy.aggregation_field(field))
            .with_size(self.facet_size);

        let result = self
            .client
            .search()
            .index(name)
            .size(0)
            .aggregation(FACET_AGGREGATION, aggregation)
            .execute_with_meta::<Value>()
            .await?;

        let buckets = result
            .terms_buckets(FACET_AGGREGATION)?
            .into_iter()
            .map(|b| FacetBucket {
                key: b.key,
                count: b.doc_count,
            })
            .collect();

        Ok(buckets)
    }

    /// [`facet`](Self::facet) over the department field.
    pub async fn department_facet(&self, name: &str) -> Result<Vec<FacetBucket>> {
        self.facet(name, self.policy.department_field()).await
    }
}

fn check_collection(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DirectoryError::InvalidCollection(
            "collection name cannot be empty".to_string(),
        ));
    }
    Ok(())
}
