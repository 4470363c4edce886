//! OpenSearch/Elasticsearch client layer for Roster.
//!
//! Wraps the `opensearch` crate with the handful of operations the
//! employee directory needs:
//! - index lifecycle (exists / create / delete / refresh)
//! - single-document indexing with generated IDs
//! - match and term queries, counts, delete-by-query
//! - terms aggregations
//!
//! # Example
//!
//! ```rust,no_run
//! use roster_search::{Aggregation, Query, SearchClient, SearchConfig};
//! use serde_json::{Value, json};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SearchClient::new(SearchConfig::new("http://localhost:9200"))?;
//!
//!     client
//!         .index_document("staff", &json!({ "Name": "John Doe", "Department": "IT" }))
//!         .await?;
//!     client.refresh("staff").await?;
//!
//!     let it: Vec<Value> = client
//!         .search()
//!         .index("staff")
//!         .query(Query::match_field("Department", "IT"))
//!         .execute()
//!         .await?;
//!
//!     let facets = client
//!         .search()
//!         .index("staff")
//!         .size(0)
//!         .aggregation("by_dept", Aggregation::terms("Department.keyword"))
//!         .execute_with_meta::<Value>()
//!         .await?
//!         .terms_buckets("by_dept")?;
//!
//!     println!("{} hits, {} departments", it.len(), facets.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;
mod config;
mod error;
mod index;
mod query;
mod search;

pub use client::SearchClient;
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use index::{IndexManager, IndexSettings};
pub use query::{MatchQuery, Query, TermQuery};
pub use search::{Aggregation, Hit, SearchBuilder, SearchResult, TermsBucket};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        Aggregation, Query, Result, SearchBuilder, SearchClient, SearchConfig, SearchError,
    };
}
