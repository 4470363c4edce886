//! Employee directory over an OpenSearch-compatible search service.
//!
//! Records are indexed into named collections, searched by field, counted,
//! deleted by identifier and summarized with a terms facet.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roster::prelude::*;
//!
//! # async fn example() -> roster::Result<()> {
//! let config = DirectoryConfig::load(None)?;
//! let directory = EmployeeDirectory::from_config(&config)?;
//!
//! directory.reset_collection("employees").await?;
//! let report = directory
//!     .index_records("employees", Some("Gender"), sample_records())
//!     .await?;
//! assert_eq!(report.indexed(), 4);
//!
//! let it = directory.search_by_field("employees", "Department", "IT").await?;
//! let facet = directory.department_facet("employees").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod demo;
mod directory;
mod error;
mod policy;
mod record;
mod report;
mod sample;

pub use config::{ConfigError, DirectoryConfig};
pub use directory::{EmployeeDirectory, FacetBucket};
pub use error::{DirectoryError, Result};
pub use policy::{FieldPolicy, MatchMode};
pub use record::{Record, SkipReason};
pub use report::{BatchReport, RecordOutcome};
pub use sample::sample_records;

pub use roster_search::{SearchClient, SearchConfig};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        BatchReport, DirectoryConfig, DirectoryError, EmployeeDirectory, FacetBucket,
        FieldPolicy, MatchMode, Record, RecordOutcome, Result, SearchClient, SearchConfig,
        sample_records,
    };
}
