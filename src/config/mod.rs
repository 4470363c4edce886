//! Directory configuration.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. an optional TOML or JSON file
//! 3. a `.env` file in the working directory, if present
//! 4. `ROSTER_*` environment variables
//!
//! Command-line overrides are applied by the binary on top of the result.

mod env;
mod loader;
mod validation;

pub use env::EnvLoader;
pub use loader::{ConfigLoader, FileFormat};
pub use validation::ConfigValidator;

use crate::policy::{FieldPolicy, MatchMode};
use roster_search::{IndexSettings, SearchConfig};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Prefix of every environment variable the directory reads.
pub const ENV_PREFIX: &str = "ROSTER";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Everything needed to build an [`EmployeeDirectory`](crate::EmployeeDirectory).
#[derive(Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectoryConfig {
    /// Search node URL.
    pub url: String,
    /// Basic auth username.
    pub username: Option<String>,
    /// Basic auth password.
    pub password: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Route requests through `HTTP_PROXY`/`HTTPS_PROXY`.
    pub use_system_proxy: bool,
    /// Maximum hits returned by a field search.
    pub search_size: u64,
    /// Maximum buckets returned by a facet.
    pub facet_size: u64,
    /// Shards for newly created collections; service default when unset.
    pub shards: Option<u32>,
    /// Replicas for newly created collections; service default when unset.
    pub replicas: Option<u32>,
    /// Refresh interval for newly created collections, e.g. `"1s"`.
    pub refresh_interval: Option<String>,
    /// Field that identifies a record.
    pub identifier_field: String,
    /// Field summarized by the department facet.
    pub department_field: String,
    /// Suffix of the exact-match sub-field.
    pub keyword_suffix: String,
    /// Fields matched exactly, in addition to the identifier.
    pub exact_fields: Vec<String>,
    /// Fields matched with text analysis.
    pub analyzed_fields: Vec<String>,
    /// `and` or `or` between analyzed tokens; service default when unset.
    pub match_operator: Option<String>,
}

impl fmt::Debug for DirectoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("use_system_proxy", &self.use_system_proxy)
            .field("search_size", &self.search_size)
            .field("facet_size", &self.facet_size)
            .field("shards", &self.shards)
            .field("replicas", &self.replicas)
            .field("refresh_interval", &self.refresh_interval)
            .field("identifier_field", &self.identifier_field)
            .field("department_field", &self.department_field)
            .field("keyword_suffix", &self.keyword_suffix)
            .field("exact_fields", &self.exact_fields)
            .field("analyzed_fields", &self.analyzed_fields)
            .field("match_operator", &self.match_operator)
            .finish()
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            username: None,
            password: None,
            request_timeout_secs: 30,
            use_system_proxy: false,
            search_size: 10,
            facet_size: 10,
            shards: None,
            replicas: None,
            refresh_interval: None,
            identifier_field: "EmployeeID".to_string(),
            department_field: "Department".to_string(),
            keyword_suffix: ".keyword".to_string(),
            exact_fields: Vec::new(),
            analyzed_fields: Vec::new(),
            match_operator: None,
        }
    }
}

impl DirectoryConfig {
    /// Load from every source and validate.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let config = Self::resolve(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Merge every source without validating, so callers can apply
    /// their own overrides first.
    pub fn resolve(file: Option<&Path>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        // A missing .env is normal.
        dotenvy::dotenv().ok();

        config.apply_env(&EnvLoader::from_env(ENV_PREFIX))?;
        Ok(config)
    }

    /// Read a TOML or JSON file; unset keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        ConfigLoader::auto(path)?.load_file(path)
    }

    /// Override fields from `ROSTER_*` variables.
    pub fn apply_env(&mut self, env: &EnvLoader) -> Result<()> {
        if let Some(url) = env.get("url") {
            self.url = url;
        }
        if let Some(username) = env.get("username") {
            self.username = Some(username);
        }
        if let Some(password) = env.get("password") {
            self.password = Some(password);
        }
        if let Some(secs) = env.parse("request_timeout_secs")? {
            self.request_timeout_secs = secs;
        }
        if let Some(proxy) = env.parse("use_system_proxy")? {
            self.use_system_proxy = proxy;
        }
        if let Some(size) = env.parse("search_size")? {
            self.search_size = size;
        }
        if let Some(size) = env.parse("facet_size")? {
            self.facet_size = size;
        }
        if let Some(shards) = env.parse("shards")? {
            self.shards = Some(shards);
        }
        if let Some(replicas) = env.parse("replicas")? {
            self.replicas = Some(replicas);
        }
        if let Some(interval) = env.get("refresh_interval") {
            self.refresh_interval = Some(interval);
        }
        if let Some(field) = env.get("identifier_field") {
            self.identifier_field = field;
        }
        if let Some(field) = env.get("department_field") {
            self.department_field = field;
        }
        if let Some(suffix) = env.get("keyword_suffix") {
            self.keyword_suffix = suffix;
        }
        if let Some(fields) = env.list("exact_fields") {
            self.exact_fields = fields;
        }
        if let Some(fields) = env.list("analyzed_fields") {
            self.analyzed_fields = fields;
        }
        if let Some(operator) = env.get("match_operator") {
            self.match_operator = Some(operator);
        }
        Ok(())
    }

    /// Check the combined configuration.
    pub fn validate(&self) -> Result<()> {
        ConfigValidator::is_url(&self.url, "url")?;
        ConfigValidator::paired(&self.username, &self.password, ("username", "password"))?;
        ConfigValidator::non_zero(self.request_timeout_secs, "request_timeout_secs")?;
        ConfigValidator::non_zero(self.search_size, "search_size")?;
        ConfigValidator::non_zero(self.facet_size, "facet_size")?;
        ConfigValidator::not_empty(&self.identifier_field, "identifier_field")?;
        ConfigValidator::not_empty(&self.department_field, "department_field")?;

        if let Some(operator) = &self.match_operator {
            ConfigValidator::one_of(operator, &["and", "or"], "match_operator")?;
        }
        if let Some(interval) = &self.refresh_interval {
            ConfigValidator::not_empty(interval, "refresh_interval")?;
        }

        if let Some(field) = self
            .exact_fields
            .iter()
            .find(|f| self.analyzed_fields.contains(f))
        {
            return Err(ConfigError::Validation(format!(
                "{} is listed in both exact_fields and analyzed_fields",
                field
            )));
        }

        Ok(())
    }

    /// Connection settings for the search client.
    pub fn search_config(&self) -> SearchConfig {
        let mut config = SearchConfig::new(self.url.clone())
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs));

        if self.use_system_proxy {
            config = config.with_system_proxy();
        }

        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => config.with_basic_auth(user, pass),
            _ => config,
        }
    }

    /// Match policy described by this configuration.
    pub fn field_policy(&self) -> FieldPolicy {
        let mut policy = FieldPolicy::new()
            .with_keyword_suffix(self.keyword_suffix.clone())
            .with_department_field(self.department_field.clone());

        for field in &self.exact_fields {
            policy = policy.with_mode(field.clone(), MatchMode::Exact);
        }
        for field in &self.analyzed_fields {
            policy = policy.with_mode(field.clone(), MatchMode::Analyzed);
        }
        if let Some(operator) = &self.match_operator {
            policy = policy.with_match_operator(operator.clone());
        }

        policy.with_identifier_field(self.identifier_field.clone())
    }

    /// Settings applied when a collection is (re)created.
    pub fn index_settings(&self) -> IndexSettings {
        let mut settings = IndexSettings::new();
        if let Some(shards) = self.shards {
            settings = settings.shards(shards);
        }
        if let Some(replicas) = self.replicas {
            settings = settings.replicas(replicas);
        }
        if let Some(interval) = &self.refresh_interval {
            settings = settings.refresh_interval(interval.clone());
        }
        settings
    }
}
