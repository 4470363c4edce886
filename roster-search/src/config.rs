//! Search client configuration.

use std::fmt;
use std::time::Duration;

/// Connection settings for a single search node.
#[derive(Clone)]
pub struct SearchConfig {
    /// Node URL, e.g. `http://localhost:9200`.
    pub url: String,
    /// Basic auth username.
    pub username: Option<String>,
    /// Basic auth password.
    pub password: Option<String>,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Bypass any system HTTP proxy.
    pub disable_proxy: bool,
}

impl SearchConfig {
    /// Create a configuration for one node.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
            request_timeout: Duration::from_secs(30),
            disable_proxy: true,
        }
    }

    /// Set basic authentication credentials.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Route requests through the system proxy.
    pub fn with_system_proxy(mut self) -> Self {
        self.disable_proxy = false;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new("http://localhost:9200")
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("request_timeout", &self.request_timeout)
            .field("disable_proxy", &self.disable_proxy)
            .finish()
    }
}
