//! Client configuration and endpoint selection.

use std::time::Duration;

/// Production REST API.
pub const REST_URL: &str = "https://api.datacite.org/";
/// Sandbox REST API.
pub const REST_TEST_URL: &str = "https://api.test.datacite.org/";
/// Production Metadata Store (MDS) API.
pub const MDS_URL: &str = "https://mds.datacite.org/";
/// Sandbox Metadata Store (MDS) API.
pub const MDS_TEST_URL: &str = "https://mds.test.datacite.org/";

/// Default timeout for HTTP requests (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Which DataCite API a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Api {
    /// JSON:API `dois` endpoint.
    Rest,
    /// Metadata Store: `metadata`, `doi` and `media` endpoints.
    Mds,
}

/// Credentials and environment for a DataCite client.
///
/// Built once from command-line flags (or code) and handed to
/// [`RestClient::new`](crate::RestClient::new) or
/// [`MdsClient::new`](crate::MdsClient::new). Clients never mutate it.
#[derive(Clone)]
pub struct ClientConfig {
    pub username: String,
    pub password: String,
    /// DOI prefix owned by the account, e.g. `10.1234`.
    pub prefix: String,
    /// Use the sandbox endpoints instead of production.
    pub test_mode: bool,
    /// Explicit base URL, replacing the derived one.
    pub url: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration for the sandbox environment (the default).
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            prefix: prefix.into().trim_end_matches('/').to_string(),
            test_mode: true,
            url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Switch between sandbox (`true`) and production (`false`).
    pub fn test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Send requests to `url` instead of the DataCite host.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL for `api`, always ending with `/`.
    pub fn base_url(&self, api: Api) -> String {
        if let Some(url) = &self.url {
            return if url.ends_with('/') {
                url.clone()
            } else {
                format!("{}/", url)
            };
        }

        let url = match (api, self.test_mode) {
            (Api::Rest, true) => REST_TEST_URL,
            (Api::Rest, false) => REST_URL,
            (Api::Mds, true) => MDS_TEST_URL,
            (Api::Mds, false) => MDS_URL,
        };
        url.to_string()
    }
}

// Keeps the password out of logs and panic messages.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("prefix", &self.prefix)
            .field("test_mode", &self.test_mode)
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
