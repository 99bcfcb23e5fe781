//! Authenticated HTTP round-trips against a DataCite base URL.

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Url};
use tracing::debug;

use crate::config::{Api, ClientConfig};
use crate::error::{check_status, ApiError};

/// Sends one request per call with basic auth and maps the response status.
///
/// No retries and no batching; connection reuse is whatever the
/// underlying `reqwest` client does by default.
pub struct Dispatcher {
    http: Client,
    base_url: Url,
    username: String,
    password: String,
}

impl Dispatcher {
    /// Build a dispatcher for `api` using the credentials in `config`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the base URL cannot carry a path,
    /// and `ApiError::Transport` if the HTTP client cannot be built
    /// (e.g. TLS backend initialisation fails).
    pub fn new(config: &ClientConfig, api: Api) -> Result<Self, ApiError> {
        let raw = config.base_url(api);
        let base_url = match Url::parse(&raw) {
            Ok(url) if !url.cannot_be_a_base() => url,
            Ok(_) => {
                return Err(ApiError::InvalidUrl {
                    url: raw,
                    message: "cannot be used as a base URL".to_string(),
                })
            }
            Err(e) => {
                return Err(ApiError::InvalidUrl {
                    url: raw,
                    message: e.to_string(),
                })
            }
        };
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("datacite/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ApiError::Transport { url: raw, source })?;

        Ok(Self {
            http,
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Absolute URL for an endpoint path relative to the base URL.
    ///
    /// `/` separates segments; every other reserved character is
    /// percent-encoded, so a DOI suffix containing `#`, `?` or `%` stays
    /// inside its own path segment.
    pub fn url(&self, path: &str) -> String {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        url.to_string()
    }

    pub fn get(&self, path: &str, accept: Option<&str>) -> Result<String, ApiError> {
        self.send(Method::GET, path, None, accept)
    }

    pub fn post(&self, path: &str, body: String, content_type: &str) -> Result<String, ApiError> {
        self.send(Method::POST, path, Some((body, content_type)), None)
    }

    pub fn put(&self, path: &str, body: String, content_type: &str) -> Result<String, ApiError> {
        self.send(Method::PUT, path, Some((body, content_type)), None)
    }

    pub fn delete(&self, path: &str) -> Result<String, ApiError> {
        self.send(Method::DELETE, path, None, None)
    }

    fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<(String, &str)>,
        accept: Option<&str>,
    ) -> Result<String, ApiError> {
        let url = self.url(path);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .basic_auth(&self.username, Some(&self.password));
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }
        if let Some((body, content_type)) = body {
            request = request.header(CONTENT_TYPE, content_type).body(body);
        }

        let response = request.send().map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;
        let status = response.status().as_u16();
        let text = response.text().map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;

        debug!(%method, %url, status, "datacite response");
        check_status(status, text)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
