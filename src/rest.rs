//! Client for the DataCite REST API (`dois` endpoint, JSON:API bodies).

use serde_json::{json, Map, Value};
use tracing::info;

use crate::config::{Api, ClientConfig};
use crate::error::ApiError;
use crate::transport::Dispatcher;
use crate::types::Event;

const JSON_API: &str = "application/vnd.api+json";

/// DataCite REST client bound to one account and prefix.
#[derive(Debug)]
pub struct RestClient {
    dispatcher: Dispatcher,
    prefix: String,
}

impl RestClient {
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            dispatcher: Dispatcher::new(config, Api::Rest)?,
            prefix: config.prefix.clone(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Qualify `doi` with the configured prefix.
    ///
    /// A bare suffix (no `/`) gets the prefix prepended. A DOI under any
    /// other prefix is rejected.
    pub fn check_doi(&self, doi: &str) -> Result<String, ApiError> {
        match doi.split_once('/') {
            None => Ok(format!("{}/{}", self.prefix, doi)),
            Some((prefix, _)) if prefix == self.prefix => Ok(doi.to_string()),
            Some(_) => Err(ApiError::PrefixMismatch {
                doi: doi.to_string(),
                prefix: self.prefix.clone(),
            }),
        }
    }

    /// Landing page URL registered for `doi`.
    pub fn get_doi(&self, doi: &str) -> Result<String, ApiError> {
        let attributes = self.get_metadata(doi)?;
        attributes
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                self.unexpected(&format!("dois/{}", doi), "missing data.attributes.url")
            })
    }

    /// All attributes DataCite stores for `doi`.
    pub fn get_metadata(&self, doi: &str) -> Result<Map<String, Value>, ApiError> {
        let path = format!("dois/{}", doi);
        let body = self.dispatcher.get(&path, Some(JSON_API))?;
        self.attributes(&path, &body)
    }

    /// Content URLs registered for `doi`; empty when none are set.
    pub fn get_media(&self, doi: &str) -> Result<Vec<String>, ApiError> {
        let attributes = self.get_metadata(doi)?;
        Ok(match attributes.get("contentUrl") {
            Some(Value::Array(urls)) => urls
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(url)) => vec![url.clone()],
            _ => Vec::new(),
        })
    }

    /// Create a DOI from raw attributes and return its identifier.
    pub fn post_doi(&self, attributes: Map<String, Value>) -> Result<String, ApiError> {
        let body = self.dispatcher.post("dois", envelope(attributes), JSON_API)?;
        let response = parse_json(&self.dispatcher.url("dois"), &body)?;
        response
            .pointer("/data/id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| self.unexpected("dois", "missing data.id"))
    }

    /// Replace attributes of an existing DOI and return the stored attributes.
    pub fn put_doi(
        &self,
        doi: &str,
        attributes: Map<String, Value>,
    ) -> Result<Map<String, Value>, ApiError> {
        let path = format!("dois/{}", doi);
        let body = self.dispatcher.put(&path, envelope(attributes), JSON_API)?;
        self.attributes(&path, &body)
    }

    /// Create a draft DOI. Without `doi` DataCite mints a suffix under the prefix.
    pub fn draft_doi(
        &self,
        metadata: Option<Map<String, Value>>,
        doi: Option<&str>,
    ) -> Result<String, ApiError> {
        let mut attributes = metadata.unwrap_or_default();
        match doi {
            Some(doi) => {
                let doi = self.check_doi(doi)?;
                attributes.insert("doi".into(), json!(doi));
            }
            None => {
                attributes.insert("prefix".into(), json!(self.prefix));
            }
        }
        self.post_doi(attributes)
    }

    /// Point `doi` at a new landing page.
    pub fn update_url(&self, doi: &str, url: &str) -> Result<Map<String, Value>, ApiError> {
        let doi = self.check_doi(doi)?;
        let mut attributes = Map::new();
        attributes.insert("url".into(), json!(url));
        info!(%doi, %url, "updating url");
        self.put_doi(&doi, attributes)
    }

    /// Update metadata and/or URL of `doi` without changing its state.
    pub fn update_doi(
        &self,
        doi: &str,
        metadata: Option<Map<String, Value>>,
        url: Option<&str>,
    ) -> Result<Map<String, Value>, ApiError> {
        let doi = self.check_doi(doi)?;
        let mut attributes = metadata.unwrap_or_default();
        if let Some(url) = url {
            attributes.insert("url".into(), json!(url));
        }
        self.put_doi(&doi, attributes)
    }

    /// Register `doi` without making it findable.
    pub fn private_doi(
        &self,
        metadata: Map<String, Value>,
        url: &str,
        doi: Option<&str>,
    ) -> Result<String, ApiError> {
        self.with_event(metadata, url, doi, Event::Register)
    }

    /// Publish a findable DOI, minting one when `doi` is `None`.
    pub fn public_doi(
        &self,
        metadata: Map<String, Value>,
        url: &str,
        doi: Option<&str>,
    ) -> Result<String, ApiError> {
        self.with_event(metadata, url, doi, Event::Publish)
    }

    /// Move a findable DOI back to registered.
    pub fn hide_doi(&self, doi: &str) -> Result<Map<String, Value>, ApiError> {
        self.event_only(doi, Event::Hide)
    }

    /// Make a registered DOI findable again.
    pub fn show_doi(&self, doi: &str) -> Result<Map<String, Value>, ApiError> {
        self.event_only(doi, Event::Publish)
    }

    /// Delete a draft DOI. Registered or findable DOIs cannot be deleted.
    pub fn delete_doi(&self, doi: &str) -> Result<(), ApiError> {
        let doi = self.check_doi(doi)?;
        self.dispatcher.delete(&format!("dois/{}", doi))?;
        Ok(())
    }

    fn with_event(
        &self,
        mut metadata: Map<String, Value>,
        url: &str,
        doi: Option<&str>,
        event: Event,
    ) -> Result<String, ApiError> {
        metadata.insert("event".into(), json!(event.as_str()));
        metadata.insert("url".into(), json!(url));

        match doi {
            None => {
                metadata.insert("prefix".into(), json!(self.prefix));
                self.post_doi(metadata)
            }
            Some(doi) => {
                let doi = self.check_doi(doi)?;
                metadata.insert("doi".into(), json!(doi));
                self.put_doi(&doi, metadata)?;
                Ok(doi)
            }
        }
    }

    fn event_only(&self, doi: &str, event: Event) -> Result<Map<String, Value>, ApiError> {
        let doi = self.check_doi(doi)?;
        let mut attributes = Map::new();
        attributes.insert("event".into(), json!(event.as_str()));
        self.put_doi(&doi, attributes)
    }

    fn attributes(&self, path: &str, body: &str) -> Result<Map<String, Value>, ApiError> {
        let response = parse_json(&self.dispatcher.url(path), body)?;
        match response.pointer("/data/attributes") {
            Some(Value::Object(attributes)) => Ok(attributes.clone()),
            _ => Err(self.unexpected(path, "missing data.attributes")),
        }
    }

    fn unexpected(&self, path: &str, message: &str) -> ApiError {
        ApiError::UnexpectedResponse {
            url: self.dispatcher.url(path),
            message: message.to_string(),
        }
    }
}

fn envelope(attributes: Map<String, Value>) -> String {
    json!({
        "data": {
            "type": "dois",
            "attributes": attributes
        }
    })
    .to_string()
}

fn parse_json(url: &str, body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::UnexpectedResponse {
        url: url.to_string(),
        message: format!("invalid JSON: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RestClient {
        let config =
            ClientConfig::new("user", "secret", "10.1234").url("http://localhost:9999");
        RestClient::new(&config).unwrap()
    }

    #[test]
    fn trailing_slash_is_trimmed_from_prefix() {
        let config = ClientConfig::new("user", "secret", "10.1234/").url("http://localhost:9999");
        let client = RestClient::new(&config).unwrap();
        assert_eq!(client.prefix(), "10.1234");
        assert_eq!(client.check_doi("abc").unwrap(), "10.1234/abc");
    }

    #[test]
    fn check_doi_prepends_prefix_to_suffix() {
        assert_eq!(client().check_doi("abc-123").unwrap(), "10.1234/abc-123");
    }

    #[test]
    fn check_doi_keeps_matching_prefix() {
        assert_eq!(client().check_doi("10.1234/abc").unwrap(), "10.1234/abc");
    }

    #[test]
    fn check_doi_rejects_other_prefix() {
        let err = client().check_doi("10.9999/abc").unwrap_err();
        assert!(matches!(err, ApiError::PrefixMismatch { .. }));
    }

    #[test]
    fn check_doi_rejects_prefix_that_only_starts_the_same() {
        let err = client().check_doi("10.12345/abc").unwrap_err();
        assert!(matches!(err, ApiError::PrefixMismatch { .. }));
    }

    #[test]
    fn envelope_wraps_attributes() {
        let mut attributes = Map::new();
        attributes.insert("url".into(), json!("https://example.org"));
        let body: Value = serde_json::from_str(&envelope(attributes)).unwrap();
        assert_eq!(body["data"]["type"], "dois");
        assert_eq!(body["data"]["attributes"]["url"], "https://example.org");
    }
}
