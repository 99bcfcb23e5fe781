//! Client for the DataCite Metadata Store (MDS) API.
//!
//! MDS speaks XML for metadata and `key=value` plain text for DOIs and
//! media, so bodies are passed through as strings.

use crate::config::{Api, ClientConfig};
use crate::error::ApiError;
use crate::transport::Dispatcher;

const XML: &str = "application/xml";
const XML_UTF8: &str = "application/xml;charset=UTF-8";
const TEXT_UTF8: &str = "text/plain;charset=UTF-8";

/// DataCite MDS client bound to one account.
#[derive(Debug)]
pub struct MdsClient {
    dispatcher: Dispatcher,
}

impl MdsClient {
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            dispatcher: Dispatcher::new(config, Api::Mds)?,
        })
    }

    /// URL the DOI resolves to.
    pub fn doi_get(&self, doi: &str) -> Result<String, ApiError> {
        self.dispatcher.get(&format!("doi/{}", doi), None)
    }

    /// Mint `doi` (or move it) to `url`. Metadata must be posted first.
    pub fn doi_post(&self, doi: &str, url: &str) -> Result<String, ApiError> {
        let body = format!("doi={}\nurl={}", doi, url);
        self.dispatcher.post("doi", body, TEXT_UTF8)
    }

    /// All DOIs of the account, one per line. Empty when there are none.
    pub fn doi_list(&self) -> Result<Vec<String>, ApiError> {
        let body = self.dispatcher.get("doi", None)?;
        Ok(body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Most recent metadata XML for `doi`.
    pub fn metadata_get(&self, doi: &str) -> Result<String, ApiError> {
        self.dispatcher
            .get(&format!("metadata/{}", doi), Some(XML))
    }

    /// Store a new metadata version. The DOI is taken from the XML.
    pub fn metadata_post(&self, metadata: &str) -> Result<String, ApiError> {
        self.dispatcher
            .post("metadata", metadata.to_string(), XML_UTF8)
    }

    /// Mark the metadata of `doi` inactive.
    pub fn metadata_delete(&self, doi: &str) -> Result<String, ApiError> {
        self.dispatcher.delete(&format!("metadata/{}", doi))
    }

    /// `(mime type, url)` pairs registered for `doi`, in server order.
    pub fn media_get(&self, doi: &str) -> Result<Vec<(String, String)>, ApiError> {
        let path = format!("media/{}", doi);
        let body = self.dispatcher.get(&path, None)?;
        parse_media(&body).ok_or_else(|| ApiError::UnexpectedResponse {
            url: self.dispatcher.url(&path),
            message: "media lines must be mime=url".to_string(),
        })
    }

    /// Register media files for `doi`.
    pub fn media_post(&self, doi: &str, media: &[(String, String)]) -> Result<String, ApiError> {
        let body = media
            .iter()
            .map(|(mime, url)| format!("{}={}", mime, url))
            .collect::<Vec<_>>()
            .join("\n");
        self.dispatcher
            .post(&format!("media/{}", doi), body, TEXT_UTF8)
    }
}

fn parse_media(body: &str) -> Option<Vec<(String, String)>> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.split_once('=')
                .map(|(mime, url)| (mime.trim().to_string(), url.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_media_lines() {
        let media = parse_media("application/json=http://example.org/a.json\ntext/plain=http://example.org/a.txt\n")
            .unwrap();
        assert_eq!(
            media,
            vec![
                ("application/json".to_string(), "http://example.org/a.json".to_string()),
                ("text/plain".to_string(), "http://example.org/a.txt".to_string()),
            ]
        );
    }

    #[test]
    fn parse_media_rejects_lines_without_separator() {
        assert!(parse_media("application/json").is_none());
    }

    #[test]
    fn parse_media_empty_body() {
        assert_eq!(parse_media("").unwrap(), Vec::new());
    }
}
