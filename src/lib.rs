//! DataCite client
//!
//! A thin blocking client for the DataCite REST and Metadata Store (MDS)
//! APIs, plus the batch operations behind the `datacite` command-line tool.
//!
//! Every non-2xx response becomes exactly one [`ApiError`] variant chosen by
//! the status code; 2xx responses are never errors.
//!
//! # Example
//!
//! ```no_run
//! use datacite::{ClientConfig, RestClient};
//!
//! let config = ClientConfig::new("DATACITE.ACCOUNT", "secret", "10.1234");
//! let client = RestClient::new(&config)?;
//! client.update_url("10.1234/abc", "https://example.org/records/abc")?;
//! # Ok::<(), datacite::ApiError>(())
//! ```
//!
//! # Status mapping
//!
//! | Status | Error |
//! |--------|-------|
//! | 2xx | none, body returned |
//! | 400 | `BadRequest` |
//! | 401 | `Unauthorized` |
//! | 403 | `Forbidden` |
//! | 404 | `NotFound` |
//! | 410 | `Gone` |
//! | 412 | `PreconditionFailed` |
//! | 5xx | `ServerError` |
//! | other | `ClientError` |
//!
//! # Metadata validation
//!
//! ```
//! use datacite::{validate, SchemaVersion};
//! use serde_json::json;
//!
//! let metadata = json!({ "titles": [{ "title": "Untitled" }] });
//! assert!(validate(&metadata, SchemaVersion::V4_3).is_err());
//! ```

mod batch;
mod config;
mod error;
mod loader;
mod mds;
mod rest;
mod schema;
mod transport;
mod types;

pub use batch::{
    public_dois, update_urls, validate_records, BatchReport, Failure, FailurePolicy, Registrar,
};
pub use config::{
    Api, ClientConfig, DEFAULT_TIMEOUT, MDS_TEST_URL, MDS_URL, REST_TEST_URL, REST_URL,
};
pub use error::{check_status, ApiError, LoadError, SchemaError, ValidateError};
pub use loader::{load_doi_records, load_json, load_metadata, load_url_updates};
pub use mds::MdsClient;
pub use rest::RestClient;
pub use schema::{validate, MetadataValidator, SchemaVersion};
pub use transport::Dispatcher;
pub use types::{DoiRecord, Event, UrlUpdate};
