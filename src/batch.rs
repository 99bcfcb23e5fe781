//! Sequential batch commands: one request (or validation) per record.
//!
//! Records are processed in input order. With [`FailurePolicy::Continue`]
//! every record is attempted and failures are collected; with
//! [`FailurePolicy::FailFast`] the first failure stops the batch and the
//! remaining records are never sent.

use serde_json::Value;
use tracing::{info, warn};

use crate::error::{ApiError, SchemaError, ValidateError};
use crate::rest::RestClient;
use crate::schema::MetadataValidator;
use crate::types::{DoiRecord, UrlUpdate};

/// What the command layer needs from a DataCite client.
pub trait Registrar {
    fn update_url(&self, doi: &str, url: &str) -> Result<(), ApiError>;

    /// Publish `record`, returning the DOI it ended up with.
    fn public_doi(&self, record: &DoiRecord) -> Result<String, ApiError>;
}

impl Registrar for RestClient {
    fn update_url(&self, doi: &str, url: &str) -> Result<(), ApiError> {
        RestClient::update_url(self, doi, url).map(|_| ())
    }

    fn public_doi(&self, record: &DoiRecord) -> Result<String, ApiError> {
        RestClient::public_doi(
            self,
            record.metadata.clone(),
            &record.url,
            record.doi.as_deref(),
        )
    }
}

/// How a batch reacts to a failed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Attempt every record and report all failures at the end.
    #[default]
    Continue,
    /// Stop at the first failure.
    FailFast,
}

/// A record that did not go through.
#[derive(Debug)]
pub struct Failure<E> {
    /// Zero-based position in the input.
    pub index: usize,
    pub label: String,
    pub error: E,
}

/// Outcome of a batch run.
#[derive(Debug)]
pub struct BatchReport<E = ApiError> {
    /// Number of records in the input.
    pub total: usize,
    /// Labels of the records that succeeded, in input order.
    pub succeeded: Vec<String>,
    pub failures: Vec<Failure<E>>,
    /// The batch stopped early under [`FailurePolicy::FailFast`].
    pub aborted: bool,
}

impl<E> BatchReport<E> {
    fn new(total: usize) -> Self {
        Self {
            total,
            succeeded: Vec::new(),
            failures: Vec::new(),
            aborted: false,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Records never attempted because the batch aborted.
    pub fn skipped(&self) -> usize {
        self.total - self.succeeded.len() - self.failures.len()
    }

    /// Record one outcome. Returns `false` when the batch must stop.
    fn push(
        &mut self,
        index: usize,
        label: String,
        result: Result<(), E>,
        policy: FailurePolicy,
    ) -> bool
    where
        E: std::fmt::Display,
    {
        match result {
            Ok(()) => {
                info!(index, %label, "record done");
                self.succeeded.push(label);
                true
            }
            Err(error) => {
                warn!(index, %label, %error, "record failed");
                self.failures.push(Failure { index, label, error });
                if policy == FailurePolicy::FailFast {
                    self.aborted = true;
                    false
                } else {
                    true
                }
            }
        }
    }
}

/// Point each DOI at its new URL, one `update_url` call per row.
pub fn update_urls<R: Registrar + ?Sized>(
    registrar: &R,
    rows: &[UrlUpdate],
    policy: FailurePolicy,
) -> BatchReport {
    let mut report = BatchReport::new(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let result = registrar.update_url(&row.doi, &row.url);
        if !report.push(index, row.doi.clone(), result, policy) {
            break;
        }
    }
    report
}

/// Publish each record, one `public_doi` call per record.
///
/// Succeeded labels are the DOIs DataCite returned, so minted DOIs show up
/// in the report.
pub fn public_dois<R: Registrar + ?Sized>(
    registrar: &R,
    records: &[DoiRecord],
    policy: FailurePolicy,
) -> BatchReport {
    let mut report = BatchReport::new(records.len());
    for (index, record) in records.iter().enumerate() {
        let (label, result) = match registrar.public_doi(record) {
            Ok(doi) => (doi, Ok(())),
            Err(e) => (record.label().to_string(), Err(e)),
        };
        if !report.push(index, label, result, policy) {
            break;
        }
    }
    report
}

/// Validate every record. Invalid records never stop the batch.
pub fn validate_records(
    validator: &MetadataValidator,
    records: &[Value],
) -> Result<BatchReport<SchemaError>, ValidateError> {
    let mut report = BatchReport::new(records.len());
    for (index, record) in records.iter().enumerate() {
        let label = format!("record {}", index + 1);
        let result = match validator.check(record) {
            Ok(()) => Ok(()),
            Err(ValidateError::Invalid(e)) => Err(e),
            Err(e) => return Err(e),
        };
        report.push(index, label, result, FailurePolicy::Continue);
    }
    Ok(report)
}
