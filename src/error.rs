//! Error types for DataCite requests, input loading and metadata validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the REST and MDS clients.
///
/// Every non-2xx response becomes exactly one of the HTTP variants, each
/// keeping the response body. [`ApiError::status`] recovers the status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {body}")]
    BadRequest { body: String },

    #[error("unauthorized: {body}")]
    Unauthorized { body: String },

    #[error("forbidden: {body}")]
    Forbidden { body: String },

    #[error("not found: {body}")]
    NotFound { body: String },

    #[error("gone: {body}")]
    Gone { body: String },

    #[error("precondition failed: {body}")]
    PreconditionFailed { body: String },

    #[error("server error ({status}): {body}")]
    ServerError { status: u16, body: String },

    #[error("client error ({status}): {body}")]
    ClientError { status: u16, body: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid base URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("unexpected response from {url}: {message}")]
    UnexpectedResponse { url: String, message: String },

    #[error("DOI {doi} does not belong to prefix {prefix}")]
    PrefixMismatch { doi: String, prefix: String },
}

impl ApiError {
    /// HTTP status that produced this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Gone { .. } => Some(410),
            Self::PreconditionFailed { .. } => Some(412),
            Self::ServerError { status, .. } | Self::ClientError { status, .. } => Some(*status),
            Self::Transport { .. }
            | Self::InvalidUrl { .. }
            | Self::UnexpectedResponse { .. }
            | Self::PrefixMismatch { .. } => None,
        }
    }

    /// Response body carried by an HTTP error.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::BadRequest { body }
            | Self::Unauthorized { body }
            | Self::Forbidden { body }
            | Self::NotFound { body }
            | Self::Gone { body }
            | Self::PreconditionFailed { body }
            | Self::ServerError { body, .. }
            | Self::ClientError { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Transport { .. } => 3, // IO
            Self::PrefixMismatch { .. } | Self::InvalidUrl { .. } => 2,
            _ => 1,
        }
    }
}

/// Map an HTTP status and body to a result.
///
/// 2xx passes the body through untouched. Anything else yields one error
/// variant, chosen only by the status code.
pub fn check_status(status: u16, body: String) -> Result<String, ApiError> {
    match status {
        200..=299 => Ok(body),
        400 => Err(ApiError::BadRequest { body }),
        401 => Err(ApiError::Unauthorized { body }),
        403 => Err(ApiError::Forbidden { body }),
        404 => Err(ApiError::NotFound { body }),
        410 => Err(ApiError::Gone { body }),
        412 => Err(ApiError::PreconditionFailed { body }),
        500..=599 => Err(ApiError::ServerError { status, body }),
        _ => Err(ApiError::ClientError { status, body }),
    }
}

/// Errors while loading CSV or JSON input files.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid CSV in {path}: {source}")]
    InvalidCsv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid record {index} in {path}: {message}")]
    InvalidRecord {
        path: PathBuf,
        index: usize,
        message: String,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors during metadata validation.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("invalid bundled schema for version {version}: {message}")]
    InvalidSchema { version: String, message: String },

    #[error("metadata does not match schema: {0}")]
    Invalid(SchemaError),
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::InvalidSchema { .. } => 2,
            ValidateError::Invalid(_) => 1,
        }
    }
}

/// Single validation error with path context.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SchemaError {
    /// JSON Pointer (RFC 6901) to the invalid field.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_passes_body_through() {
        let body = "<resource></resource>".to_string();
        assert_eq!(check_status(200, body.clone()).unwrap(), body);
        assert_eq!(check_status(201, "OK".into()).unwrap(), "OK");
        assert_eq!(check_status(204, String::new()).unwrap(), "");
    }

    #[test]
    fn documented_statuses_map_to_one_variant() {
        assert!(matches!(
            check_status(400, "x".into()),
            Err(ApiError::BadRequest { .. })
        ));
        assert!(matches!(
            check_status(401, "x".into()),
            Err(ApiError::Unauthorized { .. })
        ));
        assert!(matches!(
            check_status(403, "x".into()),
            Err(ApiError::Forbidden { .. })
        ));
        assert!(matches!(
            check_status(404, "x".into()),
            Err(ApiError::NotFound { .. })
        ));
        assert!(matches!(
            check_status(410, "x".into()),
            Err(ApiError::Gone { .. })
        ));
        assert!(matches!(
            check_status(412, "x".into()),
            Err(ApiError::PreconditionFailed { .. })
        ));
    }

    #[test]
    fn every_5xx_is_server_error() {
        for status in [500, 502, 503, 599] {
            match check_status(status, "down".into()) {
                Err(ApiError::ServerError { status: s, body }) => {
                    assert_eq!(s, status);
                    assert_eq!(body, "down");
                }
                other => panic!("expected ServerError for {status}, got {other:?}"),
            }
        }
    }

    #[test]
    fn other_statuses_are_client_errors() {
        for status in [302, 405, 409, 422, 429] {
            assert!(matches!(
                check_status(status, String::new()),
                Err(ApiError::ClientError { status: s, .. }) if s == status
            ));
        }
    }

    #[test]
    fn status_round_trips_through_error() {
        for status in [400, 401, 403, 404, 410, 412, 418, 500, 503] {
            let err = check_status(status, "body".into()).unwrap_err();
            assert_eq!(err.status(), Some(status));
            assert_eq!(err.body(), Some("body"));
        }
    }

    #[test]
    fn mapping_is_deterministic() {
        let first = check_status(404, "a".into()).unwrap_err().to_string();
        let second = check_status(404, "a".into()).unwrap_err().to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("rows.csv"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = LoadError::InvalidRecord {
            path: PathBuf::from("records.json"),
            index: 2,
            message: "missing field `url`".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn api_error_exit_codes() {
        assert_eq!(check_status(404, String::new()).unwrap_err().exit_code(), 1);
        let err = ApiError::PrefixMismatch {
            doi: "10.9999/1".into(),
            prefix: "10.1234".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn schema_error_display() {
        let err = SchemaError {
            path: "/creators/0".into(),
            message: "\"name\" is a required property".into(),
        };
        assert_eq!(
            err.to_string(),
            "/creators/0: \"name\" is a required property"
        );

        let root = SchemaError {
            path: String::new(),
            message: "\"titles\" is a required property".into(),
        };
        assert_eq!(root.to_string(), "\"titles\" is a required property");
    }
}
