//! Metadata validation against the bundled DataCite JSON schemas.

use std::fmt;
use std::str::FromStr;

use jsonschema::Validator;
use serde_json::Value;

use crate::error::{SchemaError, ValidateError};

/// Supported DataCite metadata schema versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SchemaVersion {
    V3_1,
    V4_0,
    V4_1,
    V4_2,
    #[default]
    V4_3,
}

impl SchemaVersion {
    pub const ALL: [SchemaVersion; 5] = [
        SchemaVersion::V3_1,
        SchemaVersion::V4_0,
        SchemaVersion::V4_1,
        SchemaVersion::V4_2,
        SchemaVersion::V4_3,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V3_1 => "3.1",
            SchemaVersion::V4_0 => "4.0",
            SchemaVersion::V4_1 => "4.1",
            SchemaVersion::V4_2 => "4.2",
            SchemaVersion::V4_3 => "4.3",
        }
    }

    /// Raw JSON schema text, embedded at compile time.
    pub fn schema_source(&self) -> &'static str {
        match self {
            SchemaVersion::V3_1 => include_str!("../schemas/datacite-v3.1.json"),
            SchemaVersion::V4_0 => include_str!("../schemas/datacite-v4.0.json"),
            SchemaVersion::V4_1 => include_str!("../schemas/datacite-v4.1.json"),
            SchemaVersion::V4_2 => include_str!("../schemas/datacite-v4.2.json"),
            SchemaVersion::V4_3 => include_str!("../schemas/datacite-v4.3.json"),
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaVersion::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = SchemaVersion::ALL.iter().map(|v| v.as_str()).collect();
                format!(
                    "unknown schema version \"{}\": expected one of {}",
                    s,
                    known.join(", ")
                )
            })
    }
}

/// A compiled validator for one schema version.
///
/// Compile once, then check any number of records.
pub struct MetadataValidator {
    version: SchemaVersion,
    validator: Validator,
}

impl MetadataValidator {
    /// # Errors
    ///
    /// Returns `ValidateError::InvalidSchema` if the bundled schema does not
    /// parse or compile.
    pub fn new(version: SchemaVersion) -> Result<Self, ValidateError> {
        let invalid = |message: String| ValidateError::InvalidSchema {
            version: version.to_string(),
            message,
        };

        let schema: Value =
            serde_json::from_str(version.schema_source()).map_err(|e| invalid(e.to_string()))?;
        let validator = jsonschema::validator_for(&schema).map_err(|e| invalid(e.to_string()))?;

        Ok(Self { version, validator })
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Check `metadata`, reporting the first violated constraint.
    pub fn check(&self, metadata: &Value) -> Result<(), ValidateError> {
        match self.validator.iter_errors(metadata).next() {
            None => Ok(()),
            Some(e) => Err(ValidateError::Invalid(SchemaError {
                path: e.instance_path.to_string(),
                message: e.to_string(),
            })),
        }
    }

    pub fn is_valid(&self, metadata: &Value) -> bool {
        self.validator.is_valid(metadata)
    }
}

/// Validate `metadata` against `version` in one call.
///
/// Compiles the schema each time; use [`MetadataValidator`] for batches.
pub fn validate(metadata: &Value, version: SchemaVersion) -> Result<(), ValidateError> {
    MetadataValidator::new(version)?.check(metadata)
}
