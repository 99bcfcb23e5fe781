//! Input loading for the batch commands.
//!
//! Everything is read and parsed up front so a malformed file stops the
//! run before any request is sent.

use std::path::Path;

use serde_json::Value;

use crate::error::LoadError;
use crate::types::{json_type_name, DoiRecord, UrlUpdate};

/// Load a JSON document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid JSON.
pub fn load_json(path: &Path) -> Result<Value, LoadError> {
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|source| LoadError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `doi,url` rows from a CSV file with a header line.
///
/// Columns other than `doi` and `url` are ignored; surrounding whitespace
/// is trimmed.
pub fn load_url_updates(path: &Path) -> Result<Vec<UrlUpdate>, LoadError> {
    let content = read(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    reader
        .deserialize::<UrlUpdate>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| LoadError::InvalidCsv {
            path: path.to_path_buf(),
            source,
        })
}

/// Load the JSON array of records for `public-dois`.
pub fn load_doi_records(path: &Path) -> Result<Vec<DoiRecord>, LoadError> {
    let items = match load_json(path)? {
        Value::Array(items) => items,
        other => {
            return Err(LoadError::InvalidRecord {
                path: path.to_path_buf(),
                index: 0,
                message: format!("expected array of records, got {}", json_type_name(&other)),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|e| LoadError::InvalidRecord {
                path: path.to_path_buf(),
                index,
                message: e.to_string(),
            })
        })
        .collect()
}

/// Load metadata documents to validate: a single object or an array of them.
pub fn load_metadata(path: &Path) -> Result<Vec<Value>, LoadError> {
    match load_json(path)? {
        Value::Array(items) => Ok(items),
        obj @ Value::Object(_) => Ok(vec![obj]),
        other => Err(LoadError::InvalidRecord {
            path: path.to_path_buf(),
            index: 0,
            message: format!("expected object or array, got {}", json_type_name(&other)),
        }),
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    if !path.is_file() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })
}
