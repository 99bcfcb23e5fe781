//! Record types shared by the clients and the batch commands.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// State transition requested on a DOI.
///
/// Omitting the event keeps (or creates) the DOI as a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Event {
    /// Findable: registered and indexed.
    Publish,
    /// Registered but not indexed.
    Register,
    /// Back from findable to registered.
    Hide,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Publish => "publish",
            Event::Register => "register",
            Event::Hide => "hide",
        }
    }
}

/// One CSV row of the `update-urls` command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UrlUpdate {
    pub doi: String,
    pub url: String,
}

/// One element of the `public-dois` input array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DoiRecord {
    /// DataCite attributes in JSON:API form (`titles`, `creators`, ...).
    pub metadata: Map<String, Value>,
    /// Landing page the DOI resolves to.
    pub url: String,
    /// Existing DOI to update. A new DOI is minted when absent.
    #[serde(default)]
    pub doi: Option<String>,
}

impl DoiRecord {
    /// Label used in reports: the DOI, or the URL for records still to be minted.
    pub fn label(&self) -> &str {
        self.doi.as_deref().unwrap_or(&self.url)
    }
}
