use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Guest record as returned by `GET <records-endpoint>/<id>`.
///
/// Every field is optional on the wire; validation into
/// [`crate::domain::GuestRecord`] happens at the boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuestRecordWire {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Kept loose: `null`, non-arrays and non-string entries are dropped
    /// during validation instead of failing the whole record.
    #[serde(default)]
    pub events: Value,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub include_address: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransliterateRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransliterateResponse {
    #[serde(default, rename = "hindiName")]
    pub hindi_name: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
