use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCode {
    NotFound,
    Unauthorized,
    Network,
    Malformed,
    Internal,
}

/// Serializable summary of a failed guest lookup, shown to the guest as a
/// short notice while the page falls back to generic content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupFailure {
    pub code: FailureCode,
    pub message: String,
}

impl LookupFailure {
    pub fn new(code: FailureCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn notice(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuestRecordError {
    #[error("guest record is missing an id")]
    MissingId,
    #[error("guest record {id} is missing a name")]
    MissingName { id: String },
}

