use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use shared::{
    domain::{GuestId, GuestRecord},
    error::{FailureCode, GuestRecordError, LookupFailure},
    protocol::GuestRecordWire,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::transliterate::{localized_name, NameTransliterator};

const API_KEY_HEADER: &str = "api_key";
const GUEST_QUERY_KEYS: [&str; 2] = ["guest", "id"];
const NOT_FOUND_NOTICE: &str =
    "We could not find your invitation details; showing the full celebration.";
const GENERIC_NOTICE: &str =
    "Something went wrong loading your invitation; showing the full celebration.";

#[derive(Debug, Error)]
pub enum GuestLookupError {
    #[error("guest {0} was not found")]
    NotFound(GuestId),
    #[error("guest lookup rejected with status {status}")]
    Status { status: u16 },
    #[error("guest lookup transport failure: {0}")]
    Network(#[from] reqwest::Error),
    #[error("guest record body is not valid json: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("guest record is malformed: {0}")]
    Malformed(#[from] GuestRecordError),
    #[error("invalid guest records endpoint '{0}'")]
    InvalidEndpoint(String),
}

impl GuestLookupError {
    pub fn code(&self) -> FailureCode {
        match self {
            Self::NotFound(_) => FailureCode::NotFound,
            Self::Status { status: 401 | 403 } => FailureCode::Unauthorized,
            Self::Status { .. } | Self::Network(_) => FailureCode::Network,
            Self::Decode(_) | Self::Malformed(_) => FailureCode::Malformed,
            Self::InvalidEndpoint(_) => FailureCode::Internal,
        }
    }

    /// Human-readable message shown in place of personalized content.
    pub fn notice(&self) -> &'static str {
        match self {
            Self::NotFound(_) => NOT_FOUND_NOTICE,
            _ => GENERIC_NOTICE,
        }
    }

    pub fn failure(&self) -> LookupFailure {
        LookupFailure::new(self.code(), self.notice())
    }
}

#[async_trait]
pub trait GuestDirectory: Send + Sync {
    async fn fetch(&self, guest_id: &GuestId) -> Result<GuestRecord, GuestLookupError>;
}

pub struct HttpGuestDirectory {
    http: Client,
    endpoint: Url,
    api_key: String,
}

impl HttpGuestDirectory {
    pub fn new(
        endpoint: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GuestLookupError> {
        let endpoint = Url::parse(endpoint.trim())
            .map_err(|_| GuestLookupError::InvalidEndpoint(endpoint.to_string()))?;
        if endpoint.cannot_be_a_base() {
            return Err(GuestLookupError::InvalidEndpoint(endpoint.to_string()));
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint,
            api_key: api_key.into(),
        })
    }

    fn record_url(&self, guest_id: &GuestId) -> Result<Url, GuestLookupError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| GuestLookupError::InvalidEndpoint(self.endpoint.to_string()))?
            .pop_if_empty()
            .push(&guest_id.0);
        Ok(url)
    }
}

#[async_trait]
impl GuestDirectory for HttpGuestDirectory {
    async fn fetch(&self, guest_id: &GuestId) -> Result<GuestRecord, GuestLookupError> {
        let response = self
            .http
            .get(self.record_url(guest_id)?)
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GuestLookupError::NotFound(guest_id.clone()));
        }
        if !response.status().is_success() {
            return Err(GuestLookupError::Status {
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await?;
        let wire: GuestRecordWire = serde_json::from_slice(&body)?;
        Ok(GuestRecord::try_from(wire)?)
    }
}

/// Personalization state carried by the sequencer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuestContext {
    /// No guest id was supplied; the page is generic by design.
    Absent,
    Pending,
    Loaded {
        record: GuestRecord,
        localized_name: Option<String>,
    },
    Unavailable(LookupFailure),
}

impl GuestContext {
    pub fn for_request(guest_id: Option<&GuestId>) -> Self {
        if guest_id.is_some() {
            Self::Pending
        } else {
            Self::Absent
        }
    }

    pub fn record(&self) -> Option<&GuestRecord> {
        match self {
            Self::Loaded { record, .. } => Some(record),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuestOutcome {
    Loaded {
        record: GuestRecord,
        localized_name: Option<String>,
    },
    Failed(LookupFailure),
}

impl From<GuestOutcome> for GuestContext {
    fn from(value: GuestOutcome) -> Self {
        match value {
            GuestOutcome::Loaded {
                record,
                localized_name,
            } => Self::Loaded {
                record,
                localized_name,
            },
            GuestOutcome::Failed(failure) => Self::Unavailable(failure),
        }
    }
}

/// Fetches the guest once and localizes the name; never fails.
pub async fn resolve_guest(
    directory: Arc<dyn GuestDirectory>,
    transliterator: Arc<dyn NameTransliterator>,
    guest_id: &GuestId,
) -> GuestOutcome {
    match directory.fetch(guest_id).await {
        Ok(record) => {
            let localized_name = localized_name(transliterator.as_ref(), &record.name).await;
            info!(
                guest_id = %guest_id,
                events = record.events.len(),
                localized = localized_name.is_some(),
                "guest: record loaded"
            );
            GuestOutcome::Loaded {
                record,
                localized_name,
            }
        }
        Err(err) => {
            warn!(
                guest_id = %guest_id,
                error = %err,
                "guest: lookup failed, continuing without personalization"
            );
            GuestOutcome::Failed(err.failure())
        }
    }
}

/// Extracts the guest id from the invitation link's query string.
pub fn guest_id_from_url(raw: &str) -> Result<Option<GuestId>, url::ParseError> {
    let url = Url::parse(raw.trim())?;
    for key in GUEST_QUERY_KEYS {
        if let Some(id) = url
            .query_pairs()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| GuestId::parse(&v))
        {
            return Ok(Some(id));
        }
    }
    Ok(None)
}

#[cfg(test)]
#[path = "tests/guest_tests.rs"]
mod tests;
