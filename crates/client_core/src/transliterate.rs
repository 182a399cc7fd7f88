use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{TransliterateRequest, TransliterateResponse};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TransliterationError {
    #[error("transliteration transport failure: {0}")]
    Http(#[from] reqwest::Error),
    #[error("transliteration rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("transliteration returned an empty name")]
    Empty,
}

#[async_trait]
pub trait NameTransliterator: Send + Sync {
    async fn transliterate(&self, name: &str) -> Result<String, TransliterationError>;
}

/// Used when no transliteration endpoint is configured.
pub struct PassthroughTransliterator;

#[async_trait]
impl NameTransliterator for PassthroughTransliterator {
    async fn transliterate(&self, name: &str) -> Result<String, TransliterationError> {
        Ok(name.to_string())
    }
}

pub struct HttpNameTransliterator {
    http: Client,
    endpoint: String,
}

impl HttpNameTransliterator {
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransliterationError> {
        Ok(Self {
            http: Client::builder().timeout(timeout).build()?,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl NameTransliterator for HttpNameTransliterator {
    async fn transliterate(&self, name: &str) -> Result<String, TransliterationError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&TransliterateRequest {
                name: name.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        let body: TransliterateResponse = response.json().await?;
        if !status.is_success() {
            return Err(TransliterationError::Rejected {
                status: status.as_u16(),
                message: body.error.unwrap_or_default(),
            });
        }

        body.hindi_name
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(TransliterationError::Empty)
    }
}

/// Returns the transliterated name, or `None` when it is unavailable or
/// identical to the input. The caller keeps showing the original name.
pub async fn localized_name(
    transliterator: &dyn NameTransliterator,
    name: &str,
) -> Option<String> {
    match transliterator.transliterate(name).await {
        Ok(localized) if localized != name => Some(localized),
        Ok(_) => None,
        Err(err) => {
            debug!(error = %err, "transliterate: falling back to original name");
            None
        }
    }
}
