//! HTTP polling of the earthquake feed.
//!
//! [`FeedClient`] fetches the GeoJSON document and hands it to
//! [`quakewatch_core::usgs::parse_feed`]. The [`RecordSource`] trait lets the
//! monitor loop run against a test double instead of the network.

use std::time::Duration;

use async_trait::async_trait;
use quakewatch_core::{usgs, CoreError, EventRecord};

/// HTTP request timeout for a single feed fetch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Error type for feed fetch failures.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("Feed request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The feed server returned a non-2xx status code.
    #[error("Feed returned HTTP {0}")]
    HttpStatus(u16),

    /// The body was not a usable feed document.
    #[error("Feed decode failed: {0}")]
    Decode(#[from] CoreError),
}

/// Anything that can produce one batch of records per polling cycle.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<EventRecord>, FeedError>;
}

/// Fetches earthquake records from a USGS-format GeoJSON feed.
pub struct FeedClient {
    client: reqwest::Client,
    url: String,
}

impl FeedClient {
    pub fn new(url: impl Into<String>) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RecordSource for FeedClient {
    async fn fetch(&self) -> Result<Vec<EventRecord>, FeedError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::HttpStatus(response.status().as_u16()));
        }

        let body = response.text().await?;
        let records = usgs::parse_feed(&body)?;

        tracing::debug!(url = %self.url, count = records.len(), "Fetched feed");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_keeps_url() {
        let client = FeedClient::new(usgs::USGS_ALL_DAY_FEED_URL).unwrap();
        assert_eq!(client.url(), usgs::USGS_ALL_DAY_FEED_URL);
    }

    #[test]
    fn feed_error_display_http_status() {
        assert_eq!(FeedError::HttpStatus(503).to_string(), "Feed returned HTTP 503");
    }

    #[test]
    fn feed_error_wraps_decode_failure() {
        let err = FeedError::from(usgs::parse_feed("not json").unwrap_err());
        assert!(err.to_string().starts_with("Feed decode failed"));
    }
}
