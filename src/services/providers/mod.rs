//! Stream Providers
//!
//! Each provider turns a [`QueryContext`] into the raw descriptors one
//! Stremio-style addon returns for it.
//!
//! - **Torrentio**: indexer list + debrid options in the path
//! - **AIOStreams**: opaque user config segment in the path, supports the
//!   anime catalog for episodes
//!
//! Providers never fail outward. Network, HTTP and decode problems are
//! logged, counted and turned into an empty contribution so one bad
//! provider cannot break aggregation.

pub mod aiostreams;
pub mod http;
pub mod torrentio;

#[cfg(test)]
pub(crate) mod test_support;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{ContentVariant, QueryContext, QueryError, RawDescriptor};
use crate::services::metrics;

// Re-exports for convenience
pub use aiostreams::{AioStreamsProvider, AioStreamsSettings};
pub use torrentio::{TorrentioProvider, TorrentioSettings};

/// A source of stream descriptors
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Provider label stamped on every record it contributes
    fn name(&self) -> &str;

    /// Fetch descriptors for one query and catalog variant
    ///
    /// Returns an empty list on any failure.
    async fn fetch(&self, ctx: &QueryContext, variant: ContentVariant) -> Vec<RawDescriptor>;
}

/// Provider failure, internal to the provider boundary
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("HTTP error: {0}")]
    Http(u16),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("empty response")]
    EmptyResponse,
    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),
    #[error("HTTP client error: {0}")]
    Client(String),
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] QueryError),
}

impl ProviderError {
    /// Metrics outcome label
    pub fn outcome(&self) -> &'static str {
        match self {
            ProviderError::Network(_) | ProviderError::Timeout | ProviderError::Client(_) => {
                "network_error"
            }
            ProviderError::Http(_) => "http_error",
            ProviderError::Decode(_) => "decode_error",
            ProviderError::EmptyResponse => "empty",
            ProviderError::MissingCredentials(_) | ProviderError::InvalidQuery(_) => "skipped",
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if let Some(status) = err.status() {
            ProviderError::Http(status.as_u16())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

/// Settle a provider result at the boundary: log, count, and drop the error
pub(crate) fn settle(
    provider: &str,
    result: Result<Vec<RawDescriptor>, ProviderError>,
) -> Vec<RawDescriptor> {
    match result {
        Ok(descriptors) => {
            debug!("[{}] Received {} descriptors", provider, descriptors.len());
            let outcome = if descriptors.is_empty() { "empty" } else { "ok" };
            metrics::record_provider_outcome(provider, outcome);
            descriptors
        }
        Err(err) => {
            match &err {
                ProviderError::EmptyResponse
                | ProviderError::MissingCredentials(_)
                | ProviderError::InvalidQuery(_) => {
                    debug!("[{}] No streams: {}", provider, err)
                }
                _ => warn!("[{}] Request failed: {}", provider, err),
            }
            metrics::record_provider_outcome(provider, err.outcome());
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(ProviderError::Timeout.outcome(), "network_error");
        assert_eq!(ProviderError::Http(503).outcome(), "http_error");
        assert_eq!(ProviderError::Decode("x".into()).outcome(), "decode_error");
        assert_eq!(ProviderError::MissingCredentials("config").outcome(), "skipped");
        assert_eq!(
            ProviderError::from(QueryError::MissingIdentifier).outcome(),
            "skipped"
        );
    }

    #[test]
    fn test_settle_swallows_errors() {
        assert!(settle("Torrentio", Err(ProviderError::Http(500))).is_empty());

        let ok = settle("Torrentio", Ok(vec![RawDescriptor::default()]));
        assert_eq!(ok.len(), 1);
    }

    #[test]
    fn test_settle_counts_empty_success_as_empty() {
        let provider = "SettleEmptyCounter";
        assert!(settle(provider, Ok(Vec::new())).is_empty());
        assert_eq!(
            metrics::PROVIDER_REQUESTS
                .with_label_values(&[provider, "empty"])
                .get(),
            1
        );
        assert_eq!(
            metrics::PROVIDER_REQUESTS
                .with_label_values(&[provider, "ok"])
                .get(),
            0
        );
    }
}
