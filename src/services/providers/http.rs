//! Shared HTTP plumbing for addon providers
//!
//! One bounded client per provider, browser-like headers (some addon hosts
//! reject unknown clients), and tolerant decoding of the streams envelope.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, warn};

use super::ProviderError;
use crate::models::{RawDescriptor, StreamsEnvelope};

/// Default connect/read bound for provider requests
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36";
const STREMIO_ORIGIN: &str = "https://web.stremio.com";
const STREMIO_REFERER: &str = "https://web.stremio.com/";

/// Longest body excerpt written to logs
const BODY_PREVIEW_CHARS: usize = 500;

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(header::ORIGIN, HeaderValue::from_static(STREMIO_ORIGIN));
    headers.insert(header::REFERER, HeaderValue::from_static(STREMIO_REFERER));
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("cross-site"),
    );
    headers.insert(HeaderName::from_static("sec-fetch-mode"), HeaderValue::from_static("cors"));
    headers.insert(HeaderName::from_static("sec-fetch-dest"), HeaderValue::from_static("empty"));
    headers
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

/// HTTP client for Stremio-style `/stream/...json` endpoints
#[derive(Debug, Clone)]
pub struct AddonHttpClient {
    http: Client,
}

impl AddonHttpClient {
    /// Create a client whose connect and total request time are bounded by `timeout`
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .pool_max_idle_per_host(0)
            .default_headers(browser_headers())
            .build()
            .map_err(|e| ProviderError::Client(e.to_string()))?;

        Ok(Self { http })
    }

    /// GET a streams endpoint and decode its descriptors
    pub async fn get_streams(
        &self,
        provider: &str,
        url: &str,
    ) -> Result<Vec<RawDescriptor>, ProviderError> {
        debug!("[{}] Request URL: {}", provider, url);

        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                "[{}] HTTP error {}: {}",
                provider,
                status.as_u16(),
                preview(&body)
            );
            return Err(ProviderError::Http(status.as_u16()));
        }

        let body = response.text().await?;
        decode_streams(provider, &body)
    }
}

/// Decode a streams envelope, skipping entries that do not fit the descriptor shape
///
/// A missing or null `streams` field is an empty list; an empty or `null`
/// body is [`ProviderError::EmptyResponse`]. Anything but a JSON object at the
/// top level is a decode error.
pub fn decode_streams(provider: &str, body: &str) -> Result<Vec<RawDescriptor>, ProviderError> {
    let body = body.trim();
    if body.is_empty() || body == "null" {
        return Err(ProviderError::EmptyResponse);
    }

    let value: Value = serde_json::from_str(body).map_err(|e| {
        error!("[{}] Failed to parse streams response: {}", provider, e);
        debug!("[{}] Response text: {}", provider, preview(body));
        ProviderError::Decode(e.to_string())
    })?;

    if !value.is_object() {
        error!("[{}] Streams response is not a JSON object", provider);
        debug!("[{}] Response text: {}", provider, preview(body));
        return Err(ProviderError::Decode(
            "expected a JSON object at the top level".to_string(),
        ));
    }

    let envelope: StreamsEnvelope = serde_json::from_value(value).map_err(|e| {
        error!("[{}] Unexpected streams envelope: {}", provider, e);
        ProviderError::Decode(e.to_string())
    })?;

    let Some(entries) = envelope.streams else {
        debug!("[{}] No streams field in response", provider);
        return Ok(Vec::new());
    };

    let total = entries.len();
    let descriptors: Vec<RawDescriptor> = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(descriptor) => Some(descriptor),
            Err(e) => {
                debug!("[{}] Skipping malformed stream entry: {}", provider, e);
                None
            }
        })
        .collect();

    if descriptors.len() < total {
        warn!(
            "[{}] Skipped {} of {} stream entries",
            provider,
            total - descriptors.len(),
            total
        );
    }

    Ok(descriptors)
}
