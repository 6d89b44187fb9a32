//! AIOStreams-style provider
//!
//! ```text
//! {base}/{config}/stream/{movie|series|anime}/{id}[%3As%3Ae].json
//! ```
//!
//! The config segment is the user's encoded addon configuration; without it
//! there is nothing to query.

use std::time::Duration;

use async_trait::async_trait;

use super::http::{AddonHttpClient, DEFAULT_TIMEOUT_MS};
use super::{settle, ProviderError, StreamProvider};
use crate::models::{stremio_type_segment, ContentVariant, QueryContext, RawDescriptor};

pub const PROVIDER_NAME: &str = "AIOStreams";
pub const DEFAULT_BASE_URL: &str = "https://aiostreams.elfhosted.com/stremio";

#[derive(Debug, Clone)]
pub struct AioStreamsSettings {
    pub base_url: String,
    /// Opaque config/credential path segment
    pub config: String,
    pub timeout: Duration,
}

impl Default for AioStreamsSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            config: String::new(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

pub struct AioStreamsProvider {
    settings: AioStreamsSettings,
    client: AddonHttpClient,
}

impl AioStreamsProvider {
    pub fn new(settings: AioStreamsSettings) -> Result<Self, ProviderError> {
        let client = AddonHttpClient::new(settings.timeout)?;
        Ok(Self { settings, client })
    }

    /// Build the streams URL, or `None` when no config segment is set
    pub fn stream_url(&self, ctx: &QueryContext, variant: ContentVariant) -> Option<String> {
        let config = self.settings.config.trim().trim_matches('/');
        if config.is_empty() {
            return None;
        }

        let mut url = format!(
            "{}/{}/stream/{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            config,
            stremio_type_segment(ctx.content_type, variant),
            ctx.external_id.trim(),
        );
        if !ctx.is_movie() {
            // Colons travel percent-encoded on this host
            let suffix = format!(":{}:{}", ctx.season, ctx.episode);
            url.push_str(&urlencoding::encode(&suffix));
        }
        url.push_str(".json");
        Some(url)
    }
}

#[async_trait]
impl StreamProvider for AioStreamsProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch(&self, ctx: &QueryContext, variant: ContentVariant) -> Vec<RawDescriptor> {
        if let Err(err) = ctx.validate() {
            return settle(PROVIDER_NAME, Err(err.into()));
        }
        let result = match self.stream_url(ctx, variant) {
            Some(url) => self.client.get_streams(PROVIDER_NAME, &url).await,
            None => Err(ProviderError::MissingCredentials("AIOStreams config")),
        };
        settle(PROVIDER_NAME, result)
    }
}
