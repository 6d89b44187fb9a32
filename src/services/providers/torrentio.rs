//! Torrentio-style provider
//!
//! ```text
//! {base}/providers={list}|debridoptions={opts}|premiumize={key}/stream/{type}/{id}[:s:e].json
//! ```

use std::time::Duration;

use async_trait::async_trait;

use super::http::{AddonHttpClient, DEFAULT_TIMEOUT_MS};
use super::{settle, ProviderError, StreamProvider};
use crate::models::{stremio_type_segment, ContentVariant, QueryContext, RawDescriptor};

pub const PROVIDER_NAME: &str = "Torrentio";
pub const DEFAULT_BASE_URL: &str = "https://torrentio.strem.fun";
pub const DEFAULT_INDEXERS: &str = "yts,eztv,rarbg,1337x,thepiratebay,kickasstorrents,torrentgalaxy,magnetdl,horriblesubs,nyaasi,tokyotosho,anidex,rutor,rutracker";
pub const DEFAULT_DEBRID_OPTIONS: &str = "nodownloadlinks";

#[derive(Debug, Clone)]
pub struct TorrentioSettings {
    pub base_url: String,
    /// Comma-separated indexer list
    pub indexers: String,
    pub debrid_options: String,
    /// May be empty; the segment is then sent as `premiumize=`
    pub premiumize_key: String,
    pub timeout: Duration,
}

impl Default for TorrentioSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            indexers: DEFAULT_INDEXERS.to_string(),
            debrid_options: DEFAULT_DEBRID_OPTIONS.to_string(),
            premiumize_key: String::new(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

pub struct TorrentioProvider {
    settings: TorrentioSettings,
    client: AddonHttpClient,
}

impl TorrentioProvider {
    pub fn new(settings: TorrentioSettings) -> Result<Self, ProviderError> {
        let client = AddonHttpClient::new(settings.timeout)?;
        Ok(Self { settings, client })
    }

    /// Build the streams URL for a query
    pub fn stream_url(&self, ctx: &QueryContext, variant: ContentVariant) -> String {
        let settings = &self.settings;
        let mut url = format!(
            "{}/providers={}|debridoptions={}|premiumize={}/stream/{}/{}",
            settings.base_url.trim_end_matches('/'),
            settings.indexers,
            settings.debrid_options,
            settings.premiumize_key,
            stremio_type_segment(ctx.content_type, variant),
            ctx.external_id.trim(),
        );
        if !ctx.is_movie() {
            url.push_str(&format!(":{}:{}", ctx.season, ctx.episode));
        }
        url.push_str(".json");
        url
    }
}

#[async_trait]
impl StreamProvider for TorrentioProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch(&self, ctx: &QueryContext, variant: ContentVariant) -> Vec<RawDescriptor> {
        if let Err(err) = ctx.validate() {
            return settle(PROVIDER_NAME, Err(err.into()));
        }
        let url = self.stream_url(ctx, variant);
        settle(PROVIDER_NAME, self.client.get_streams(PROVIDER_NAME, &url).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::test_support::{sample_streams_body, spawn_addon, Reply};

    fn provider(base_url: &str, premiumize_key: &str) -> TorrentioProvider {
        TorrentioProvider::new(TorrentioSettings {
            base_url: base_url.to_string(),
            indexers: "yts,eztv".to_string(),
            premiumize_key: premiumize_key.to_string(),
            timeout: Duration::from_secs(5),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_movie_url() {
        let url = provider("https://torrentio.strem.fun/", "KEY")
            .stream_url(&QueryContext::movie("tt0111161"), ContentVariant::Standard);
        assert_eq!(
            url,
            "https://torrentio.strem.fun/providers=yts,eztv|debridoptions=nodownloadlinks|premiumize=KEY/stream/movie/tt0111161.json"
        );
    }

    #[test]
    fn test_episode_url_uses_literal_colons() {
        let p = provider("https://torrentio.strem.fun", "");
        let ctx = QueryContext::episode("tt0903747", 2, 5);

        let url = p.stream_url(&ctx, ContentVariant::Standard);
        assert!(url.contains("|premiumize=/stream/series/tt0903747:2:5.json"));

        let url = p.stream_url(&ctx, ContentVariant::Anime);
        assert!(url.ends_with("/stream/anime/tt0903747:2:5.json"));
    }

    #[tokio::test]
    async fn test_fetch_against_local_addon() {
        let stub = spawn_addon(Reply::Json(sample_streams_body())).await;
        let p = provider(&stub.base_url, "KEY");

        let descriptors = p
            .fetch(&QueryContext::episode("tt0903747", 1, 2), ContentVariant::Standard)
            .await;
        assert_eq!(descriptors.len(), 3);

        let requests = stub.requests();
        assert_eq!(
            requests[0].path,
            "/providers=yts,eztv|debridoptions=nodownloadlinks|premiumize=KEY/stream/series/tt0903747:1:2.json"
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_is_empty() {
        let stub = spawn_addon(Reply::Status(500)).await;
        let p = provider(&stub.base_url, "");
        assert!(p
            .fetch(&QueryContext::movie("tt1"), ContentVariant::Standard)
            .await
            .is_empty());

        let stub = spawn_addon(Reply::Json("not json".to_string())).await;
        let p = provider(&stub.base_url, "");
        assert!(p
            .fetch(&QueryContext::movie("tt1"), ContentVariant::Standard)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_invalid_query_sends_no_request() {
        let stub = spawn_addon(Reply::Json(sample_streams_body())).await;
        let p = provider(&stub.base_url, "KEY");

        let descriptors = p
            .fetch(&QueryContext::episode("tt0903747", 0, 1), ContentVariant::Standard)
            .await;
        assert!(descriptors.is_empty());

        let descriptors = p
            .fetch(&QueryContext::movie("  "), ContentVariant::Standard)
            .await;
        assert!(descriptors.is_empty());

        assert!(stub.requests().is_empty());
    }
}
