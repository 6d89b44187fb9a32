use std::env;
use std::time::Duration;

use crate::models::{SizeBounds, SizePolicy, SortDirection, StreamPolicy};
use crate::services::aggregator::DEFAULT_ROUND_DELAY_MS;
use crate::services::extractor::ExtractorMarkers;
use crate::services::providers::http::DEFAULT_TIMEOUT_MS;
use crate::services::providers::{aiostreams, torrentio, AioStreamsSettings, TorrentioSettings};
use crate::services::size::{parse_size, MIB};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Torrentio
    pub torrentio_enabled: bool,
    pub torrentio_base_url: String,
    pub torrentio_providers: String,
    pub torrentio_debrid_options: String,
    pub premiumize_api_key: String,

    // AIOStreams
    pub aiostreams_enabled: bool,
    pub aiostreams_base_url: String,
    pub aiostreams_config: String,

    // Querying
    pub provider_timeout_ms: u64,
    pub variant_round_delay_ms: u64,
    pub anime_endpoint_enabled: bool,

    // Post-processing
    pub stream_sort: SortDirection,
    pub remove_duplicates: bool,
    pub preferred_provider: String,
    /// Size bounds in bytes, `None` when disabled
    pub min_size_movies: Option<u64>,
    pub max_size_movies: Option<u64>,
    pub min_size_episodes: Option<u64>,
    pub max_size_episodes: Option<u64>,

    // Extraction
    pub seed_marker: String,
    pub size_marker: String,
    pub source_marker: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup; unset or unparsable values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let flag = |key: &str, default: bool| lookup(key).and_then(|v| parse_flag(&v)).unwrap_or(default);
        let threshold = |key: &str| lookup(key).and_then(|v| parse_threshold(&v));

        Self {
            // Server
            port: lookup("PORT").and_then(|v| v.parse().ok()).unwrap_or(3001),

            // Torrentio
            torrentio_enabled: flag("TORRENTIO_ENABLED", true),
            torrentio_base_url: string("TORRENTIO_BASE_URL", torrentio::DEFAULT_BASE_URL),
            torrentio_providers: string("TORRENTIO_PROVIDERS", torrentio::DEFAULT_INDEXERS),
            torrentio_debrid_options: string(
                "TORRENTIO_DEBRID_OPTIONS",
                torrentio::DEFAULT_DEBRID_OPTIONS,
            ),
            premiumize_api_key: string("PREMIUMIZE_API_KEY", ""),

            // AIOStreams
            aiostreams_enabled: flag("AIOSTREAMS_ENABLED", false),
            aiostreams_base_url: string("AIOSTREAMS_BASE_URL", aiostreams::DEFAULT_BASE_URL),
            aiostreams_config: string("AIOSTREAMS_CONFIG", ""),

            // Querying
            provider_timeout_ms: lookup("PROVIDER_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_MS), // 30 seconds
            variant_round_delay_ms: lookup("VARIANT_ROUND_DELAY_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_ROUND_DELAY_MS),
            anime_endpoint_enabled: flag("ANIME_ENDPOINT_ENABLED", true),

            // Post-processing
            stream_sort: lookup("STREAM_SORT")
                .and_then(|v| SortDirection::parse(&v))
                .unwrap_or_default(),
            remove_duplicates: flag("STREAM_REMOVE_DUPLICATES", true),
            preferred_provider: string("STREAM_PREFERRED_PROVIDER", torrentio::PROVIDER_NAME),
            min_size_movies: threshold("STREAM_MIN_SIZE_MOVIES_MB"),
            max_size_movies: threshold("STREAM_MAX_SIZE_MOVIES_MB"),
            min_size_episodes: threshold("STREAM_MIN_SIZE_EPISODES_MB"),
            max_size_episodes: threshold("STREAM_MAX_SIZE_EPISODES_MB"),

            // Extraction
            seed_marker: string("SEED_MARKER", "👤"),
            size_marker: string("SIZE_MARKER", "💾"),
            source_marker: string("SOURCE_MARKER", "⚙️"),
        }
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    pub fn round_delay(&self) -> Duration {
        Duration::from_millis(self.variant_round_delay_ms)
    }

    pub fn torrentio_settings(&self) -> TorrentioSettings {
        TorrentioSettings {
            base_url: self.torrentio_base_url.clone(),
            indexers: self.torrentio_providers.clone(),
            debrid_options: self.torrentio_debrid_options.clone(),
            premiumize_key: self.premiumize_api_key.clone(),
            timeout: self.provider_timeout(),
        }
    }

    pub fn aiostreams_settings(&self) -> AioStreamsSettings {
        AioStreamsSettings {
            base_url: self.aiostreams_base_url.clone(),
            config: self.aiostreams_config.clone(),
            timeout: self.provider_timeout(),
        }
    }

    pub fn extractor_markers(&self) -> ExtractorMarkers {
        ExtractorMarkers {
            seeds: self.seed_marker.clone(),
            size: self.size_marker.clone(),
            source: self.source_marker.clone(),
        }
    }

    pub fn stream_policy(&self) -> StreamPolicy {
        StreamPolicy {
            sort: self.stream_sort,
            remove_duplicates: self.remove_duplicates,
            preferred_provider: self.preferred_provider.clone(),
            sizes: SizePolicy {
                movies: SizeBounds {
                    min: self.min_size_movies,
                    max: self.max_size_movies,
                },
                episodes: SizeBounds {
                    min: self.min_size_episodes,
                    max: self.max_size_episodes,
                },
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// `true`/`false` style switches
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Size threshold in bytes
///
/// Plain numbers are MiB; values with a unit (`1gb`, `500 MB`, `1.5GiB`)
/// use the size grammar. Empty, `0`, `off` and `disabled` disable the bound.
pub fn parse_threshold(value: &str) -> Option<u64> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("off") || value.eq_ignore_ascii_case("disabled") {
        return None;
    }

    let bytes = match value.parse::<f64>() {
        Ok(mb) if mb.is_finite() && mb >= 0.0 => (mb * MIB as f64).round() as u64,
        Ok(_) => return None,
        Err(_) => parse_size(value)?,
    };

    (bytes > 0).then_some(bytes)
}
