//! Stream discovery pipeline
//!
//! Entry point used by the routes: validate the query, run the provider
//! rounds, then size-filter, deduplicate and sort the merged records.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{ContentType, QueryContext, StreamPolicy, StreamRecord};
use crate::services::aggregator::{Aggregator, VariantScheduler};
use crate::services::dedup::deduplicate;
use crate::services::extractor::MetadataExtractor;
use crate::services::metrics;
use crate::services::providers::{AioStreamsProvider, StreamProvider, TorrentioProvider};
use crate::services::size_filter::filter_by_size;
use crate::services::sorter::sort_by_size;

pub struct DiscoveryService {
    scheduler: VariantScheduler,
    policy: StreamPolicy,
}

impl DiscoveryService {
    pub fn new(scheduler: VariantScheduler, policy: StreamPolicy) -> Self {
        Self { scheduler, policy }
    }

    /// Build the enabled providers and pipeline from configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut providers: Vec<Arc<dyn StreamProvider>> = Vec::new();

        if config.torrentio_enabled {
            providers.push(Arc::new(TorrentioProvider::new(config.torrentio_settings())?));
        }
        if config.aiostreams_enabled {
            providers.push(Arc::new(AioStreamsProvider::new(config.aiostreams_settings())?));
        }

        let extractor = MetadataExtractor::new(&config.extractor_markers())?;
        let scheduler = VariantScheduler::new(
            Aggregator::new(providers, extractor),
            config.round_delay(),
            config.anime_endpoint_enabled,
        );

        Ok(Self::new(scheduler, config.stream_policy()))
    }

    pub fn policy(&self) -> &StreamPolicy {
        &self.policy
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.scheduler.aggregator().provider_names()
    }

    pub fn has_providers(&self) -> bool {
        !self.scheduler.aggregator().is_empty()
    }

    /// Discover streams with the configured policy
    pub async fn discover(&self, ctx: &QueryContext) -> Vec<StreamRecord> {
        self.discover_with(ctx, &self.policy).await
    }

    /// Discover streams with an explicit post-processing policy
    ///
    /// Invalid queries and a missing provider set yield an empty list
    /// without any network call.
    pub async fn discover_with(&self, ctx: &QueryContext, policy: &StreamPolicy) -> Vec<StreamRecord> {
        if !self.has_providers() {
            debug!("No stream providers enabled");
            return Vec::new();
        }

        if let Err(e) = ctx.validate() {
            warn!("Rejected stream query for '{}': {}", ctx.external_id, e);
            return Vec::new();
        }

        info!(
            "Querying streams for {} ({}, S{}E{}, anime: {})",
            ctx.external_id, ctx.content_type, ctx.season, ctx.episode, ctx.anime
        );

        let merged = self.scheduler.collect(ctx).await;
        post_process(merged, ctx.content_type, policy)
    }
}

/// Size filter, optional deduplication, then size ordering
pub fn post_process(
    records: Vec<StreamRecord>,
    content_type: ContentType,
    policy: &StreamPolicy,
) -> Vec<StreamRecord> {
    let total = records.len();

    let filtered = filter_by_size(records, policy.sizes.bounds_for(content_type));
    let after_filter = filtered.len();
    metrics::record_dropped("size_filter", total - after_filter);

    let mut result = if policy.remove_duplicates {
        deduplicate(filtered, &policy.preferred_provider)
    } else {
        filtered
    };
    metrics::record_dropped("dedup", after_filter - result.len());

    sort_by_size(&mut result, policy.sort);

    info!(
        "Streams: {} total, {} after filtering, {} after deduplication",
        total,
        after_filter,
        result.len()
    );
    result
}
