//! Provider fan-out and variant rounds
//!
//! The [`Aggregator`] runs every enabled provider concurrently for one
//! catalog variant and joins the results in provider order. The
//! [`VariantScheduler`] decides whether a query needs one round or two
//! (anime catalog first, then the standard one after a fixed pause).

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::models::{ContentVariant, QueryContext, StreamRecord};
use crate::services::extractor::MetadataExtractor;
use crate::services::metrics;
use crate::services::providers::StreamProvider;

/// Default pause between the anime and the standard round
pub const DEFAULT_ROUND_DELAY_MS: u64 = 1000;

/// Concurrent query of all providers for one variant
#[derive(Clone)]
pub struct Aggregator {
    providers: Vec<Arc<dyn StreamProvider>>,
    extractor: Arc<MetadataExtractor>,
}

impl Aggregator {
    pub fn new(providers: Vec<Arc<dyn StreamProvider>>, extractor: MetadataExtractor) -> Self {
        Self {
            providers,
            extractor: Arc::new(extractor),
        }
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// One round: every provider in parallel, joined, flattened in provider order
    pub async fn run_round(&self, ctx: &QueryContext, variant: ContentVariant) -> Vec<StreamRecord> {
        metrics::record_round(variant.as_str());

        let handles: Vec<_> = self
            .providers
            .iter()
            .map(|provider| {
                let provider = Arc::clone(provider);
                let extractor = Arc::clone(&self.extractor);
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    let descriptors = provider.fetch(&ctx, variant).await;
                    let name = provider.name();
                    let records: Vec<StreamRecord> = descriptors
                        .iter()
                        .filter_map(|descriptor| extractor.extract(descriptor, name))
                        .collect();

                    debug!(
                        "[{}] {} descriptors, {} records ({} variant)",
                        name,
                        descriptors.len(),
                        records.len(),
                        variant.as_str()
                    );
                    metrics::record_parsed(name, records.len());
                    records
                })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .zip(self.provider_names())
            .flat_map(|(joined, name)| match joined {
                Ok(records) => records,
                Err(e) => {
                    warn!("[{}] Provider task failed: {}", name, e);
                    metrics::record_provider_outcome(&name, "task_failed");
                    Vec::new()
                }
            })
            .collect()
    }
}

/// Chooses and runs the query rounds for a request
#[derive(Clone)]
pub struct VariantScheduler {
    aggregator: Aggregator,
    round_delay: Duration,
    anime_enabled: bool,
}

impl VariantScheduler {
    pub fn new(aggregator: Aggregator, round_delay: Duration, anime_enabled: bool) -> Self {
        Self {
            aggregator,
            round_delay,
            anime_enabled,
        }
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Variants to query, in order
    pub fn plan(&self, ctx: &QueryContext) -> Vec<ContentVariant> {
        if self.anime_enabled && ctx.anime && !ctx.is_movie() {
            vec![ContentVariant::Anime, ContentVariant::Standard]
        } else {
            vec![ContentVariant::Standard]
        }
    }

    /// Run every planned round and concatenate the results, earlier rounds first
    pub async fn collect(&self, ctx: &QueryContext) -> Vec<StreamRecord> {
        let mut merged = Vec::new();

        for (round, variant) in self.plan(ctx).into_iter().enumerate() {
            if round > 0 {
                tokio::time::sleep(self.round_delay).await;
            }

            let records = self.aggregator.run_round(ctx, variant).await;
            info!(
                "Round {} ({} variant): {} records for {}",
                round + 1,
                variant.as_str(),
                records.len(),
                ctx.external_id
            );
            merged.extend(records);
        }

        merged
    }
}
