//! Prometheus counters for the stream pipeline
//!
//! Registered in the default registry so `/metrics` picks them up through
//! `prometheus::gather()`.

use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    /// Provider requests by provider and outcome: `ok`, `empty`, `http_error`,
    /// `network_error`, `decode_error`, `skipped` or `task_failed`
    pub static ref PROVIDER_REQUESTS: IntCounterVec = register_int_counter_vec!(
        "streamscout_provider_requests_total",
        "Provider stream requests by outcome",
        &["provider", "outcome"]
    )
    .unwrap();

    /// Descriptors turned into records, by provider
    pub static ref DESCRIPTORS_PARSED: IntCounterVec = register_int_counter_vec!(
        "streamscout_descriptors_parsed_total",
        "Descriptors converted to stream records",
        &["provider"]
    )
    .unwrap();

    /// Records removed during post-processing, by stage
    pub static ref RECORDS_DROPPED: IntCounterVec = register_int_counter_vec!(
        "streamscout_records_dropped_total",
        "Stream records removed by the size filter or deduplication",
        &["stage"]
    )
    .unwrap();

    /// Aggregation rounds by catalog variant
    pub static ref QUERY_ROUNDS: IntCounterVec = register_int_counter_vec!(
        "streamscout_query_rounds_total",
        "Provider fan-out rounds by catalog variant",
        &["variant"]
    )
    .unwrap();
}

pub fn record_provider_outcome(provider: &str, outcome: &str) {
    PROVIDER_REQUESTS.with_label_values(&[provider, outcome]).inc();
}

pub fn record_parsed(provider: &str, count: usize) {
    DESCRIPTORS_PARSED
        .with_label_values(&[provider])
        .inc_by(count as u64);
}

pub fn record_dropped(stage: &str, count: usize) {
    if count > 0 {
        RECORDS_DROPPED.with_label_values(&[stage]).inc_by(count as u64);
    }
}

pub fn record_round(variant: &str) {
    QUERY_ROUNDS.with_label_values(&[variant]).inc();
}
