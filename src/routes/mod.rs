//! HTTP routes
//!
//! - Health, probes and Prometheus metrics
//! - Stream lookups backed by the discovery pipeline

pub mod health;
pub mod streams;
