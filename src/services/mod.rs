//! Stream engine services
//!
//! - Provider clients and fan-out (`providers`, `aggregator`)
//! - Metadata extraction from addon descriptors (`extractor`)
//! - Post-processing stages (`size_filter`, `dedup`, `sorter`)
//! - The end-to-end pipeline used by the routes (`discovery`)

pub mod aggregator;
pub mod dedup;
pub mod discovery;
pub mod extractor;
pub mod metrics;
pub mod playback;
pub mod providers;
pub mod size;
pub mod size_filter;
pub mod sorter;

// Re-export commonly used items
pub use discovery::DiscoveryService;
pub use playback::needs_redirect_resolution;
