//! Data model
//!
//! - Stream records and query/policy types shared by the engine
//! - Wire types for Stremio-style addon responses

pub mod descriptor;
pub mod stream;

// Re-export commonly used items
pub use descriptor::{ParsedFileHints, RawDescriptor, StreamsEnvelope};
pub use stream::{
    stremio_type_segment, ContentType, ContentVariant, HdrFormat, QueryContext, QueryError,
    SizeBounds, SizePolicy, SortDirection, StreamPolicy, StreamRecord, UNKNOWN, UNKNOWN_SIZE,
};
