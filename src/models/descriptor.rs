//! Stremio Addon Stream Types
//!
//! Wire types for `/stream/<type>/<id>.json` responses. Every field is
//! optional and unknown fields are ignored, so providers can extend their
//! payloads without breaking decoding.

use serde::{Deserialize, Serialize};

/// Top-level response envelope
///
/// Entries are kept as raw JSON values so one malformed descriptor does not
/// take down the whole response.
#[derive(Debug, Default, Deserialize)]
pub struct StreamsEnvelope {
    #[serde(default)]
    pub streams: Option<Vec<serde_json::Value>>,
}

/// Single stream entry as returned by a provider
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub behavior_hints: Option<BehaviorHints>,
    /// Structured metadata some providers attach at the stream level
    #[serde(default)]
    pub stream_data: Option<StreamDataHints>,
}

impl RawDescriptor {
    /// Descriptive text: `description` when present, otherwise `title`
    pub fn descriptive_text(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => self.title.as_deref().unwrap_or_default(),
        }
    }

    pub fn filename(&self) -> &str {
        self.behavior_hints
            .as_ref()
            .and_then(|h| h.filename.as_deref())
            .unwrap_or_default()
    }

    pub fn binge_group(&self) -> &str {
        self.behavior_hints
            .as_ref()
            .and_then(|h| h.binge_group.as_deref())
            .unwrap_or_default()
    }

    /// Byte size hint, only when strictly positive
    pub fn video_size(&self) -> Option<u64> {
        self.behavior_hints
            .as_ref()
            .and_then(|h| h.video_size)
            .filter(|size| *size > 0)
            .map(|size| size as u64)
    }

    /// Structured file metadata, looked up on the stream first, then in the hints
    pub fn parsed_file(&self) -> Option<&ParsedFileHints> {
        self.stream_data
            .as_ref()
            .and_then(|d| d.parsed_file.as_ref())
            .or_else(|| {
                self.behavior_hints
                    .as_ref()
                    .and_then(|h| h.stream_data.as_ref())
                    .and_then(|d| d.parsed_file.as_ref())
            })
    }
}

/// Player hints attached to a stream
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorHints {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub video_size: Option<i64>,
    /// Pipe-delimited grouping string, e.g. `addon|premiumize|1080p|BluRay|HEVC`
    #[serde(default)]
    pub binge_group: Option<String>,
    #[serde(default)]
    pub video_hash: Option<String>,
    #[serde(default)]
    pub stream_data: Option<StreamDataHints>,
}

/// Wrapper around the structured file metadata
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamDataHints {
    #[serde(default)]
    pub parsed_file: Option<ParsedFileHints>,
}

/// Metadata a provider already parsed out of the release name
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFileHints {
    /// e.g. `["DV", "HDR10+"]`
    #[serde(default)]
    pub visual_tags: Option<Vec<String>>,
    /// e.g. `"HEVC"`
    #[serde(default)]
    pub encode: Option<String>,
    /// e.g. `"2160p"`
    #[serde(default)]
    pub resolution: Option<String>,
    /// Release-quality label, e.g. `"BluRay REMUX"`
    #[serde(default)]
    pub quality: Option<String>,
    /// e.g. `["Atmos", "TrueHD"]`
    #[serde(default)]
    pub audio_tags: Option<Vec<String>>,
    /// e.g. `["7.1"]`
    #[serde(default)]
    pub audio_channels: Option<Vec<String>>,
}
