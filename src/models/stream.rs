use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder for quality/codec/release when nothing was detected
pub const UNKNOWN: &str = "unknown";

/// Placeholder for file size when neither a byte hint nor a size glyph was found
pub const UNKNOWN_SIZE: &str = "Unknown";

/// Content type of the item being looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movie,
    Episode,
}

impl ContentType {
    /// Parse a content type from a path segment ("series" is accepted for episodes)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "movie" | "movies" => Some(Self::Movie),
            "episode" | "episodes" | "series" | "tv" => Some(Self::Episode),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Movie => write!(f, "movie"),
            ContentType::Episode => write!(f, "episode"),
        }
    }
}

/// Catalog variant a provider is queried for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentVariant {
    /// Regular movie/series catalog
    Standard,
    /// Alternate catalog for content better indexed as anime
    Anime,
}

impl ContentVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentVariant::Standard => "standard",
            ContentVariant::Anime => "anime",
        }
    }
}

/// Path segment used by Stremio-style addons for a content type / variant pair
pub fn stremio_type_segment(content_type: ContentType, variant: ContentVariant) -> &'static str {
    match (content_type, variant) {
        (ContentType::Movie, _) => "movie",
        (ContentType::Episode, ContentVariant::Anime) => "anime",
        (ContentType::Episode, ContentVariant::Standard) => "series",
    }
}

/// Reasons a query is rejected before any provider is contacted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("external identifier is required")]
    MissingIdentifier,
    #[error("season and episode numbers are required for episodes (got S{season}E{episode})")]
    InvalidEpisodeNumbers { season: i32, episode: i32 },
}

/// Already-resolved lookup input handed to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryContext {
    /// External content identifier (e.g. "tt0111161")
    pub external_id: String,
    pub content_type: ContentType,
    pub season: i32,
    pub episode: i32,
    /// Whether the item belongs to the alternate (anime) content class
    pub anime: bool,
}

impl QueryContext {
    pub fn movie(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            content_type: ContentType::Movie,
            season: 0,
            episode: 0,
            anime: false,
        }
    }

    pub fn episode(external_id: impl Into<String>, season: i32, episode: i32) -> Self {
        Self {
            external_id: external_id.into(),
            content_type: ContentType::Episode,
            season,
            episode,
            anime: false,
        }
    }

    /// Mark this episode query as alternate content class
    pub fn with_anime(mut self, anime: bool) -> Self {
        self.anime = anime;
        self
    }

    pub fn is_movie(&self) -> bool {
        self.content_type == ContentType::Movie
    }

    /// Check the preconditions every provider relies on
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.external_id.trim().is_empty() {
            return Err(QueryError::MissingIdentifier);
        }
        if !self.is_movie() && (self.season <= 0 || self.episode <= 0) {
            return Err(QueryError::InvalidEpisodeNumbers {
                season: self.season,
                episode: self.episode,
            });
        }
        Ok(())
    }
}

/// HDR signal detected for a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HdrFormat {
    #[serde(rename = "Dolby Vision")]
    DolbyVision,
    #[serde(rename = "HDR10+")]
    Hdr10Plus,
    #[serde(rename = "HDR10")]
    Hdr10,
    #[serde(rename = "HDR")]
    Hdr,
    #[serde(rename = "SDR")]
    Sdr,
}

impl HdrFormat {
    pub fn label(&self) -> &'static str {
        match self {
            HdrFormat::DolbyVision => "Dolby Vision",
            HdrFormat::Hdr10Plus => "HDR10+",
            HdrFormat::Hdr10 => "HDR10",
            HdrFormat::Hdr => "HDR",
            HdrFormat::Sdr => "SDR",
        }
    }
}

impl std::fmt::Display for HdrFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalized stream candidate
///
/// Built once by the metadata extractor and never edited afterwards; the
/// pipeline only filters and reorders records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamRecord {
    pub id: String,
    pub url: String,
    pub title: String,
    pub name: String,
    pub filename: String,
    pub quality: String,
    pub seeds: u32,
    pub file_size: String,
    pub source: String,
    pub provider: String,
    pub hdr_formats: Vec<HdrFormat>,
    pub codec: String,
    pub is_atmos: bool,
    pub release: String,
    pub audio_channels: u32,
}

/// Direction of the final size ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    SizeDesc,
    SizeAsc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "size_desc" | "desc" | "descending" => Some(Self::SizeDesc),
            "size_asc" | "asc" | "ascending" => Some(Self::SizeAsc),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::SizeDesc => write!(f, "size_desc"),
            SortDirection::SizeAsc => write!(f, "size_asc"),
        }
    }
}

/// Inclusive byte bounds, `None` meaning the bound is disabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeBounds {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl SizeBounds {
    pub fn contains(&self, bytes: u64) -> bool {
        self.min.map_or(true, |min| bytes >= min) && self.max.map_or(true, |max| bytes <= max)
    }
}

/// Size thresholds per content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePolicy {
    pub movies: SizeBounds,
    pub episodes: SizeBounds,
}

impl SizePolicy {
    pub fn bounds_for(&self, content_type: ContentType) -> SizeBounds {
        match content_type {
            ContentType::Movie => self.movies,
            ContentType::Episode => self.episodes,
        }
    }
}

/// Post-processing options applied to the merged candidate list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamPolicy {
    pub sort: SortDirection,
    pub remove_duplicates: bool,
    /// Provider whose record survives when filenames collide
    pub preferred_provider: String,
    pub sizes: SizePolicy,
}

impl Default for StreamPolicy {
    fn default() -> Self {
        Self {
            sort: SortDirection::SizeDesc,
            remove_duplicates: true,
            preferred_provider: "Torrentio".to_string(),
            sizes: SizePolicy::default(),
        }
    }
}
