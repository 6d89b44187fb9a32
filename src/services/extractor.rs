//! Stream metadata extraction
//!
//! Turns one raw addon descriptor into a normalized [`StreamRecord`].
//! Each field has an ordered list of strategies; the first strategy that
//! yields a value wins, and the field falls back to its default otherwise.
//! HDR tags and Atmos are accumulated across every source instead.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{HdrFormat, ParsedFileHints, RawDescriptor, StreamRecord, UNKNOWN, UNKNOWN_SIZE};
use crate::services::playback::is_playable_url;
use crate::services::size::{format_bytes, SIZE_PATTERN};

/// Default audio layout when nothing better is found
pub const DEFAULT_AUDIO_CHANNELS: u32 = 2;

/// Codec tokens trusted when they appear in a binge group or parsed-file hint
const CODEC_VOCABULARY: &[&str] = &["hevc", "x265", "avc", "x264", "av1", "h265", "h264"];

lazy_static! {
    static ref QUALITY_PATTERN: Regex = Regex::new(r"(?i)(\d+p|4k)").unwrap();
    static ref QUALITY_TOKEN: Regex = Regex::new(r"(?i)^(\d+p|4k)$").unwrap();

    static ref CODEC_PATTERN: Regex =
        Regex::new(r"(?i)(?:^|[^a-z0-9])(x264|x265|hevc|avc|av1|h\.?265|h\.?264)(?:[^a-z0-9]|$)")
            .unwrap();

    static ref RELEASE_PATTERN: Regex = Regex::new(
        r"(?i)(?:^|[^a-z0-9])(blu-?ray(?:[ ._-]remux)?|remux|web-?dl|web-?rip|hdtv|bdrip|brrip|dvdrip|hdrip|bdmux)(?:[^a-z0-9]|$)"
    ).unwrap();
    /// Telesync tags are only trusted in upper case; `.ts` is also a file extension
    static ref TELESYNC_PATTERN: Regex =
        Regex::new(r"(?:^|[^A-Za-z0-9])(TS|HDTS|TELESYNC)(?:[^A-Za-z0-9]|$)").unwrap();

    static ref DOLBY_VISION: Regex = Regex::new(r"(?i)\b(dolby[ ._-]?vision|dovi|dv)\b").unwrap();
    static ref HDR10_PLUS: Regex = Regex::new(r"(?i)\bhdr[ ._-]?10[ ._-]?(\+|plus)").unwrap();
    static ref HDR10: Regex = Regex::new(r"(?i)\bhdr[ ._-]?10\b").unwrap();
    static ref GENERIC_HDR: Regex = Regex::new(r"(?i)\bhdr\b").unwrap();

    /// `<front>.<lfe>` layout such as 5.1 or 7.1, not part of a longer number.
    /// A dot before the layout is fine as long as no digit precedes it (`DD.5.1`).
    static ref CHANNEL_LAYOUT: Regex =
        Regex::new(r"(?:^|[^\d.]|[^\d]\.)([1-9])\.([0-2])(?:\D|$)").unwrap();
}

/// Glyphs providers put in front of seed count, size and source in their text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorMarkers {
    pub seeds: String,
    pub size: String,
    pub source: String,
}

impl Default for ExtractorMarkers {
    fn default() -> Self {
        Self {
            seeds: "👤".to_string(),
            size: "💾".to_string(),
            source: "⚙️".to_string(),
        }
    }
}

/// Compiled marker patterns
#[derive(Debug, Clone)]
struct MarkerPatterns {
    seeds: Regex,
    size: Regex,
    source: Regex,
}

impl MarkerPatterns {
    fn compile(markers: &ExtractorMarkers) -> Result<Self, regex::Error> {
        Ok(Self {
            seeds: Regex::new(&format!(r"{}\s*(\d+)", regex::escape(&markers.seeds)))?,
            size: Regex::new(&format!(
                r"{}\s*([\d.]+)\s*(GB|MB|GiB|MiB)",
                regex::escape(&markers.size)
            ))?,
            source: Regex::new(&format!(r"(?m){}\s*(.+)$", regex::escape(&markers.source)))?,
        })
    }
}

/// Everything the strategies may look at for one descriptor
struct Hints<'a> {
    name: &'a str,
    /// Description, or title when the provider has no description
    text: &'a str,
    description: &'a str,
    title: &'a str,
    filename: &'a str,
    video_size: Option<u64>,
    /// Lower-cased binge-group tokens
    tokens: Vec<String>,
    /// False when the binge group only carries an opaque identifier
    tokens_descriptive: bool,
    parsed_file: Option<&'a ParsedFileHints>,
    /// Lower-cased name, filename, text, tokens and structured tags
    combined: String,
    markers: &'a MarkerPatterns,
}

impl<'a> Hints<'a> {
    fn new(descriptor: &'a RawDescriptor, markers: &'a MarkerPatterns) -> Self {
        let tokens = split_binge_group(descriptor.binge_group());
        let tokens_descriptive = !is_opaque_binge_group(&tokens);
        let parsed_file = descriptor.parsed_file();

        let name = descriptor.name.as_deref().unwrap_or_default();
        let filename = descriptor.filename();
        let text = descriptor.descriptive_text();

        let mut parts: Vec<&str> = vec![name, filename, text];
        parts.extend(tokens.iter().map(String::as_str));
        if let Some(file) = parsed_file {
            for list in [&file.visual_tags, &file.audio_tags].into_iter().flatten() {
                parts.extend(list.iter().map(String::as_str));
            }
        }
        let combined = parts.join(" ").to_lowercase();

        Self {
            name,
            text,
            description: descriptor.description.as_deref().unwrap_or_default(),
            title: descriptor.title.as_deref().unwrap_or_default(),
            filename,
            video_size: descriptor.video_size(),
            tokens,
            tokens_descriptive,
            parsed_file,
            combined,
            markers,
        }
    }

    /// Binge-group tokens, or nothing when the group is an opaque identifier
    fn descriptive_tokens(&self) -> &[String] {
        if self.tokens_descriptive {
            &self.tokens[..]
        } else {
            &[]
        }
    }
}

type Strategy<T> = fn(&Hints<'_>) -> Option<T>;

fn first_match<T>(hints: &Hints<'_>, strategies: &[Strategy<T>]) -> Option<T> {
    strategies.iter().find_map(|strategy| strategy(hints))
}

const QUALITY_STRATEGIES: &[Strategy<String>] = &[
    quality_from_name,
    quality_from_tokens,
    quality_from_parsed_file,
];
const SEEDS_STRATEGIES: &[Strategy<u32>] = &[seeds_from_text];
const SIZE_STRATEGIES: &[Strategy<String>] = &[size_from_hint, size_from_text];
const SOURCE_STRATEGIES: &[Strategy<String>] = &[source_from_text];
const CODEC_STRATEGIES: &[Strategy<String>] = &[
    codec_from_tokens,
    codec_from_parsed_file,
    codec_from_filename,
    codec_from_name,
    codec_from_text,
];
const RELEASE_STRATEGIES: &[Strategy<String>] = &[
    release_from_tokens,
    release_from_parsed_file,
    release_from_filename,
    release_from_name,
    release_from_text,
];
const CHANNEL_STRATEGIES: &[Strategy<u32>] = &[
    channels_from_text,
    channels_from_parsed_file,
    channels_from_tokens,
];

/// Maps raw addon descriptors to stream records
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    markers: MarkerPatterns,
}

impl MetadataExtractor {
    /// Create an extractor anchored on the given glyph markers
    pub fn new(markers: &ExtractorMarkers) -> Result<Self, regex::Error> {
        Ok(Self {
            markers: MarkerPatterns::compile(markers)?,
        })
    }

    /// Build a record for one descriptor
    ///
    /// Returns `None` when the descriptor has no usable playback URL.
    pub fn extract(&self, descriptor: &RawDescriptor, provider: &str) -> Option<StreamRecord> {
        let url = descriptor
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| is_playable_url(url))?
            .to_string();

        let hints = Hints::new(descriptor, &self.markers);

        Some(StreamRecord {
            id: url.clone(),
            url,
            title: hints.text.to_string(),
            name: hints.name.to_string(),
            filename: hints.filename.to_string(),
            quality: first_match(&hints, QUALITY_STRATEGIES).unwrap_or_else(|| UNKNOWN.to_string()),
            seeds: first_match(&hints, SEEDS_STRATEGIES).unwrap_or(0),
            file_size: first_match(&hints, SIZE_STRATEGIES)
                .unwrap_or_else(|| UNKNOWN_SIZE.to_string()),
            source: first_match(&hints, SOURCE_STRATEGIES).unwrap_or_else(|| provider.to_string()),
            provider: provider.to_string(),
            hdr_formats: detect_hdr(&hints),
            codec: first_match(&hints, CODEC_STRATEGIES).unwrap_or_else(|| UNKNOWN.to_string()),
            is_atmos: hints.combined.contains("atmos"),
            release: first_match(&hints, RELEASE_STRATEGIES).unwrap_or_else(|| UNKNOWN.to_string()),
            audio_channels: first_match(&hints, CHANNEL_STRATEGIES)
                .unwrap_or(DEFAULT_AUDIO_CHANNELS),
        })
    }
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new(&ExtractorMarkers::default()).expect("default markers are valid patterns")
    }
}

// ============================================================================
// Binge group
// ============================================================================

/// Split a pipe-delimited binge group into trimmed, lower-cased tokens
fn split_binge_group(binge_group: &str) -> Vec<String> {
    if binge_group.trim().is_empty() {
        return Vec::new();
    }
    binge_group
        .split('|')
        .map(|token| token.trim().to_lowercase())
        .collect()
}

/// A short group whose second token is a long hex string is an identifier, not metadata
fn is_opaque_binge_group(tokens: &[String]) -> bool {
    tokens.len() <= 3
        && tokens.get(1).map_or(false, |token| {
            token.len() >= 16 && token.chars().all(|c| c.is_ascii_hexdigit())
        })
}

// ============================================================================
// Quality
// ============================================================================

fn normalize_quality(raw: &str) -> String {
    let quality = raw.trim().to_lowercase();
    if quality == "2160p" {
        "4k".to_string()
    } else {
        quality
    }
}

fn quality_from_name(hints: &Hints<'_>) -> Option<String> {
    QUALITY_PATTERN
        .captures(hints.name)
        .and_then(|caps| caps.get(1))
        .map(|m| normalize_quality(m.as_str()))
}

fn quality_from_tokens(hints: &Hints<'_>) -> Option<String> {
    hints
        .descriptive_tokens()
        .iter()
        .find(|token| QUALITY_TOKEN.is_match(token))
        .map(|token| normalize_quality(token))
}

fn quality_from_parsed_file(hints: &Hints<'_>) -> Option<String> {
    hints
        .parsed_file?
        .resolution
        .as_deref()
        .filter(|resolution| QUALITY_TOKEN.is_match(resolution.trim()))
        .map(normalize_quality)
}

// ============================================================================
// Seeds / size / source (glyph-anchored text)
// ============================================================================

fn seeds_from_text(hints: &Hints<'_>) -> Option<u32> {
    hints
        .markers
        .seeds
        .captures(hints.text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn size_from_hint(hints: &Hints<'_>) -> Option<String> {
    hints.video_size.map(format_bytes)
}

fn size_from_text(hints: &Hints<'_>) -> Option<String> {
    let caps = hints.markers.size.captures(hints.text)?;
    Some(format!("{} {}", caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

fn source_from_text(hints: &Hints<'_>) -> Option<String> {
    hints
        .markers
        .source
        .captures(hints.text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|source| !source.is_empty())
}

// ============================================================================
// HDR
// ============================================================================

/// Collect HDR tags in priority order; `SDR` only when nothing matched
fn detect_hdr(hints: &Hints<'_>) -> Vec<HdrFormat> {
    let text = &hints.combined;
    let mut formats = Vec::new();

    if DOLBY_VISION.is_match(text) {
        formats.push(HdrFormat::DolbyVision);
    }
    if HDR10_PLUS.is_match(text) {
        formats.push(HdrFormat::Hdr10Plus);
    } else if HDR10.is_match(text) {
        formats.push(HdrFormat::Hdr10);
    } else if GENERIC_HDR.is_match(text) {
        formats.push(HdrFormat::Hdr);
    }

    if formats.is_empty() {
        formats.push(HdrFormat::Sdr);
    }
    formats
}

// ============================================================================
// Codec
// ============================================================================

fn normalize_codec(raw: &str) -> Option<String> {
    let codec = raw.trim().to_lowercase().replace('.', "");
    CODEC_VOCABULARY.contains(&codec.as_str()).then_some(codec)
}

fn codec_in_text(text: &str) -> Option<String> {
    CODEC_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| normalize_codec(m.as_str()))
}

fn codec_from_tokens(hints: &Hints<'_>) -> Option<String> {
    hints
        .descriptive_tokens()
        .iter()
        .find(|token| CODEC_VOCABULARY.contains(&token.as_str()))
        .cloned()
}

fn codec_from_parsed_file(hints: &Hints<'_>) -> Option<String> {
    hints.parsed_file?.encode.as_deref().and_then(normalize_codec)
}

fn codec_from_filename(hints: &Hints<'_>) -> Option<String> {
    codec_in_text(hints.filename)
}

fn codec_from_name(hints: &Hints<'_>) -> Option<String> {
    codec_in_text(hints.name)
}

fn codec_from_text(hints: &Hints<'_>) -> Option<String> {
    codec_in_text(hints.text)
}

// ============================================================================
// Release
// ============================================================================

/// Fixed token → label table for release sources
fn release_label(token: &str) -> Option<&'static str> {
    let normalized = token
        .trim()
        .to_lowercase()
        .replace(['.', '_'], " ");
    let label = match normalized.as_str() {
        "bluray" | "blu-ray" => "BLURAY",
        "bluray remux" | "blu-ray remux" | "bluray-remux" | "remux" => "REMUX",
        "web-dl" | "webdl" => "WEB-DL",
        "webrip" | "web-rip" => "WEBRIP",
        "hdtv" => "HDTV",
        "bdrip" => "BDRIP",
        "brrip" => "BRRIP",
        "dvdrip" => "DVDRIP",
        "hdrip" => "HDRIP",
        "bdmux" => "BDMUX",
        "ts" | "hdts" | "telesync" => "TS",
        _ => return None,
    };
    Some(label)
}

fn release_in_text(text: &str) -> Option<String> {
    let matched = RELEASE_PATTERN
        .captures(text)
        .or_else(|| TELESYNC_PATTERN.captures(text))
        .and_then(|caps| caps.get(1))?
        .as_str();

    Some(
        release_label(matched)
            .map(str::to_string)
            .unwrap_or_else(|| matched.to_uppercase()),
    )
}

fn release_from_tokens(hints: &Hints<'_>) -> Option<String> {
    hints
        .descriptive_tokens()
        .iter()
        .find_map(|token| release_label(token))
        .map(str::to_string)
}

fn release_from_parsed_file(hints: &Hints<'_>) -> Option<String> {
    hints
        .parsed_file?
        .quality
        .as_deref()
        .and_then(release_label)
        .map(str::to_string)
}

fn release_from_filename(hints: &Hints<'_>) -> Option<String> {
    release_in_text(hints.filename)
}

fn release_from_name(hints: &Hints<'_>) -> Option<String> {
    release_in_text(hints.name)
}

fn release_from_text(hints: &Hints<'_>) -> Option<String> {
    release_in_text(hints.text)
}

// ============================================================================
// Audio channels
// ============================================================================

fn channels_in_text(text: &str) -> Option<u32> {
    // Sizes like "5.10 GB" look like layouts; strip them first
    let without_sizes = SIZE_PATTERN.replace_all(text, " ");
    CHANNEL_LAYOUT
        .captures(&without_sizes)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn channels_from_text(hints: &Hints<'_>) -> Option<u32> {
    channels_in_text(&format!("{} {} {}", hints.filename, hints.description, hints.title))
}

fn channels_from_parsed_file(hints: &Hints<'_>) -> Option<u32> {
    hints
        .parsed_file?
        .audio_channels
        .as_ref()?
        .iter()
        .find_map(|label| channels_in_text(label))
}

fn channels_from_tokens(hints: &Hints<'_>) -> Option<u32> {
    if hints.tokens.iter().any(|token| token.contains("7.1")) {
        Some(7)
    } else if hints.tokens.iter().any(|token| token.contains("5.1")) {
        Some(5)
    } else {
        None
    }
}
