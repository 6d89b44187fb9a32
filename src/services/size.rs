//! File size formatting and parsing
//!
//! Sizes travel as display strings (`"12.34 GB"`), so filtering and sorting
//! parse them back with the same `<number><unit>` grammar used during
//! extraction. Units are binary: GB and GiB both mean 1024³ bytes.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::UNKNOWN_SIZE;

pub const MIB: u64 = 1024 * 1024;
pub const GIB: u64 = 1024 * 1024 * 1024;

lazy_static! {
    /// `<number><unit>` with unit in GB/MB/GiB/MiB
    pub static ref SIZE_PATTERN: Regex = Regex::new(r"(?i)([\d.]+)\s*(GiB|MiB|GB|MB)\b").unwrap();
}

/// Format a byte count as `"X.XX GB"` (at least 1 GiB) or `"X.XX MB"`
pub fn format_bytes(bytes: u64) -> String {
    if bytes >= GIB {
        format!("{:.2} GB", bytes as f64 / GIB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MIB as f64)
    }
}

/// Parse a size string back into bytes
///
/// Returns `None` for the `"Unknown"` sentinel or any text without a
/// recognizable `<number><unit>` pair.
pub fn parse_size(text: &str) -> Option<u64> {
    if text.is_empty() || text == UNKNOWN_SIZE {
        return None;
    }

    let caps = SIZE_PATTERN.captures(text)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }

    let multiplier = match caps.get(2)?.as_str().to_uppercase().as_str() {
        "GB" | "GIB" => GIB,
        "MB" | "MIB" => MIB,
        _ => return None,
    };

    Some((value * multiplier as f64).round() as u64)
}

/// Byte count used for ordering; unparsable sizes sort as zero
pub fn size_sort_key(text: &str) -> u64 {
    parse_size(text).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(2_147_483_648), "2.00 GB");
        assert_eq!(format_bytes(GIB), "1.00 GB");
        assert_eq!(format_bytes(500 * MIB), "500.00 MB");
        assert_eq!(format_bytes(13_249_974_108), "12.34 GB");
    }

    #[test]
    fn test_round_trip_within_rounding() {
        assert_eq!(parse_size(&format_bytes(2_147_483_648)), Some(2_147_483_648));
        assert_eq!(parse_size(&format_bytes(500 * MIB)), Some(500 * MIB));

        let original = 9_126_805_504u64; // 8.50 GiB
        let parsed = parse_size(&format_bytes(original)).unwrap();
        assert!(parsed.abs_diff(original) <= GIB / 200);
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_size("1 GiB"), Some(GIB));
        assert_eq!(parse_size("1.5GB"), Some(GIB + GIB / 2));
        assert_eq!(parse_size("750 MiB"), Some(750 * MIB));
        assert_eq!(parse_size("29.35 gb"), Some((29.35 * GIB as f64).round() as u64));
    }

    #[test]
    fn test_parse_unknown_or_garbage() {
        assert_eq!(parse_size(UNKNOWN_SIZE), None);
        assert_eq!(parse_size(""), None);
        assert_eq!(parse_size("12 TB"), None);
        assert_eq!(parse_size("big"), None);
        assert_eq!(parse_size(". GB"), None);
        assert_eq!(size_sort_key("Unknown"), 0);
    }
}
