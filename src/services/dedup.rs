//! Filename-based deduplication across providers

use std::collections::HashSet;

use tracing::debug;

use crate::models::StreamRecord;

/// Drop records whose filename was already seen, keeping the preferred provider's copy
///
/// Records are first stable-sorted so the preferred provider comes first.
/// Filenames are compared trimmed and lower-cased; records without a
/// filename are always kept.
pub fn deduplicate(records: Vec<StreamRecord>, preferred_provider: &str) -> Vec<StreamRecord> {
    let mut records = records;
    records.sort_by_key(|record| !record.provider.eq_ignore_ascii_case(preferred_provider));

    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            let key = record.filename.trim().to_lowercase();
            if key.is_empty() || seen.insert(key) {
                true
            } else {
                debug!(
                    "Dropping duplicate '{}' from {}",
                    record.filename, record.provider
                );
                false
            }
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::HdrFormat;

    pub(crate) fn record(provider: &str, filename: &str, size: &str) -> StreamRecord {
        let url = format!("https://{}.example/{}/{}", provider.to_lowercase(), filename, size);
        StreamRecord {
            id: url.clone(),
            url,
            title: String::new(),
            name: String::new(),
            filename: filename.to_string(),
            quality: "unknown".to_string(),
            seeds: 0,
            file_size: size.to_string(),
            source: provider.to_string(),
            provider: provider.to_string(),
            hdr_formats: vec![HdrFormat::Sdr],
            codec: "unknown".to_string(),
            is_atmos: false,
            release: "unknown".to_string(),
            audio_channels: 2,
        }
    }

    #[test]
    fn test_preferred_provider_survives() {
        let records = vec![
            record("AIOStreams", "Show.S01E01.720p.mkv", "1.00 GB"),
            record("Torrentio", "Show.S01E01.720p.mkv", "1.00 GB"),
        ];
        let result = deduplicate(records, "Torrentio");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].provider, "Torrentio");
    }

    #[test]
    fn test_filename_normalization() {
        let records = vec![
            record("Torrentio", "  Movie.MKV ", "1 GB"),
            record("Torrentio", "movie.mkv", "2 GB"),
        ];
        let result = deduplicate(records, "Torrentio");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].file_size, "1 GB");
    }

    #[test]
    fn test_empty_filenames_are_kept() {
        let records = vec![
            record("Torrentio", "", "1 GB"),
            record("AIOStreams", "", "1 GB"),
            record("AIOStreams", "  ", "2 GB"),
        ];
        assert_eq!(deduplicate(records, "Torrentio").len(), 3);
    }

    #[test]
    fn test_order_is_preferred_first_then_stable() {
        let records = vec![
            record("AIOStreams", "a.mkv", "1 GB"),
            record("Torrentio", "b.mkv", "1 GB"),
            record("AIOStreams", "c.mkv", "1 GB"),
            record("Torrentio", "d.mkv", "1 GB"),
        ];
        let names: Vec<_> = deduplicate(records, "Torrentio")
            .into_iter()
            .map(|r| r.filename)
            .collect();
        assert_eq!(names, vec!["b.mkv", "d.mkv", "a.mkv", "c.mkv"]);
    }
}
