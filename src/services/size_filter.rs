//! Size policy filtering

use crate::models::{SizeBounds, StreamRecord};
use crate::services::size::parse_size;

/// Keep records whose parsed size lies within `bounds`
///
/// Records with an unknown, unparsable or zero size are always dropped.
pub fn filter_by_size(records: Vec<StreamRecord>, bounds: SizeBounds) -> Vec<StreamRecord> {
    records
        .into_iter()
        .filter(|record| {
            parse_size(&record.file_size)
                .filter(|bytes| *bytes > 0)
                .map_or(false, |bytes| bounds.contains(bytes))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN_SIZE;
    use crate::services::dedup::tests::record;
    use crate::services::size::{GIB, MIB};

    #[test]
    fn test_unknown_always_excluded() {
        let records = vec![
            record("Torrentio", "a.mkv", UNKNOWN_SIZE),
            record("Torrentio", "b.mkv", "garbage"),
            record("Torrentio", "z.mkv", "0 MB"),
            record("Torrentio", "c.mkv", "1.50 GB"),
        ];
        let kept = filter_by_size(records, SizeBounds::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].filename, "c.mkv");
    }

    #[test]
    fn test_bounds_are_inclusive_and_independent() {
        let records = vec![
            record("Torrentio", "small.mkv", "300 MB"),
            record("Torrentio", "edge.mkv", "1 GB"),
            record("Torrentio", "big.mkv", "30 GB"),
        ];

        let min_only = SizeBounds { min: Some(GIB), max: None };
        let kept = filter_by_size(records.clone(), min_only);
        assert_eq!(kept.len(), 2);

        let max_only = SizeBounds { min: None, max: Some(GIB) };
        let kept = filter_by_size(records.clone(), max_only);
        assert_eq!(kept.len(), 2);

        let both = SizeBounds { min: Some(500 * MIB), max: Some(10 * GIB) };
        let kept = filter_by_size(records, both);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].filename, "edge.mkv");
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            record("Torrentio", "a.mkv", "300 MB"),
            record("AIOStreams", "b.mkv", "4.2 GiB"),
            record("AIOStreams", "c.mkv", UNKNOWN_SIZE),
        ];
        let bounds = SizeBounds { min: Some(GIB), max: None };
        let once = filter_by_size(records, bounds);
        let twice = filter_by_size(once.clone(), bounds);
        assert_eq!(once, twice);
    }
}
