//! Size ordering

use std::cmp::Reverse;

use crate::models::{SortDirection, StreamRecord};
use crate::services::size::size_sort_key;

/// Order records by parsed size; ties keep their input order
pub fn sort_by_size(records: &mut [StreamRecord], direction: SortDirection) {
    match direction {
        SortDirection::SizeAsc => records.sort_by_key(|record| size_sort_key(&record.file_size)),
        SortDirection::SizeDesc => {
            records.sort_by_key(|record| Reverse(size_sort_key(&record.file_size)))
        }
    }
}
