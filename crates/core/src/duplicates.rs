//! Repeated identity values across the records of one table.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::normalize::canonical_key;
use crate::rules::{ErrorEntry, COMMENT_DUPLICATE};
use crate::table::cell;

/// Flag every repeat of an identity value after its first occurrence.
///
/// `records` excludes the header; the first record is reported as row 2.
/// Values are compared after canonicalisation (trim, accent strip,
/// upper-case). Blank values are never duplicates of each other.
pub fn check_duplicates(
    records: &[Vec<String>],
    identity_column: usize,
    column_name: &str,
) -> Vec<ErrorEntry> {
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    let mut errors = Vec::new();

    for (offset, record) in records.iter().enumerate() {
        let row_number = offset + 2;
        let raw = cell(record, identity_column);
        let key = canonical_key(raw);
        if key.is_empty() {
            continue;
        }

        match first_seen.entry(key) {
            Entry::Occupied(_) => {
                errors.push(ErrorEntry::new(row_number, column_name, raw, COMMENT_DUPLICATE));
            }
            Entry::Vacant(slot) => {
                slot.insert(row_number);
            }
        }
    }

    errors
}
