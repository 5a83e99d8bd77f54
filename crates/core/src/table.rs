//! In-memory representation of a decoded spreadsheet.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::normalize::canonical_key;

/// An uploaded sheet: row 0 is the header, every other row is a record.
///
/// Rows may be ragged; a short row behaves as if padded with empty cells up
/// to the header width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawTable {
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table from decoded rows. Fails with [`CoreError::EmptyTable`]
    /// when there is not even a header row.
    pub fn new(rows: Vec<Vec<String>>) -> Result<Self, CoreError> {
        if rows.is_empty() {
            return Err(CoreError::EmptyTable);
        }
        Ok(Self { rows })
    }

    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Data rows, excluding the header.
    pub fn records(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or_default()
    }

    /// All rows including the header, exactly as decoded.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn record_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    pub fn width(&self) -> usize {
        self.header().len()
    }

    pub fn header_index(&self) -> HeaderIndex {
        HeaderIndex::from_header(self.header())
    }
}

/// Read a cell from a possibly short row; missing cells read as `""`.
pub fn cell(row: &[String], column: usize) -> &str {
    row.get(column).map(String::as_str).unwrap_or("")
}

/// Canonical column name to column position.
///
/// When a header repeats a column, the leftmost occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderIndex {
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn from_header(header: &[String]) -> Self {
        let mut positions = HashMap::new();
        for (idx, name) in header.iter().enumerate() {
            let key = canonical_key(name);
            if key.is_empty() {
                continue;
            }
            positions.entry(key).or_insert(idx);
        }
        Self { positions }
    }

    /// Position of `column`, compared canonically.
    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(&canonical_key(column)).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    /// Cell under `column` in `row`; an absent column reads as `""`.
    pub fn lookup<'a>(&self, row: &'a [String], column: &str) -> &'a str {
        self.position(column).map(|idx| cell(row, idx)).unwrap_or("")
    }
}
