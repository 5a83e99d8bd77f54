//! The two-sheet export artifact: original rows plus detected errors.

use serde::{Deserialize, Serialize};

use crate::report::ValidationReport;
use crate::schema::SchemaKind;
use crate::table::RawTable;

pub const ORIGINAL_SHEET: &str = "ORIGINAL";
pub const ERRORS_SHEET: &str = "ERRORS";
pub const ERRORS_HEADER: [&str; 4] = ["ROW", "COLUMN", "VALUE", "COMMENT"];

/// A named grid of text cells handed to a [`crate::codec::TableCodec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

/// Build the `ORIGINAL` and `ERRORS` sheets, in that order.
///
/// `ORIGINAL` reproduces the table verbatim, header included. `ERRORS`
/// starts with [`ERRORS_HEADER`] followed by one row per report entry.
pub fn export_sheets(table: &RawTable, report: &ValidationReport) -> Vec<Sheet> {
    let mut error_rows = Vec::with_capacity(report.entries.len() + 1);
    error_rows.push(ERRORS_HEADER.iter().map(|h| h.to_string()).collect());
    error_rows.extend(report.entries.iter().map(|e| {
        vec![
            e.row.to_string(),
            e.column.clone(),
            e.value.clone(),
            e.comment.clone(),
        ]
    }));

    vec![
        Sheet {
            name: ORIGINAL_SHEET.to_string(),
            rows: table.rows().to_vec(),
        },
        Sheet {
            name: ERRORS_SHEET.to_string(),
            rows: error_rows,
        },
    ]
}

/// Download name by convention: `<SCHEMA-NAME>_VALIDATED.<ext>`.
///
/// ```
/// use padron_core::export::export_file_name;
/// use padron_core::schema::SchemaKind;
///
/// assert_eq!(export_file_name(SchemaKind::PersonRecord, "zip"), "PUB_PERSONAS_VALIDATED.zip");
/// ```
pub fn export_file_name(schema: SchemaKind, extension: &str) -> String {
    format!("{}_VALIDATED.{extension}", schema.as_str())
}
