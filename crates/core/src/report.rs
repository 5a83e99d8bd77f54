//! Orchestration of one validation run and the resulting report.
//!
//! `build_report` is deterministic: the same table and registry always
//! produce the same entries in the same order (field errors row by row,
//! then duplicate errors row by row).

use serde::{Deserialize, Serialize};

use crate::duplicates::check_duplicates;
use crate::error::CoreError;
use crate::rules::{validate_row, ErrorEntry};
use crate::schema::{SchemaKind, SchemaRegistry};
use crate::table::RawTable;

/// Default number of entries rendered by [`ValidationReport::summary`].
pub const DEFAULT_PREVIEW_LIMIT: usize = 10;

/// A table-level condition that stopped per-row validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "columns", rename_all = "snake_case")]
pub enum TableNotice {
    Unrecognized,
    MissingColumns(Vec<String>),
}

impl TableNotice {
    pub fn message(&self) -> String {
        self.to_error().to_string()
    }

    fn to_error(&self) -> CoreError {
        match self {
            Self::Unrecognized => CoreError::UnrecognizedSchema,
            Self::MissingColumns(cols) => CoreError::MissingColumns(cols.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub schema: SchemaKind,
    pub record_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<TableNotice>,
    pub entries: Vec<ErrorEntry>,
    pub total: usize,
}

impl ValidationReport {
    fn with_notice(schema: SchemaKind, record_count: usize, notice: TableNotice) -> Self {
        Self {
            schema,
            record_count,
            notice: Some(notice),
            entries: Vec::new(),
            total: 0,
        }
    }

    /// `true` when the table was validated and no entry was produced.
    pub fn is_clean(&self) -> bool {
        self.notice.is_none() && self.entries.is_empty()
    }

    /// Convert a report carrying a table-level notice into the matching
    /// abort error; reports that ran per-row validation pass through.
    pub fn into_result(self) -> Result<Self, CoreError> {
        match &self.notice {
            Some(notice) => Err(notice.to_error()),
            None => Ok(self),
        }
    }

    /// User-facing text rendering, listing at most `preview_limit` entries.
    pub fn summary(&self, preview_limit: usize) -> String {
        if let Some(notice) = &self.notice {
            return notice.message();
        }
        if self.entries.is_empty() {
            return format!(
                "Validation complete: {} records without errors.",
                self.record_count
            );
        }

        let mut lines = vec![format!("Detected {} possible errors:", self.total)];
        lines.extend(self.entries.iter().take(preview_limit).map(|e| {
            format!("Row {}, {}: {} ({})", e.row, e.column, e.comment, e.value)
        }));
        if self.entries.len() > preview_limit {
            lines.push(format!("(showing only the first {preview_limit} results)"));
        }
        lines.join("\n")
    }
}

/// Classify, check required columns, validate every record, and detect
/// repeated identity values.
pub fn build_report(table: &RawTable, registry: &SchemaRegistry) -> ValidationReport {
    let header = table.header();
    let record_count = table.record_count();

    let Some(schema) = registry.classify(header) else {
        return ValidationReport::with_notice(
            SchemaKind::Unrecognized,
            record_count,
            TableNotice::Unrecognized,
        );
    };

    let missing = schema.missing_columns(header);
    if !missing.is_empty() {
        return ValidationReport::with_notice(
            schema.kind,
            record_count,
            TableNotice::MissingColumns(missing),
        );
    }

    let index = table.header_index();
    let mut entries: Vec<ErrorEntry> = table
        .records()
        .iter()
        .enumerate()
        .flat_map(|(offset, record)| validate_row(&schema.rules, record, offset + 2, &index))
        .collect();

    if let Some(column) = &schema.identity_column {
        if let Some(position) = index.position(column) {
            entries.extend(check_duplicates(table.records(), position, column));
        }
    }

    let total = entries.len();
    ValidationReport {
        schema: schema.kind,
        record_count,
        notice: None,
        entries,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::COMMENT_REQUIRED;
    use crate::schema::RegistryConfig;

    fn table(rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    fn registry() -> SchemaRegistry {
        SchemaRegistry::with_config(&RegistryConfig::default()).unwrap()
    }

    const HEADER: &[&str] = &["CURP", "NOMBRE", "SEXO", "EDAD", "OCUPACION"];

    #[test]
    fn clean_table_summary() {
        let t = table(&[HEADER, &["AAAA010101HJCRRN01", "ANA", "M", "30", "DOCENTE"]]);
        let report = build_report(&t, &registry());
        assert!(report.is_clean());
        assert_eq!(report.summary(10), "Validation complete: 1 records without errors.");
    }

    #[test]
    fn summary_truncates_to_preview_limit() {
        let mut rows: Vec<&[&str]> = vec![HEADER];
        let first: &[&str] = &["AAAA010101HJCRRN01"];
        let second: &[&str] = &["BBBB010101HJCRRN01"];
        rows.push(first);
        rows.push(second);
        let report = build_report(&table(&rows), &registry());
        // Each short row misses NOMBRE, SEXO, EDAD and OCUPACION.
        assert_eq!(report.total, 8);

        let text = report.summary(3);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Detected 8 possible errors:");
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], format!("Row 2, NOMBRE: {COMMENT_REQUIRED} ()"));
        assert_eq!(lines[4], "(showing only the first 3 results)");
    }

    #[test]
    fn notice_summary_is_the_error_message() {
        let report = build_report(&table(&[&["FOO"]]), &registry());
        assert_eq!(report.summary(10), "File type not recognized");
    }

    #[test]
    fn into_result_maps_notices() {
        let report = build_report(&table(&[&["CURP", "NOMBRE"]]), &registry());
        assert_eq!(
            report.into_result(),
            Err(CoreError::MissingColumns(vec![
                "SEXO".into(),
                "EDAD".into(),
                "OCUPACION".into()
            ]))
        );
    }

    #[test]
    fn header_only_table_is_clean() {
        let report = build_report(&table(&[HEADER]), &registry());
        assert!(report.is_clean());
        assert_eq!(report.record_count, 0);
    }

    #[test]
    fn report_serializes_notice_tag() {
        let report = build_report(&table(&[&["CURP", "NOMBRE"]]), &registry());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["schema"], "person_record");
        assert_eq!(json["notice"]["kind"], "missing_columns");
        assert_eq!(json["notice"]["columns"][0], "SEXO");
    }
}
