//! Integration tests for [`ValidationSession`] over the CSV/ZIP codec.

use std::io::{Cursor, Read};

use assert_matches::assert_matches;
use padron_core::codec::TableCodec;
use padron_core::error::CoreError;
use padron_core::report::TableNotice;
use padron_core::rules::COMMENT_DUPLICATE;
use padron_core::schema::SchemaKind;
use padron_validator::codec::CsvZipCodec;
use padron_validator::config::ValidatorConfig;
use padron_validator::error::AppError;
use padron_validator::session::ValidationSession;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const PERSONS_CSV: &str = "\
CURP,NOMBRE,SEXO,EDAD,OCUPACION
AAAA010101HJCRRN01,ANA LOPEZ,H,30,DOCENTE
AAAA010101HJCRRN01,ANA LOPEZ,X,200,
";

fn session() -> ValidationSession<CsvZipCodec> {
    ValidationSession::from_config(&ValidatorConfig::default(), CsvZipCodec)
        .expect("default config builds a session")
}

fn read_entry(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid archive");
    let mut out = String::new();
    archive
        .by_name(name)
        .expect("entry exists")
        .read_to_string(&mut out)
        .expect("utf-8 entry");
    out
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn validates_loaded_csv() {
    let mut session = session();
    session.load_bytes(PERSONS_CSV.as_bytes()).unwrap();
    let report = session.validate().unwrap();

    assert_eq!(report.schema, SchemaKind::PersonRecord);
    assert_eq!(report.record_count, 2);
    let comments: Vec<(usize, &str, &str)> = report
        .entries
        .iter()
        .map(|e| (e.row, e.column.as_str(), e.comment.as_str()))
        .collect();
    assert_eq!(
        comments,
        vec![
            (3, "SEXO", "invalid value"),
            (3, "EDAD", "out of range"),
            (3, "OCUPACION", "required field"),
            (3, "CURP", COMMENT_DUPLICATE),
        ]
    );
}

#[test]
fn validate_without_upload_fails() {
    let mut session = session();
    assert_matches!(session.validate(), Err(AppError::NoTableLoaded));
    assert_matches!(session.summary(), Err(AppError::NoTableLoaded));
}

#[test]
fn new_upload_replaces_previous_report() {
    let mut session = session();
    session.load_bytes(PERSONS_CSV.as_bytes()).unwrap();
    session.validate().unwrap();
    assert!(session.report().is_some());

    session.load_bytes(b"FOO,BAR\n1,2\n").unwrap();
    assert!(session.report().is_none());
    let report = session.validate().unwrap();
    assert_eq!(report.notice, Some(TableNotice::Unrecognized));
}

#[test]
fn failed_upload_clears_previous_table() {
    let mut session = session();
    session.load_bytes(PERSONS_CSV.as_bytes()).unwrap();
    session.validate().unwrap();

    let err = session.load_bytes(b"").unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::EmptyTable));
    assert!(session.table().is_none());
    assert!(session.report().is_none());
}

#[test]
fn decode_failure_has_generic_user_message() {
    let mut session = session();
    let err = session.load_bytes(b"PK\x03\x04broken").unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Decode(_)));
    assert!(err.user_message().starts_with("The file could not be read."));
}

#[test]
fn summary_uses_configured_preview_limit() {
    let config = ValidatorConfig {
        preview_limit: 1,
        ..ValidatorConfig::default()
    };
    let mut session = ValidationSession::from_config(&config, CsvZipCodec).unwrap();
    session.load_bytes(PERSONS_CSV.as_bytes()).unwrap();
    session.validate().unwrap();

    let summary = session.summary().unwrap();
    assert!(summary.starts_with("Detected 4 possible errors:"));
    assert!(summary.ends_with("(showing only the first 1 results)"));
    assert_eq!(summary.lines().count(), 3);
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[test]
fn export_contains_original_and_errors_sheets() {
    let mut session = session();
    session.load_bytes(PERSONS_CSV.as_bytes()).unwrap();
    let artifact = session.export().unwrap();

    assert_eq!(artifact.file_name, "PUB_PERSONAS_VALIDATED.zip");
    assert_eq!(read_entry(&artifact.bytes, "ORIGINAL.csv"), PERSONS_CSV);

    let errors = read_entry(&artifact.bytes, "ERRORS.csv");
    let lines: Vec<&str> = errors.lines().collect();
    assert_eq!(lines[0], "ROW,COLUMN,VALUE,COMMENT");
    assert_eq!(lines[1], "3,SEXO,X,invalid value");
    assert_eq!(lines.len(), 5);
}

#[test]
fn exported_artifact_can_be_uploaded_again() {
    let mut session = session();
    session.load_bytes(PERSONS_CSV.as_bytes()).unwrap();
    let first = session.validate().unwrap().clone();
    let artifact = session.export().unwrap();

    session.load_bytes(&artifact.bytes).unwrap();
    let second = session.validate().unwrap();
    assert_eq!(&first, second);
}

#[test]
fn codec_reports_zip_extension() {
    assert_eq!(CsvZipCodec.extension(), "zip");
}

#[tokio::test]
async fn file_round_trip_through_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("plantilla.csv");
    tokio::fs::write(&input, PERSONS_CSV).await.unwrap();

    let mut session = session();
    session.load_file(&input).await.unwrap();
    session.validate().unwrap();
    let out_dir = dir.path().join("out");
    let written = session.export_to_dir(&out_dir).await.unwrap();

    assert_eq!(written, out_dir.join("PUB_PERSONAS_VALIDATED.zip"));
    let bytes = tokio::fs::read(&written).await.unwrap();
    assert_eq!(read_entry(&bytes, "ORIGINAL.csv"), PERSONS_CSV);
}

#[tokio::test]
async fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session();
    let result = session.load_file(&dir.path().join("absent.csv")).await;
    assert_matches!(result, Err(AppError::Io(_)));
}
