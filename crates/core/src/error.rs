/// Errors that abort a validation run before any per-row report exists.
///
/// Per-field violations are never errors; they are collected as
/// [`crate::rules::ErrorEntry`] values inside the report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("The file contains no rows")]
    EmptyTable,

    #[error("File type not recognized")]
    UnrecognizedSchema,

    #[error("Missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Could not read the file: {0}")]
    Decode(String),

    #[error("Could not build the export file: {0}")]
    Encode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
