use padron_core::error::CoreError;

/// Application-level error type for the validator.
///
/// Wraps [`CoreError`] for domain failures and adds I/O and format errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `padron_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Configuration error: {0}")]
    Config(String),

    /// `validate` or `export` called before any file was loaded.
    #[error("No file has been loaded")]
    NoTableLoaded,
}

/// Convenience alias for validator results.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Message suitable for showing to the person who uploaded the file.
    ///
    /// Decode failures collapse into one generic message; the details are
    /// only for logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Core(CoreError::Decode(_)) | Self::Csv(_) | Self::Zip(_) => {
                "The file could not be read. Check that it is a valid spreadsheet and upload it again."
                    .to_string()
            }
            other => other.to_string(),
        }
    }
}
