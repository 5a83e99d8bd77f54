//! Per-upload validation context.
//!
//! A [`ValidationSession`] replaces any ambient state: it owns the schema
//! registry and codec, and holds at most one loaded table and its latest
//! report. Loading a new file discards both.

use std::path::{Path, PathBuf};

use padron_core::codec::TableCodec;
use padron_core::export::{export_file_name, export_sheets};
use padron_core::report::{build_report, ValidationReport};
use padron_core::schema::SchemaRegistry;
use padron_core::table::RawTable;

use crate::config::ValidatorConfig;
use crate::error::{AppError, AppResult};

/// An encoded export ready to be saved or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct ValidationSession<C: TableCodec> {
    registry: SchemaRegistry,
    codec: C,
    preview_limit: usize,
    table: Option<RawTable>,
    report: Option<ValidationReport>,
}

impl<C: TableCodec> ValidationSession<C> {
    pub fn new(registry: SchemaRegistry, codec: C, preview_limit: usize) -> Self {
        Self {
            registry,
            codec,
            preview_limit,
            table: None,
            report: None,
        }
    }

    /// Build a session from configuration, compiling the schema registry.
    pub fn from_config(config: &ValidatorConfig, codec: C) -> AppResult<Self> {
        let registry = SchemaRegistry::with_config(&config.registry)?;
        Ok(Self::new(registry, codec, config.preview_limit))
    }

    /// Decode an uploaded file, replacing any previously loaded table.
    ///
    /// On failure the previous table is discarded too, so a stale report can
    /// never be shown for a file that failed to load.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> AppResult<&RawTable> {
        self.table = None;
        self.report = None;

        let table = self.codec.decode(bytes).inspect_err(|e| {
            tracing::warn!(error = %e, size = bytes.len(), "Failed to decode upload");
        })?;

        tracing::info!(
            rows = table.record_count(),
            columns = table.width(),
            "Loaded table",
        );
        Ok(self.table.insert(table))
    }

    /// Read `path` and load it as with [`load_bytes`](Self::load_bytes).
    pub async fn load_file(&mut self, path: &Path) -> AppResult<&RawTable> {
        let bytes = tokio::fs::read(path).await?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "Read upload");
        self.load_bytes(&bytes)
    }

    pub fn table(&self) -> Option<&RawTable> {
        self.table.as_ref()
    }

    pub fn report(&self) -> Option<&ValidationReport> {
        self.report.as_ref()
    }

    pub fn preview_limit(&self) -> usize {
        self.preview_limit
    }

    /// Validate the loaded table, replacing the previous report.
    pub fn validate(&mut self) -> AppResult<&ValidationReport> {
        let table = self.table.as_ref().ok_or(AppError::NoTableLoaded)?;
        let report = build_report(table, &self.registry);

        match &report.notice {
            Some(notice) => tracing::warn!(
                schema = %report.schema,
                notice = %notice.message(),
                "Validation stopped at table level",
            ),
            None => tracing::info!(
                schema = %report.schema,
                records = report.record_count,
                errors = report.total,
                "Validation complete",
            ),
        }

        Ok(self.report.insert(report))
    }

    /// User-facing summary of the latest report.
    pub fn summary(&self) -> AppResult<String> {
        self.report
            .as_ref()
            .map(|r| r.summary(self.preview_limit))
            .ok_or(AppError::NoTableLoaded)
    }

    /// Encode the loaded table and the latest report's errors.
    ///
    /// Validates first if no report exists yet for the loaded table.
    pub fn export(&mut self) -> AppResult<ExportArtifact> {
        if self.report.is_none() {
            self.validate()?;
        }
        let (Some(table), Some(report)) = (&self.table, &self.report) else {
            return Err(AppError::NoTableLoaded);
        };

        let sheets = export_sheets(table, report);
        let bytes = self.codec.encode(&sheets)?;
        let file_name = export_file_name(report.schema, self.codec.extension());

        tracing::info!(file_name = %file_name, size = bytes.len(), "Export encoded");
        Ok(ExportArtifact { file_name, bytes })
    }

    /// Export and write the artifact into `dir`, returning the file path.
    pub async fn export_to_dir(&mut self, dir: &Path) -> AppResult<PathBuf> {
        let artifact = self.export()?;
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&artifact.file_name);
        tokio::fs::write(&path, &artifact.bytes).await?;
        tracing::info!(path = %path.display(), "Export written");
        Ok(path)
    }
}
