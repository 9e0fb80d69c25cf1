//! One import run, end to end.
//!
//! Read the input, validate every row, write the error report, then upsert
//! the accepted segments in one transaction. The database is only contacted
//! when there is something to write.

use std::future::Future;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use werkleitung_core::import::{process_records, ProcessedBatch};
use werkleitung_core::validation::{RecordValidator, ValidationSettings};

use crate::error::ImportError;
use crate::report::write_error_report;
use crate::sink::SegmentSink;
use crate::source::read_records;

const BANNER: &str = "============================================================";

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportOutcome {
    /// The batch was committed.
    Imported,
    /// No row passed validation; the database was not contacted.
    NothingToImport,
    /// Validation only; the database was not contacted.
    DryRun,
}

/// Totals for a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSummary {
    pub input: PathBuf,
    pub total_records: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub written: u64,
    pub outcome: ImportOutcome,
    pub error_report: Option<PathBuf>,
}

impl ImportSummary {
    fn new(input: &Path, batch: &ProcessedBatch, outcome: ImportOutcome) -> Self {
        Self {
            input: input.to_path_buf(),
            total_records: batch.total_records,
            accepted: batch.accepted(),
            rejected: batch.rejected(),
            written: 0,
            outcome,
            error_report: None,
        }
    }

    fn log(&self) {
        tracing::info!("{BANNER}");
        tracing::info!(
            input = %self.input.display(),
            outcome = ?self.outcome,
            "Import finished"
        );
        tracing::info!(total = self.total_records, "Records read");
        tracing::info!(accepted = self.accepted, "Records valid");
        tracing::info!(rejected = self.rejected, "Records rejected");
        tracing::info!(written = self.written, "Records written");
        if let Some(path) = &self.error_report {
            tracing::info!(path = %path.display(), "Error report");
        }
        tracing::info!("{BANNER}");
    }
}

/// Drives import runs with a fixed set of validation settings.
#[derive(Debug, Clone, Default)]
pub struct Importer {
    validator: RecordValidator,
}

impl Importer {
    pub fn new(settings: ValidationSettings) -> Self {
        Self {
            validator: RecordValidator::new(settings),
        }
    }

    /// Read and validate `input`. Structural problems abort here.
    pub fn prepare(&self, input: &Path) -> Result<ProcessedBatch, ImportError> {
        let records = read_records(input)?;
        let batch = process_records(records, &self.validator, Utc::now);

        for error in &batch.errors {
            tracing::warn!(row = error.row, leitung_id = %error.leitung_id, "{}", error.reason);
        }
        for dup in &batch.duplicates {
            tracing::warn!(
                leitung_id = %dup.leitung_id,
                first_row = dup.first_row,
                row = dup.row,
                "Duplicate Leitung_ID in input, later row overwrites earlier one"
            );
        }
        tracing::info!(
            accepted = batch.accepted(),
            rejected = batch.rejected(),
            "Validation finished"
        );
        Ok(batch)
    }

    /// Validate and report without touching the database.
    pub fn dry_run(&self, input: &Path) -> Result<ImportSummary, ImportError> {
        let batch = self.prepare(input)?;
        let mut summary = ImportSummary::new(input, &batch, ImportOutcome::DryRun);
        summary.error_report = report(input, &batch);
        summary.log();
        Ok(summary)
    }

    /// Full run. `connect` is awaited only if at least one segment is valid.
    ///
    /// The error report is written whatever happens after validation,
    /// including a failed connection or a rolled-back write.
    pub async fn run<S, F, Fut>(&self, input: &Path, connect: F) -> Result<ImportSummary, ImportError>
    where
        S: SegmentSink,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<S, ImportError>>,
    {
        let batch = self.prepare(input)?;
        let error_report = report(input, &batch);

        if batch.segments.is_empty() {
            tracing::warn!("No valid records to import");
            let mut summary = ImportSummary::new(input, &batch, ImportOutcome::NothingToImport);
            summary.error_report = error_report;
            summary.log();
            return Ok(summary);
        }

        let mut sink = connect().await?;
        let written = sink
            .upsert_batch(&batch.segments)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Batch write failed, transaction rolled back");
                ImportError::Write(e)
            })?;
        tracing::info!(written, "Transaction committed");

        let mut summary = ImportSummary::new(input, &batch, ImportOutcome::Imported);
        summary.written = written;
        summary.error_report = error_report;
        summary.log();
        Ok(summary)
    }
}

/// Best-effort error report; a failure is only logged.
fn report(input: &Path, batch: &ProcessedBatch) -> Option<PathBuf> {
    match write_error_report(input, &batch.errors) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(error = %e, "Error report could not be written");
            None
        }
    }
}
