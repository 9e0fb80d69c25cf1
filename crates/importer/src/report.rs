//! Per-run error report.
//!
//! Rejected rows are written next to the input as `<stem>_fehler.csv`, or
//! `<stem>_fehler.txt` when the input itself is a CSV file: UTF-8 with a byte
//! order mark so spreadsheet tools pick the right encoding, columns `zeile`,
//! `leitung_id`, `fehler`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use werkleitung_core::import::ErrorAccumulator;

use crate::error::ReportError;

pub const REPORT_SUFFIX: &str = "_fehler";

const REPORT_EXTENSION: &str = "csv";
/// Used when the input already has the report's extension.
const FALLBACK_EXTENSION: &str = "txt";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Where the report for `input` goes.
pub fn error_report_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "import".to_string());
    let input_is_csv = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(REPORT_EXTENSION));
    let extension = if input_is_csv { FALLBACK_EXTENSION } else { REPORT_EXTENSION };
    input.with_file_name(format!("{stem}{REPORT_SUFFIX}.{extension}"))
}

/// Write the report. Nothing is written when there are no errors.
pub fn write_error_report(input: &Path, errors: &ErrorAccumulator) -> Result<Option<PathBuf>, ReportError> {
    if errors.is_empty() {
        return Ok(None);
    }

    let path = error_report_path(input);
    let io_err = |source| ReportError::Io {
        path: path.clone(),
        source,
    };
    let csv_err = |source| ReportError::Csv {
        path: path.clone(),
        source,
    };

    let mut out = BufWriter::new(File::create(&path).map_err(io_err)?);
    out.write_all(UTF8_BOM).map_err(io_err)?;

    let mut writer = csv::Writer::from_writer(out);
    for error in errors {
        writer.serialize(error).map_err(csv_err)?;
    }
    writer.flush().map_err(io_err)?;

    tracing::info!(path = %path.display(), count = errors.len(), "Error report written");
    Ok(Some(path))
}
