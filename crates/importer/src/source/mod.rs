//! Row sources: turn an input file into ordered [`RawRecord`]s.
//!
//! Spreadsheets (`.xlsx`, `.xls`, `.ods`, ...) go through calamine; `.csv`
//! files through the csv crate. Both produce a [`Sheet`] first, which is then
//! mapped onto the required column layout.

use std::path::Path;

use werkleitung_core::cell::CellValue;
use werkleitung_core::error::CoreError;
use werkleitung_core::record::{ColumnIndex, RawRecord};

use crate::error::{ImportError, SourceError};

pub mod csv;
pub mod xlsx;

pub use self::csv::CsvSource;
pub use self::xlsx::XlsxSource;

/// A header row plus data rows, as read from any tabular file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub header: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Map the rows onto the required columns.
    ///
    /// Fails before any row is looked at if a required column is absent.
    pub fn into_records(self) -> Result<Vec<RawRecord>, ImportError> {
        let index = ColumnIndex::resolve(&self.header).map_err(|err| match err {
            CoreError::MissingColumns(missing) => ImportError::MissingColumns {
                missing,
                found: self.header.clone(),
            },
            other => ImportError::Config(other.to_string()),
        })?;
        Ok(self.rows.iter().map(|row| index.record(row)).collect())
    }
}

/// Anything that can produce a header row plus data rows.
pub trait RowSource {
    fn path(&self) -> &Path;

    fn read_sheet(&self) -> Result<Sheet, SourceError>;
}

/// Whether a path should be read as CSV rather than as a workbook.
fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Pick the reader for `path` by its extension.
pub fn source_for(path: &Path) -> Box<dyn RowSource> {
    if is_csv(path) {
        Box::new(CsvSource::new(path))
    } else {
        Box::new(XlsxSource::new(path))
    }
}

/// Read the raw sheet behind a source.
pub fn read_sheet(source: &dyn RowSource) -> Result<Sheet, ImportError> {
    source
        .read_sheet()
        .map_err(|source_err| ImportError::UnreadableInput {
            path: source.path().to_path_buf(),
            source: source_err,
        })
}

/// Read every record of the input file, in source order.
pub fn read_records(path: &Path) -> Result<Vec<RawRecord>, ImportError> {
    tracing::info!(path = %path.display(), "Reading input file");
    let sheet = read_sheet(source_for(path).as_ref())?;
    let records = sheet.into_records()?;
    tracing::info!(count = records.len(), "Records read");
    Ok(records)
}

/// Convert a header cell to its column name.
fn header_name(cell: &CellValue) -> String {
    cell.as_text().unwrap_or_default()
}

/// Split the first row off as the header.
fn split_header(mut rows: Vec<Vec<CellValue>>) -> Result<Sheet, SourceError> {
    if rows.is_empty() {
        return Err(SourceError::NoHeader);
    }
    let header = rows.remove(0).iter().map(header_name).collect();
    Ok(Sheet { header, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::path::PathBuf;
    use werkleitung_core::record::REQUIRED_COLUMNS;

    #[test]
    fn csv_detection_is_case_insensitive() {
        assert!(is_csv(&PathBuf::from("daten/export.CSV")));
        assert!(!is_csv(&PathBuf::from("daten/export.xlsx")));
        assert!(!is_csv(&PathBuf::from("daten/export")));
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let source = source_for(Path::new("/nonexistent/leitungen.xlsx"));
        assert_matches!(
            read_sheet(source.as_ref()),
            Err(ImportError::UnreadableInput { path, .. }) if path.ends_with("leitungen.xlsx")
        );
    }

    #[test]
    fn missing_columns_report_what_was_found() {
        let sheet = Sheet {
            header: vec!["Leitung_ID".into(), "Material".into()],
            rows: vec![],
        };
        assert_matches!(
            sheet.into_records(),
            Err(ImportError::MissingColumns { missing, found })
                if missing.len() == 7 && found == ["Leitung_ID", "Material"]
        );
    }

    #[test]
    fn rows_map_to_records() {
        let sheet = Sheet {
            header: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: vec![vec![CellValue::text("L_00001"), CellValue::text("PE")]],
        };
        let records = sheet.into_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].material, CellValue::text("PE"));
        assert_eq!(records[0].x_start, CellValue::Empty);
    }

    #[test]
    fn empty_file_has_no_header() {
        assert_matches!(split_header(Vec::new()), Err(SourceError::NoHeader));
    }
}
