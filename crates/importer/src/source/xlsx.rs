//! Workbook reader (xlsx, xls, xlsb, ods) backed by calamine.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use werkleitung_core::cell::CellValue;

use crate::error::SourceError;

use super::{split_header, RowSource, Sheet};

/// The first worksheet of a workbook.
#[derive(Debug, Clone)]
pub struct XlsxSource {
    path: PathBuf,
}

impl XlsxSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RowSource for XlsxSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_sheet(&self) -> Result<Sheet, SourceError> {
        read_sheet(&self.path)
    }
}

/// Read the first worksheet of a workbook.
pub fn read_sheet(path: &Path) -> Result<Sheet, SourceError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SourceError::NoWorksheet)??;

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_value).collect())
        .collect();
    split_header(rows)
}

/// Convert a calamine cell into a [`CellValue`].
pub(crate) fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::text(s),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) if dt.is_duration() => CellValue::Number(dt.as_f64()),
        // Honours the workbook's 1900/1904 date system and the 1900 leap-day bug.
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::Date)
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s),
        Data::Error(e) => CellValue::Text(format!("#{e:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use chrono::NaiveDate;

    fn date_cell(serial: f64, is_1904: bool) -> Data {
        Data::DateTime(ExcelDateTime::new(serial, ExcelDateTimeType::DateTime, is_1904))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn numeric_cells_keep_their_value() {
        assert_eq!(cell_value(&Data::Int(2_683_000)), CellValue::Number(2_683_000.0));
        assert_eq!(cell_value(&Data::Float(1_248_000.25)), CellValue::Number(1_248_000.25));
    }

    #[test]
    fn blank_strings_are_empty() {
        assert_eq!(cell_value(&Data::String("   ".into())), CellValue::Empty);
        assert_eq!(cell_value(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn iso_datetime_strings_become_text() {
        assert_eq!(
            cell_value(&Data::DateTimeIso("2020-01-15T00:00:00".into())),
            CellValue::text("2020-01-15T00:00:00")
        );
    }

    #[test]
    fn date_cell_converts_to_calendar_date() {
        let CellValue::Date(dt) = cell_value(&date_cell(43845.5, false)) else {
            panic!("expected a date cell");
        };
        assert_eq!(dt.date(), date(2020, 1, 15));
        assert_eq!(dt.format("%H:%M").to_string(), "12:00");
    }

    #[test]
    fn date_cell_in_1904_workbook_uses_1904_epoch() {
        assert_eq!(
            cell_value(&date_cell(43845.0, true)),
            CellValue::Date(date(2024, 1, 16).and_hms_opt(0, 0, 0).unwrap())
        );
    }

    #[test]
    fn duration_cell_stays_numeric() {
        let cell = Data::DateTime(ExcelDateTime::new(1.5, ExcelDateTimeType::TimeDelta, false));
        assert_eq!(cell_value(&cell), CellValue::Number(1.5));
    }
}
