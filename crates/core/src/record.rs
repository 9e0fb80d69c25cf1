//! Raw input records and the spreadsheet column layout.

use chrono::NaiveDate;

use crate::cell::CellValue;
use crate::error::CoreError;
use crate::geometry::LineGeometry;
use crate::types::Timestamp;

// ── Column identifiers ───────────────────────────────────────────────

pub const COL_LEITUNG_ID: &str = "Leitung_ID";
pub const COL_MATERIAL: &str = "Material";
pub const COL_DURCHMESSER: &str = "Durchmesser_mm";
pub const COL_X_START: &str = "X_Start";
pub const COL_Y_START: &str = "Y_Start";
pub const COL_X_END: &str = "X_End";
pub const COL_Y_END: &str = "Y_End";
pub const COL_VERLEGEDATUM: &str = "Verlegedatum";
pub const COL_BEMERKUNG: &str = "Bemerkung";

/// Every column an input file must carry, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    COL_LEITUNG_ID,
    COL_MATERIAL,
    COL_DURCHMESSER,
    COL_X_START,
    COL_Y_START,
    COL_X_END,
    COL_Y_END,
    COL_VERLEGEDATUM,
    COL_BEMERKUNG,
];

// ── Types ────────────────────────────────────────────────────────────

/// One spreadsheet row, unvalidated.
///
/// Any field may be empty or malformed; nothing is enforced until the
/// record passes through [`crate::validation::RecordValidator`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub leitung_id: CellValue,
    pub material: CellValue,
    pub durchmesser_mm: CellValue,
    pub x_start: CellValue,
    pub y_start: CellValue,
    pub x_end: CellValue,
    pub y_end: CellValue,
    pub verlegedatum: CellValue,
    pub bemerkung: CellValue,
}

/// A record that passed every validation step.
///
/// Built once by the validator and never mutated afterwards. Both geometry
/// vertices lie inside the configured envelope and the line is at least the
/// configured minimum length.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSegment {
    pub leitung_id: String,
    pub material: Option<String>,
    pub durchmesser_mm: i32,
    pub verlegedatum: NaiveDate,
    /// Empty when the source cell was empty.
    pub bemerkung: String,
    pub geometry: LineGeometry,
    pub imported_at: Timestamp,
}

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    positions: [usize; REQUIRED_COLUMNS.len()],
}

impl ColumnIndex {
    /// Locate every required column in `header`.
    ///
    /// Header names are compared after trimming. Extra columns are ignored;
    /// if a name appears twice the first occurrence wins. Fails with
    /// [`CoreError::MissingColumns`] listing every absent column.
    pub fn resolve<S: AsRef<str>>(header: &[S]) -> Result<Self, CoreError> {
        let mut positions = [0usize; REQUIRED_COLUMNS.len()];
        let mut missing = Vec::new();

        for (slot, name) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            match header.iter().position(|h| h.as_ref().trim() == name) {
                Some(pos) => *slot = pos,
                None => missing.push(name.to_string()),
            }
        }

        if missing.is_empty() {
            Ok(Self { positions })
        } else {
            Err(CoreError::MissingColumns(missing))
        }
    }

    /// Pick the required cells out of a data row.
    ///
    /// Rows shorter than the header yield empty cells for the missing tail.
    pub fn record(&self, row: &[CellValue]) -> RawRecord {
        let cell = |i: usize| row.get(self.positions[i]).cloned().unwrap_or_default();
        RawRecord {
            leitung_id: cell(0),
            material: cell(1),
            durchmesser_mm: cell(2),
            x_start: cell(3),
            y_start: cell(4),
            x_end: cell(5),
            y_end: cell(6),
            verlegedatum: cell(7),
            bemerkung: cell(8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn resolves_columns_in_any_order() {
        let header = [
            "Bemerkung",
            "Verlegedatum",
            "Y_End",
            "X_End",
            "Y_Start",
            "X_Start",
            "Durchmesser_mm",
            "Material",
            "Leitung_ID",
        ];
        let index = ColumnIndex::resolve(&header).unwrap();
        let row: Vec<CellValue> = (0..9).map(|i| CellValue::Number(i as f64)).collect();
        let record = index.record(&row);
        assert_eq!(record.leitung_id, CellValue::Number(8.0));
        assert_eq!(record.bemerkung, CellValue::Number(0.0));
    }

    #[test]
    fn header_names_are_trimmed() {
        let mut header: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        header[0] = " Leitung_ID  ".to_string();
        assert!(ColumnIndex::resolve(&header).is_ok());
    }

    #[test]
    fn reports_every_missing_column() {
        let header = ["Leitung_ID", "Material", "X_Start", "Y_Start", "Verlegedatum"];
        assert_matches!(
            ColumnIndex::resolve(&header),
            Err(CoreError::MissingColumns(missing))
                if missing == ["Durchmesser_mm", "X_End", "Y_End", "Bemerkung"]
        );
    }

    #[test]
    fn extra_columns_are_ignored() {
        let mut header: Vec<&str> = vec!["Unused"];
        header.extend(REQUIRED_COLUMNS);
        let index = ColumnIndex::resolve(&header).unwrap();
        let mut row = vec![CellValue::text("ignored")];
        row.push(CellValue::text("L_00001"));
        assert_eq!(index.record(&row).leitung_id, CellValue::text("L_00001"));
    }

    #[test]
    fn short_rows_yield_empty_cells() {
        let index = ColumnIndex::resolve(&REQUIRED_COLUMNS).unwrap();
        let record = index.record(&[CellValue::text("L_00001")]);
        assert_eq!(record.leitung_id, CellValue::text("L_00001"));
        assert_eq!(record.y_end, CellValue::Empty);
    }
}
