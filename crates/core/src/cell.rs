//! Typed spreadsheet cell values.
//!
//! Row sources convert whatever their file format delivers into a
//! [`CellValue`]. The accessors keep "absent" and "present but unusable"
//! apart so the validator can report the two cases differently.

use chrono::NaiveDateTime;

/// A single cell as handed over by a row source.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    /// Trimmed, non-empty text.
    Text(String),
    Number(f64),
    /// A native spreadsheet date/time cell.
    Date(NaiveDateTime),
}

/// Why a cell could not be read as the requested type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellError {
    /// The cell is empty (or holds a NaN number).
    Missing,
    /// The cell has content that does not convert; carries the raw text.
    Malformed(String),
}

impl CellValue {
    /// Build a text cell, trimming surrounding whitespace.
    ///
    /// Whitespace-only input becomes [`CellValue::Empty`].
    pub fn text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::Empty
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    /// Read the cell as a finite floating point number.
    ///
    /// Numeric text (e.g. `"2683000.5"`) is accepted.
    pub fn as_number(&self) -> Result<f64, CellError> {
        match self {
            Self::Empty => Err(CellError::Missing),
            Self::Number(n) if n.is_nan() => Err(CellError::Missing),
            Self::Number(n) if n.is_finite() => Ok(*n),
            Self::Number(n) => Err(CellError::Malformed(n.to_string())),
            Self::Text(s) => match s.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(n),
                _ => Err(CellError::Malformed(s.clone())),
            },
            Self::Date(d) => Err(CellError::Malformed(d.to_string())),
        }
    }

    /// Render the cell as text, or `None` when it is empty.
    ///
    /// Whole numbers lose their fractional part so an identifier typed as
    /// `1001` in a spreadsheet reads back as `"1001"` rather than `"1001.0"`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) if n.is_nan() => None,
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    Some((*n as i64).to_string())
                } else {
                    Some(n.to_string())
                }
            }
            Self::Date(d) => Some(d.to_string()),
        }
    }

    /// A short description of the raw content for rejection messages.
    pub fn describe(&self) -> String {
        self.as_text().unwrap_or_default()
    }
}
