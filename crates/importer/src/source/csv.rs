//! Delimited text reader.
//!
//! Files exported from Swiss-locale spreadsheet tools are usually
//! semicolon-separated and start with a UTF-8 byte order mark; both are
//! handled here.

use std::path::{Path, PathBuf};

use werkleitung_core::cell::CellValue;

use crate::error::SourceError;

use super::{RowSource, Sheet};

const BOM: char = '\u{feff}';

/// A delimited text file.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RowSource for CsvSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_sheet(&self) -> Result<Sheet, SourceError> {
        read_sheet(&self.path)
    }
}

/// Read a CSV file. The first record is the header.
pub fn read_sheet(path: &Path) -> Result<Sheet, SourceError> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

/// Parse CSV text, sniffing `;` versus `,` from the header line.
pub fn parse(content: &str) -> Result<Sheet, SourceError> {
    let content = content.strip_prefix(BOM).unwrap_or(content);
    let delimiter = sniff_delimiter(content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let header: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if header.iter().all(String::is_empty) {
        return Err(SourceError::NoHeader);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(CellValue::text).collect());
    }
    Ok(Sheet { header, rows })
}

fn sniff_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or_default();
    if first_line.matches(';').count() > first_line.matches(',').count() {
        b';'
    } else {
        b','
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const HEADER: &str =
        "Leitung_ID;Material;Durchmesser_mm;X_Start;Y_Start;X_End;Y_End;Verlegedatum;Bemerkung";

    #[test]
    fn semicolon_file_with_bom() {
        let content = format!(
            "\u{feff}{HEADER}\nL_00001;PVC;200;2683000;1248000;2683050;1248050;2010-06-01;\n"
        );
        let sheet = parse(&content).unwrap();
        assert_eq!(sheet.header[0], "Leitung_ID");
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0][0], CellValue::text("L_00001"));
        assert_eq!(sheet.rows[0][8], CellValue::Empty);
    }

    #[test]
    fn comma_file() {
        let content = HEADER.replace(';', ",") + "\nL_1,PE,110,1,2,3,4,2001-01-01,x\n";
        let sheet = parse(&content).unwrap();
        assert_eq!(sheet.header.len(), 9);
        assert_eq!(sheet.rows[0][1], CellValue::text("PE"));
    }

    #[test]
    fn quoted_fields_keep_delimiters() {
        let content = format!("{HEADER}\nL_2;PE;110;1;2;3;4;2001-01-01;\"Ecke; Strasse\"\n");
        let sheet = parse(&content).unwrap();
        assert_eq!(sheet.rows[0][8], CellValue::text("Ecke; Strasse"));
    }

    #[test]
    fn ragged_rows_are_tolerated() {
        let content = format!("{HEADER}\nL_3;PE\n");
        let sheet = parse(&content).unwrap();
        assert_eq!(sheet.rows[0].len(), 2);
    }

    #[test]
    fn empty_content_has_no_header() {
        assert_matches!(parse(""), Err(SourceError::NoHeader));
    }
}
