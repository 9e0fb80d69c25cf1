//! Sample input files for trying out the importer.
//!
//! Rows are drawn around Zurich (LV95 2683000 / 1248000) with a seeded RNG,
//! so the same seed always yields the same geometry.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_xlsxwriter::Workbook;
use serde::Serialize;
use werkleitung_core::record::REQUIRED_COLUMNS;

use crate::error::SampleError;

pub const SMALL_VALID: &str = "test_klein_gueltig.xlsx";
pub const MEDIUM_WITH_ERRORS: &str = "test_mittel_mit_fehlern.xlsx";
pub const MEDIUM_WITH_ERRORS_CSV: &str = "test_mittel_mit_fehlern.csv";
pub const LARGE: &str = "test_gross_performance.xlsx";
pub const SPECIAL_CASES: &str = "test_spezialfaelle.xlsx";

const MATERIALS: [&str; 5] = ["PE", "PVC", "Grauguss", "Stahl", "Asbestzement"];
const DIAMETERS: [i32; 7] = [80, 100, 150, 200, 250, 300, 400];
const REMARKS: [&str; 7] = [
    "Hauptleitung Quartier",
    "Hausanschluss",
    "Erneuerung 2020",
    "Sanierungsbedürftig",
    "",
    "Neue Leitung",
    "Ersatz für alte GG-Leitung",
];

const CENTER_X: f64 = 2_683_000.0;
const CENTER_Y: f64 = 1_248_000.0;
const RADIUS: i32 = 5_000;

/// One generated input row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleRow {
    #[serde(rename = "Leitung_ID")]
    pub leitung_id: String,
    #[serde(rename = "Material")]
    pub material: String,
    #[serde(rename = "Durchmesser_mm")]
    pub durchmesser_mm: i32,
    #[serde(rename = "X_Start")]
    pub x_start: f64,
    #[serde(rename = "Y_Start")]
    pub y_start: f64,
    #[serde(rename = "X_End")]
    pub x_end: Option<f64>,
    #[serde(rename = "Y_End")]
    pub y_end: f64,
    #[serde(rename = "Verlegedatum")]
    pub verlegedatum: String,
    #[serde(rename = "Bemerkung")]
    pub bemerkung: String,
}

/// Seeded row generator.
pub struct SampleGenerator {
    rng: StdRng,
    first_date: NaiveDate,
    last_date: NaiveDate,
}

impl SampleGenerator {
    /// Dates are drawn between 1950-01-01 and `last_date`.
    pub fn new(seed: u64, last_date: NaiveDate) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            first_date: NaiveDate::from_ymd_opt(1950, 1, 1).unwrap_or(NaiveDate::MIN),
            last_date,
        }
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.rng.random_range(0..items.len())]
    }

    /// `count` plausible rows, `L_00001` upwards.
    ///
    /// With `include_errors` and at least 21 rows, four faulty rows are
    /// appended: start X out of range, too short, end X missing, impossible
    /// date.
    pub fn rows(&mut self, count: usize, include_errors: bool) -> Vec<SampleRow> {
        let mut rows: Vec<SampleRow> = (1..=count).map(|i| self.row(i)).collect();
        if include_errors && count > 20 {
            let mut out_of_range = rows[5].clone();
            out_of_range.leitung_id = "L_ERR01".into();
            out_of_range.x_start = 1_000_000.0;
            out_of_range.bemerkung = "FEHLER: Koordinate außerhalb".into();

            let mut too_short = rows[10].clone();
            too_short.leitung_id = "L_ERR02".into();
            too_short.x_end = Some(too_short.x_start + 0.1);
            too_short.y_end = too_short.y_start + 0.1;
            too_short.bemerkung = "FEHLER: Zu kurz".into();

            let mut missing_end = rows[15].clone();
            missing_end.leitung_id = "L_ERR03".into();
            missing_end.x_end = None;
            missing_end.bemerkung = "FEHLER: Fehlende Koordinate".into();

            let mut bad_date = rows[20].clone();
            bad_date.leitung_id = "L_ERR04".into();
            bad_date.verlegedatum = "32.13.2020".into();
            bad_date.bemerkung = "FEHLER: Ungültiges Datum".into();

            rows.extend([out_of_range, too_short, missing_end, bad_date]);
        }
        rows
    }

    fn row(&mut self, number: usize) -> SampleRow {
        let x_start = CENTER_X + f64::from(self.rng.random_range(-RADIUS..=RADIUS));
        let y_start = CENTER_Y + f64::from(self.rng.random_range(-RADIUS..=RADIUS));
        let length = f64::from(self.rng.random_range(10..=200));
        let angle = self.rng.random_range(0.0..360.0_f64).to_radians();

        let span = (self.last_date - self.first_date).num_days().max(1) as u64;
        let offset = self.rng.random_range(0..span);
        let verlegedatum = self
            .first_date
            .checked_add_days(Days::new(offset))
            .unwrap_or(self.first_date);

        SampleRow {
            leitung_id: format!("L_{number:05}"),
            material: self.pick(&MATERIALS).to_string(),
            durchmesser_mm: *self.pick(&DIAMETERS),
            x_start,
            y_start,
            x_end: Some(round2(x_start + length * angle.cos())),
            y_end: round2(y_start + length * angle.sin()),
            verlegedatum: verlegedatum.format("%Y-%m-%d").to_string(),
            bemerkung: self.pick(&REMARKS).to_string(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Hand-picked edge cases that must all import.
pub fn special_cases() -> Vec<SampleRow> {
    let row = |id: &str, material: &str, d: i32, start: (f64, f64), end: (f64, f64), date: &str, note: &str| {
        SampleRow {
            leitung_id: id.into(),
            material: material.into(),
            durchmesser_mm: d,
            x_start: start.0,
            y_start: start.1,
            x_end: Some(end.0),
            y_end: end.1,
            verlegedatum: date.into(),
            bemerkung: note.into(),
        }
    };
    vec![
        row(
            "L_SPECIAL_01",
            "PE",
            800,
            (2_683_000.0, 1_248_000.0),
            (2_683_100.0, 1_248_100.0),
            "2020-01-15",
            "Haupttransportleitung - sehr großer Durchmesser",
        ),
        row(
            "L_SPECIAL_02",
            "Grauguss",
            150,
            (2_683_500.0, 1_248_500.0),
            (2_683_600.0, 1_248_600.0),
            "1895-06-20",
            "Historische Leitung aus Gründerzeit",
        ),
        row(
            "L_SPECIAL_03",
            "PE",
            100,
            (2_684_000.0, 1_249_000.0),
            (2_684_150.0, 1_249_150.0),
            "2015-12-31",
            "Leitung mit Spezialzeichen: äöü ÄÖÜ & < > \" ' / \\",
        ),
        row(
            "L_SPECIAL_04",
            "Stahl",
            400,
            (2_683_000.0, 1_248_000.0),
            (2_685_000.0, 1_250_000.0),
            "2018-08-01",
            "Fernleitung zwischen zwei Stadtteilen",
        ),
    ]
}

/// Write rows to a single-sheet workbook. Empty values become blank cells.
pub fn write_workbook(path: &Path, rows: &[SampleRow]) -> Result<(), SampleError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in REQUIRED_COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, &row.leitung_id)?;
        sheet.write_string(r, 1, &row.material)?;
        sheet.write_number(r, 2, f64::from(row.durchmesser_mm))?;
        sheet.write_number(r, 3, row.x_start)?;
        sheet.write_number(r, 4, row.y_start)?;
        if let Some(x_end) = row.x_end {
            sheet.write_number(r, 5, x_end)?;
        }
        sheet.write_number(r, 6, row.y_end)?;
        sheet.write_string(r, 7, &row.verlegedatum)?;
        if !row.bemerkung.is_empty() {
            sheet.write_string(r, 8, &row.bemerkung)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// Write rows as comma-separated UTF-8 with a byte order mark.
pub fn write_csv(path: &Path, rows: &[SampleRow]) -> Result<(), SampleError> {
    let mut file = std::fs::File::create(path)?;
    file.write_all("\u{feff}".as_bytes())?;
    let mut writer = csv::Writer::from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the full set of sample files into `out_dir`.
pub fn generate_sample_files(out_dir: &Path, seed: u64) -> Result<Vec<PathBuf>, SampleError> {
    generate_sample_files_until(out_dir, seed, chrono::Local::now().date_naive())
}

/// Like [`generate_sample_files`] with a fixed upper bound for dates.
pub fn generate_sample_files_until(
    out_dir: &Path,
    seed: u64,
    last_date: NaiveDate,
) -> Result<Vec<PathBuf>, SampleError> {
    std::fs::create_dir_all(out_dir)?;
    let mut generator = SampleGenerator::new(seed, last_date);
    let mut written = Vec::new();

    let small = generator.rows(10, false);
    let medium = generator.rows(50, true);
    let large = generator.rows(500, false);
    let special = special_cases();

    for (name, rows) in [
        (SMALL_VALID, small.as_slice()),
        (MEDIUM_WITH_ERRORS, medium.as_slice()),
        (LARGE, large.as_slice()),
        (SPECIAL_CASES, special.as_slice()),
    ] {
        let path = out_dir.join(name);
        write_workbook(&path, rows)?;
        tracing::info!(path = %path.display(), rows = rows.len(), "Sample file written");
        written.push(path);
    }

    let csv_path = out_dir.join(MEDIUM_WITH_ERRORS_CSV);
    write_csv(&csv_path, &medium)?;
    tracing::info!(path = %csv_path.display(), rows = medium.len(), "Sample file written");
    written.push(csv_path);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(seed: u64) -> SampleGenerator {
        SampleGenerator::new(seed, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
    }

    #[test]
    fn same_seed_same_rows() {
        assert_eq!(generator(7).rows(20, false), generator(7).rows(20, false));
        assert_ne!(generator(7).rows(20, false), generator(8).rows(20, false));
    }

    #[test]
    fn medium_file_appends_four_faulty_rows() {
        let rows = generator(1).rows(50, true);
        assert_eq!(rows.len(), 54);
        let ids: Vec<&str> = rows[50..].iter().map(|r| r.leitung_id.as_str()).collect();
        assert_eq!(ids, ["L_ERR01", "L_ERR02", "L_ERR03", "L_ERR04"]);
        assert!(rows[52].x_end.is_none());
    }

    #[test]
    fn generated_lines_are_plausible() {
        for row in generator(3).rows(200, false) {
            let dx = row.x_end.unwrap() - row.x_start;
            let dy = row.y_end - row.y_start;
            let length = dx.hypot(dy);
            assert!((9.9..=200.1).contains(&length), "length {length}");
            assert!((CENTER_X - 5_000.0..=CENTER_X + 5_000.0).contains(&row.x_start));
        }
    }

    #[test]
    fn ids_are_zero_padded() {
        let rows = generator(1).rows(3, false);
        assert_eq!(rows[2].leitung_id, "L_00003");
    }
}
