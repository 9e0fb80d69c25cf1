//! Installation date parsing.

use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::cell::CellValue;

use super::reason::RejectionReason;

/// Date-only text layouts, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%Y/%m/%d"];

/// Date-time text layouts; the time part is discarded.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Largest serial day number a spreadsheet can represent (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Parse an installation date cell.
///
/// Accepts native spreadsheet dates, ISO and Swiss (`DD.MM.YYYY`) text and
/// spreadsheet serial day numbers.
pub fn parse_installation_date(cell: &CellValue) -> Result<NaiveDate, RejectionReason> {
    match cell {
        CellValue::Empty => Err(RejectionReason::MissingDate),
        CellValue::Date(dt) => Ok(dt.date()),
        CellValue::Number(n) if n.is_nan() => Err(RejectionReason::MissingDate),
        CellValue::Number(n) => {
            from_excel_serial(*n).ok_or_else(|| RejectionReason::InvalidDate(cell.describe()))
        }
        CellValue::Text(s) => parse_date_text(s).ok_or_else(|| RejectionReason::InvalidDate(s.clone())),
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
}

/// Serial of the fictitious 1900-02-29 the 1900 date system counts.
const PHANTOM_LEAP_DAY: u64 = 60;

/// Convert a spreadsheet serial day number (1900 date system) to a date.
///
/// Serial 1 is 1900-01-01. Serial 60 names a day that never existed and is
/// rejected; from 61 onward every serial is one day ahead of a plain count.
fn from_excel_serial(serial: f64) -> Option<NaiveDate> {
    if !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let day = serial.trunc() as u64;
    let days_after_1899_12_31 = match day {
        PHANTOM_LEAP_DAY => return None,
        d if d < PHANTOM_LEAP_DAY => d,
        d => d - 1,
    };
    NaiveDate::from_ymd_opt(1899, 12, 31)?.checked_add_days(Days::new(days_after_1899_12_31))
}
