//! The record validator: turns one [`RawRecord`] into either a
//! [`ValidatedSegment`] or a [`ValidationError`].

use geo_types::{coord, Coord};
use serde::{Deserialize, Serialize};

use crate::cell::{CellError, CellValue};
use crate::geometry::LineGeometry;
use crate::import::RowOutcome;
use crate::record::{RawRecord, ValidatedSegment};
use crate::types::Timestamp;

use super::date::parse_installation_date;
use super::envelope::{CoordinateEnvelope, EnvelopeViolation};
use super::reason::{Axis, Endpoint, RejectionReason, ValidationError};

/// Shortest plausible segment length in metres; anything shorter is taken to
/// be a data entry error.
pub const DEFAULT_MIN_LENGTH: f64 = 0.5;

/// Tunable validation thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationSettings {
    pub envelope: CoordinateEnvelope,
    pub min_length: f64,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            envelope: CoordinateEnvelope::default(),
            min_length: DEFAULT_MIN_LENGTH,
        }
    }
}

/// Validates raw records and builds their line geometry.
#[derive(Debug, Clone, Default)]
pub struct RecordValidator {
    settings: ValidationSettings,
}

impl RecordValidator {
    pub fn new(settings: ValidationSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ValidationSettings {
        &self.settings
    }

    /// Validate the record at zero-based data `index`.
    ///
    /// Never fails: every problem becomes a [`RowOutcome::Rejected`].
    pub fn validate(&self, index: usize, record: &RawRecord, imported_at: Timestamp) -> RowOutcome {
        match self.build_segment(record, imported_at) {
            Ok(segment) => RowOutcome::Accepted(segment),
            Err(reason) => {
                RowOutcome::Rejected(ValidationError::new(index, record.leitung_id.as_text(), reason))
            }
        }
    }

    /// Run every step in order; the first failure wins.
    ///
    /// 1. start point plausibility
    /// 2. end point plausibility
    /// 3. line construction and minimum length
    /// 4. diameter coercion
    /// 5. installation date
    /// 6. identifier presence
    fn build_segment(
        &self,
        record: &RawRecord,
        imported_at: Timestamp,
    ) -> Result<ValidatedSegment, RejectionReason> {
        let start = self.resolve_point(Endpoint::Start, &record.x_start, &record.y_start)?;
        let end = self.resolve_point(Endpoint::End, &record.x_end, &record.y_end)?;

        let geometry = LineGeometry::new(start, end);
        check_min_length(&geometry, self.settings.min_length)?;

        let durchmesser_mm = coerce_diameter(&record.durchmesser_mm)?;
        let verlegedatum = parse_installation_date(&record.verlegedatum)?;
        let leitung_id = record
            .leitung_id
            .as_text()
            .ok_or(RejectionReason::MissingIdentifier)?;

        Ok(ValidatedSegment {
            leitung_id,
            material: record.material.as_text(),
            durchmesser_mm,
            verlegedatum,
            bemerkung: record.bemerkung.as_text().unwrap_or_default(),
            geometry,
            imported_at,
        })
    }

    /// Read and range-check one endpoint: X first, then Y.
    fn resolve_point(
        &self,
        endpoint: Endpoint,
        x: &CellValue,
        y: &CellValue,
    ) -> Result<Coord<f64>, RejectionReason> {
        let envelope = &self.settings.envelope;
        let out_of_range = |violation: EnvelopeViolation| RejectionReason::OutOfRange {
            endpoint,
            violation,
        };

        let x = read_ordinate(endpoint, Axis::X, x)?;
        envelope.check_x(x).map_err(out_of_range)?;
        let y = read_ordinate(endpoint, Axis::Y, y)?;
        envelope.check_y(y).map_err(out_of_range)?;

        Ok(coord! { x: x, y: y })
    }
}

/// Reject lines shorter than `min_length` (identical points included).
pub fn check_min_length(geometry: &LineGeometry, min_length: f64) -> Result<(), RejectionReason> {
    let length = geometry.length();
    if length < min_length {
        Err(RejectionReason::TooShort {
            length,
            minimum: min_length,
        })
    } else {
        Ok(())
    }
}

/// Coerce a diameter cell to whole millimetres.
///
/// Fractional values are truncated toward zero, numeric text is accepted.
pub fn coerce_diameter(cell: &CellValue) -> Result<i32, RejectionReason> {
    let value = match cell {
        CellValue::Text(s) => match s.parse::<i32>() {
            Ok(v) => return Ok(v),
            Err(_) => cell.as_number(),
        },
        _ => cell.as_number(),
    };

    match value {
        Ok(v) if v.trunc() >= f64::from(i32::MIN) && v.trunc() <= f64::from(i32::MAX) => {
            Ok(v.trunc() as i32)
        }
        Ok(_) => Err(RejectionReason::InvalidDiameter(cell.describe())),
        Err(CellError::Missing) => Err(RejectionReason::MissingDiameter),
        Err(CellError::Malformed(raw)) => Err(RejectionReason::InvalidDiameter(raw)),
    }
}

fn read_ordinate(endpoint: Endpoint, axis: Axis, cell: &CellValue) -> Result<f64, RejectionReason> {
    cell.as_number().map_err(|e| match e {
        CellError::Missing => RejectionReason::MissingCoordinate { endpoint, axis },
        CellError::Malformed(raw) => RejectionReason::InvalidCoordinate {
            endpoint,
            axis,
            raw,
        },
    })
}
