//! Per-record rejection reasons and the error entries built from them.

use std::fmt;

use serde::Serialize;

use super::envelope::EnvelopeViolation;

/// Identifier recorded when a rejected row has no readable `Leitung_ID`.
pub const UNKNOWN_IDENTIFIER: &str = "UNKNOWN";

/// Offset from a zero-based data index to the spreadsheet row number:
/// one for 1-based numbering plus one for the header row.
pub const ROW_NUMBER_OFFSET: usize = 2;

/// Which end of a segment a coordinate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "Start point",
            Self::End => "End point",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "X",
            Self::Y => "Y",
        })
    }
}

/// Why a record was rejected. The `Display` text is what lands in the
/// error report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RejectionReason {
    #[error("{endpoint} invalid: {axis} coordinate missing")]
    MissingCoordinate { endpoint: Endpoint, axis: Axis },

    #[error("{endpoint} invalid: {axis} coordinate {raw:?} is not a number")]
    InvalidCoordinate {
        endpoint: Endpoint,
        axis: Axis,
        raw: String,
    },

    #[error("{endpoint} invalid: {violation}")]
    OutOfRange {
        endpoint: Endpoint,
        violation: EnvelopeViolation,
    },

    #[error(
        "Line too short ({} m, minimum {minimum} m), probably a data entry error",
        floor_mm(.length)
    )]
    TooShort { length: f64, minimum: f64 },

    #[error("Diameter missing")]
    MissingDiameter,

    #[error("Diameter {0:?} is not an integer")]
    InvalidDiameter(String),

    #[error("Installation date missing")]
    MissingDate,

    #[error("Installation date {0:?} could not be parsed")]
    InvalidDate(String),

    #[error("Leitung_ID missing")]
    MissingIdentifier,
}

/// A rejected row, as it appears in the error report.
///
/// Serializes to the report columns `zeile, leitung_id, fehler`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Spreadsheet row number (header is row 1).
    #[serde(rename = "zeile")]
    pub row: usize,
    pub leitung_id: String,
    #[serde(rename = "fehler", serialize_with = "serialize_reason")]
    pub reason: RejectionReason,
}

impl ValidationError {
    /// Build an entry for the record at zero-based data `index`.
    ///
    /// `leitung_id` of `None` is recorded as [`UNKNOWN_IDENTIFIER`].
    pub fn new(index: usize, leitung_id: Option<String>, reason: RejectionReason) -> Self {
        Self {
            row: index + ROW_NUMBER_OFFSET,
            leitung_id: leitung_id.unwrap_or_else(|| UNKNOWN_IDENTIFIER.to_string()),
            reason,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {} ({}): {}", self.row, self.leitung_id, self.reason)
    }
}

/// Length truncated, not rounded, to millimetres.
fn floor_mm(length: &f64) -> String {
    format!("{:.3}", (length * 1000.0).floor() / 1000.0)
}

fn serialize_reason<S: serde::Serializer>(
    reason: &RejectionReason,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_number_accounts_for_header() {
        let err = ValidationError::new(0, Some("L_1".into()), RejectionReason::MissingDate);
        assert_eq!(err.row, 2);
        let err = ValidationError::new(41, Some("L_1".into()), RejectionReason::MissingDate);
        assert_eq!(err.row, 43);
    }

    #[test]
    fn missing_identifier_uses_sentinel() {
        let err = ValidationError::new(3, None, RejectionReason::MissingIdentifier);
        assert_eq!(err.leitung_id, "UNKNOWN");
    }

    #[test]
    fn coordinate_messages_name_endpoint_and_axis() {
        let reason = RejectionReason::MissingCoordinate {
            endpoint: Endpoint::End,
            axis: Axis::X,
        };
        assert_eq!(reason.to_string(), "End point invalid: X coordinate missing");
    }

    #[test]
    fn too_short_message_mentions_length() {
        let reason = RejectionReason::TooShort {
            length: 0.141_42,
            minimum: 0.5,
        };
        assert_eq!(
            reason.to_string(),
            "Line too short (0.141 m, minimum 0.5 m), probably a data entry error"
        );
    }

    #[test]
    fn too_short_length_is_never_rounded_up_to_minimum() {
        let reason = RejectionReason::TooShort {
            length: 0.4999,
            minimum: 0.5,
        };
        assert!(reason.to_string().starts_with("Line too short (0.499 m,"));
    }
}
