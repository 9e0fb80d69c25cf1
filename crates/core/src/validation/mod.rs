//! Record validation.
//!
//! Pure logic: coordinate plausibility, minimum length, diameter and date
//! coercion, and the structured reasons a record can be rejected for.

pub mod date;
pub mod envelope;
pub mod reason;
pub mod record;

pub use envelope::{CoordinateEnvelope, EnvelopeViolation};
pub use reason::{Axis, Endpoint, RejectionReason, ValidationError, UNKNOWN_IDENTIFIER};
pub use record::{RecordValidator, ValidationSettings, DEFAULT_MIN_LENGTH};
