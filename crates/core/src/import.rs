//! Per-run row processing.
//!
//! Feeds raw records through the [`RecordValidator`] one at a time and
//! partitions them into an output batch and an error accumulator. Both are
//! owned by the run and handed back to the caller; nothing is shared between
//! runs.

use std::collections::HashMap;

use crate::record::{RawRecord, ValidatedSegment};
use crate::types::Timestamp;
use crate::validation::reason::ROW_NUMBER_OFFSET;
use crate::validation::{RecordValidator, ValidationError};

/// Result of validating one row: exactly one of the two.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Accepted(ValidatedSegment),
    Rejected(ValidationError),
}

/// Append-only list of rejected rows for a single import run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorAccumulator {
    errors: Vec<ValidationError>,
}

impl ErrorAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }
}

impl<'a> IntoIterator for &'a ErrorAccumulator {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// An identifier accepted more than once within the same input.
///
/// Under upsert semantics the later row overwrites the earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateIdentifier {
    pub leitung_id: String,
    pub first_row: usize,
    pub row: usize,
}

/// Everything a run produced from its input rows.
#[derive(Debug, Clone, Default)]
pub struct ProcessedBatch {
    pub total_records: usize,
    pub segments: Vec<ValidatedSegment>,
    pub errors: ErrorAccumulator,
    pub duplicates: Vec<DuplicateIdentifier>,
}

impl ProcessedBatch {
    pub fn accepted(&self) -> usize {
        self.segments.len()
    }

    pub fn rejected(&self) -> usize {
        self.errors.len()
    }
}

/// Validate every record in source order.
///
/// `clock` is called once per row for the import timestamp. A bad row never
/// stops processing; it is recorded and the loop moves on.
pub fn process_records<I, C>(records: I, validator: &RecordValidator, mut clock: C) -> ProcessedBatch
where
    I: IntoIterator<Item = RawRecord>,
    C: FnMut() -> Timestamp,
{
    let mut batch = ProcessedBatch::default();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (index, record) in records.into_iter().enumerate() {
        batch.total_records += 1;
        match validator.validate(index, &record, clock()) {
            RowOutcome::Accepted(segment) => {
                let row = index + ROW_NUMBER_OFFSET;
                if let Some(first_row) = seen.insert(segment.leitung_id.clone(), row) {
                    batch.duplicates.push(DuplicateIdentifier {
                        leitung_id: segment.leitung_id.clone(),
                        first_row,
                        row,
                    });
                }
                batch.segments.push(segment);
            }
            RowOutcome::Rejected(error) => batch.errors.push(error),
        }
    }

    batch
}
