//! Pure domain logic for the Werkleitung (utility line) importer.
//!
//! This crate has no database, async or file I/O dependencies. It owns the
//! record model, the coordinate plausibility rules, the two-vertex line
//! geometry and the per-run row processing that partitions raw records into
//! validated segments and validation errors.

pub mod cell;
pub mod error;
pub mod geometry;
pub mod import;
pub mod record;
pub mod types;
pub mod validation;
