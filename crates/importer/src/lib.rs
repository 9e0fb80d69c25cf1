//! `werkleitung-importer` library crate.
//!
//! I/O around the pure validation core: reading spreadsheets, writing the
//! error report, persisting segments and orchestrating one import run. The
//! binary entrypoint lives in `main.rs`.

pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod runner;
pub mod sample;
pub mod sink;
pub mod source;
