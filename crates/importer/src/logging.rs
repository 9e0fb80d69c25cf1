//! Tracing setup for the command-line tool.
//!
//! Events go to stderr and, when a log directory is given, to a per-run file
//! `import_YYYYMMDD_HHMMSS.log` without ANSI colours. Stderr output can be
//! switched to JSON lines. `RUST_LOG` overrides the default filter.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_FILTER: &str = "werkleitung_importer=info,werkleitung_db=info";

/// Name of the log file for a run started at `started`.
pub fn log_file_name(started: chrono::DateTime<chrono::Local>) -> String {
    format!("import_{}.log", started.format("%Y%m%d_%H%M%S"))
}

/// Install the global subscriber. Returns the log file path if one was opened.
pub fn init(log_dir: Option<&Path>, json: bool) -> Option<PathBuf> {
    let mut open_error = None;
    let file = log_dir.and_then(|dir| {
        let path = dir.join(log_file_name(chrono::Local::now()));
        match File::create(&path) {
            Ok(file) => Some((path, file)),
            Err(e) => {
                open_error = Some((path, e));
                None
            }
        }
    });

    let (log_path, file_layer) = match file {
        Some((path, file)) => (
            Some(path),
            Some(fmt::layer().with_writer(Arc::new(file)).with_ansi(false)),
        ),
        None => (None, None),
    };

    let installed = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .with(file_layer)
        .try_init();
    if let Err(e) = installed {
        eprintln!("Cannot install log subscriber: {e}");
    }

    if let Some((path, e)) = open_error {
        tracing::warn!(path = %path.display(), error = %e, "Cannot create log file, logging to stderr only");
    }
    log_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_name_carries_start_time() {
        let started = chrono::Local.with_ymd_and_hms(2026, 3, 1, 7, 5, 9).unwrap();
        assert_eq!(log_file_name(started), "import_20260301_070509.log");
    }

    #[test]
    fn second_init_keeps_running() {
        let dir = tempfile::tempdir().unwrap();
        init(None, false);
        let path = init(Some(dir.path()), true).expect("log file still opened");
        assert!(path.exists());
    }
}
