use std::path::PathBuf;

/// Run-level failures. Any of these aborts the import.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Cannot read input file {}: {source}", .path.display())]
    UnreadableInput {
        path: PathBuf,
        #[source]
        source: SourceError,
    },

    #[error("Missing required columns: {}", .missing.join(", "))]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("Database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Batch write failed, transaction rolled back: {0}")]
    Write(#[source] sqlx::Error),
}

/// Why an input file could not be turned into rows.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Spreadsheet(#[from] calamine::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("workbook has no worksheets")]
    NoWorksheet,

    #[error("file has no header row")]
    NoHeader,
}

/// Failure to write the error report. Never fatal to a run.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Cannot write error report {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot serialize error report {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Failure while writing sample input files.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
