//! `werkleitung-import` -- utility line segment importer.
//!
//! Reads a spreadsheet of pipe segments, validates every row against the LV95
//! envelope and basic plausibility rules, writes rejected rows to
//! `<stem>_fehler.csv` (`.txt` for CSV input) and upserts the rest into PostGIS in one transaction.
//!
//! # Environment variables
//!
//! | Variable             | Required | Default          | Description                          |
//! |----------------------|----------|------------------|--------------------------------------|
//! | `DATABASE_URL`       | no       | --               | Full Postgres URL, overrides `DB_*`  |
//! | `DB_HOST`            | no       | `localhost`      |                                      |
//! | `DB_PORT`            | no       | `5432`           |                                      |
//! | `DB_NAME`            | no       | `basler_hofmann` |                                      |
//! | `DB_USER`            | no       | `tomo`           |                                      |
//! | `DB_PASSWORD`        | no       | `tomo`           |                                      |
//! | `IMPORT_LOG_DIR`     | no       | `.`              | Directory for the per-run log file   |
//! | `MIN_SEGMENT_LENGTH` | no       | `0.5`            | Shortest accepted segment in metres  |
//! | `IMPORT_LOG_JSON`    | no       | `false`          | JSON lines on stderr                 |
//! | `RUST_LOG`           | no       | importer=info    | Log filter                           |

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use werkleitung_importer::config::ImporterConfig;
use werkleitung_importer::error::ImportError;
use werkleitung_importer::logging;
use werkleitung_importer::runner::{ImportSummary, Importer};
use werkleitung_importer::sample;
use werkleitung_importer::sink::PgSegmentSink;

#[derive(Parser, Debug)]
#[command(name = "werkleitung-import")]
#[command(about = "Import utility line segments from spreadsheets into PostGIS")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate and import a spreadsheet (.xlsx, .xls, .ods or .csv).
    Import {
        /// Input file
        file: PathBuf,

        /// Validate and write the error report without touching the database
        #[arg(long)]
        dry_run: bool,

        /// Print the run summary as JSON on stdout
        #[arg(long)]
        summary_json: bool,

        /// Directory for the per-run log file
        #[arg(long, default_value = ".", env = "IMPORT_LOG_DIR")]
        log_dir: PathBuf,

        /// Log to stderr only
        #[arg(long)]
        no_log_file: bool,

        /// Emit stderr logs as JSON lines
        #[arg(long, env = "IMPORT_LOG_JSON")]
        log_json: bool,
    },

    /// Write sample input files.
    Sample {
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Import {
            file,
            dry_run,
            summary_json,
            log_dir,
            no_log_file,
            log_json,
        } => {
            let log_file = logging::init((!no_log_file).then_some(log_dir.as_path()), log_json);
            if let Some(path) = &log_file {
                tracing::info!(path = %path.display(), "Logging to file");
            }
            match import(&file, dry_run).await {
                Ok(summary) => {
                    if summary_json {
                        print_summary(&summary);
                    }
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    tracing::error!(error = %e, "Import aborted");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Sample { out_dir, seed } => {
            logging::init(None, false);
            match sample::generate_sample_files(&out_dir, seed) {
                Ok(files) => {
                    tracing::info!(count = files.len(), out_dir = %out_dir.display(), "Sample files written");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    tracing::error!(error = %e, "Cannot write sample files");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

async fn import(file: &Path, dry_run: bool) -> Result<ImportSummary, ImportError> {
    let config = ImporterConfig::from_env()?;
    tracing::info!(
        input = %file.display(),
        dry_run,
        min_length = config.validation.min_length,
        "Starting werkleitung import"
    );

    let importer = Importer::new(config.validation);
    if dry_run {
        return importer.dry_run(file);
    }
    importer
        .run(file, || PgSegmentSink::connect(&config.db))
        .await
}

fn print_summary(summary: &ImportSummary) {
    match serde_json::to_string_pretty(summary) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::warn!(error = %e, "Cannot serialize run summary"),
    }
}
