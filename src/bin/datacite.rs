//! DataCite CLI
//!
//! Command-line interface for bulk URL updates, DOI publication and
//! metadata validation.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use datacite::{
    load_doi_records, load_metadata, load_url_updates, public_dois, update_urls,
    validate_records, ApiError, BatchReport, ClientConfig, FailurePolicy, MetadataValidator,
    RestClient, SchemaVersion,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "datacite")]
#[command(about = "Command-line client for the DataCite API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Update the landing page URL of every DOI listed in a CSV file
    UpdateUrls {
        /// CSV file with `doi` and `url` columns
        #[arg(long)]
        input_file_csv: PathBuf,

        #[command(flatten)]
        connection: Connection,
    },

    /// Publish (make findable) every record of a JSON array
    PublicDois {
        /// JSON array of `{"metadata": {...}, "url": "...", "doi": "..."}` records
        #[arg(long)]
        input_file_json: PathBuf,

        #[command(flatten)]
        connection: Connection,
    },

    /// Validate metadata against a DataCite schema version
    Validate {
        /// JSON file holding one metadata object or an array of them
        #[arg(long)]
        input_file_json: PathBuf,

        /// Schema version: 3.1, 4.0, 4.1, 4.2 or 4.3
        #[arg(long, default_value = "4.3")]
        schema_version: SchemaVersion,
    },
}

#[derive(Args)]
struct Connection {
    /// DataCite repository account
    #[arg(long, env = "DATACITE_USERNAME")]
    username: String,

    /// DataCite repository password
    #[arg(long, env = "DATACITE_PASSWORD", hide_env_values = true)]
    password: String,

    /// DOI prefix of the repository (e.g. 10.1234)
    #[arg(long, env = "DATACITE_PREFIX")]
    prefix: String,

    /// Use the DataCite sandbox (default)
    #[arg(long, conflicts_with = "production_mode")]
    test_mode: bool,

    /// Use the production DataCite API
    #[arg(long)]
    production_mode: bool,

    /// Send requests to this base URL instead of the DataCite host
    #[arg(long, env = "DATACITE_URL")]
    url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Stop at the first failed record instead of attempting all of them
    #[arg(long)]
    fail_fast: bool,
}

impl Connection {
    fn config(&self) -> ClientConfig {
        let config = ClientConfig::new(&self.username, &self.password, &self.prefix)
            .test_mode(self.test_mode || !self.production_mode)
            .timeout(Duration::from_secs(self.timeout));
        match &self.url {
            Some(url) => config.url(url),
            None => config,
        }
    }

    fn policy(&self) -> FailurePolicy {
        if self.fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::Continue
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::UpdateUrls {
            input_file_csv,
            connection,
        } => run_update_urls(&input_file_csv, &connection),

        Commands::PublicDois {
            input_file_json,
            connection,
        } => run_public_dois(&input_file_json, &connection),

        Commands::Validate {
            input_file_json,
            schema_version,
        } => run_validate(&input_file_json, schema_version),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

/// Logs go to stderr; `RUST_LOG` raises the level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_update_urls(input: &Path, connection: &Connection) -> Result<(), u8> {
    let rows = load_url_updates(input).map_err(|e| {
        report_error(&e);
        e.exit_code() as u8
    })?;
    let client = connect(connection)?;

    let report = update_urls(&client, &rows, connection.policy());
    finish_batch(&report, "successfully updated all urls")
}

fn run_public_dois(input: &Path, connection: &Connection) -> Result<(), u8> {
    let records = load_doi_records(input).map_err(|e| {
        report_error(&e);
        e.exit_code() as u8
    })?;
    let client = connect(connection)?;

    let report = public_dois(&client, &records, connection.policy());
    for doi in &report.succeeded {
        println!("published {}", doi);
    }
    finish_batch(&report, "successfully published all dois")
}

fn run_validate(input: &Path, version: SchemaVersion) -> Result<(), u8> {
    let records = load_metadata(input).map_err(|e| {
        report_error(&e);
        e.exit_code() as u8
    })?;
    let validator = MetadataValidator::new(version).map_err(|e| {
        report_error(&e);
        e.exit_code() as u8
    })?;

    let report = validate_records(&validator, &records).map_err(|e| {
        report_error(&e);
        e.exit_code() as u8
    })?;

    if report.is_ok() {
        return Ok(());
    }
    for failure in &report.failures {
        eprintln!(
            "{}",
            format!("ERROR - {}: {}", failure.label, failure.error).red()
        );
    }
    eprintln!(
        "{}",
        format!(
            "{} of {} records invalid against schema {}",
            report.failures.len(),
            report.total,
            version
        )
        .red()
    );
    Err(1)
}

fn connect(connection: &Connection) -> Result<RestClient, u8> {
    RestClient::new(&connection.config()).map_err(|e| {
        report_error(&e);
        e.exit_code() as u8
    })
}

/// Print failures and the summary, and pick the exit code.
fn finish_batch(report: &BatchReport<ApiError>, success_message: &str) -> Result<(), u8> {
    if report.is_ok() {
        println!("{}", success_message.green());
        return Ok(());
    }

    for failure in &report.failures {
        eprintln!(
            "{}",
            format!("ERROR - {}: {}", failure.label, failure.error).red()
        );
    }
    eprintln!(
        "{}",
        format!(
            "{} of {} records failed",
            report.failures.len(),
            report.total
        )
        .red()
    );
    if report.aborted {
        eprintln!(
            "{}",
            format!("stopped early, {} records not attempted", report.skipped()).red()
        );
    }

    let code = report
        .failures
        .iter()
        .map(|f| f.error.exit_code())
        .max()
        .unwrap_or(1);
    Err(code as u8)
}

fn report_error(err: &dyn Display) {
    eprintln!("{}", format!("ERROR - {}", err).red());
}
