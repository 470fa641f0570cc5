//! Command line tool listing PubMed papers that have authors from industry.
//!
//! The tool searches PubMed, keeps the articles with at least one author whose affiliation
//! does not look academic and prints them as a table or writes them to a CSV file.
//!
//! # Usage
//!
//! ```bash
//! # Print a table of matching papers
//! get-papers-list "cancer immunotherapy"
//!
//! # Save the results instead
//! get-papers-list "cancer immunotherapy" --file results.csv
//!
//! # Show what the tool is doing
//! get-papers-list "cancer immunotherapy" --debug
//!
//! # Work from a saved efetch response, without network access
//! get-papers-list --from-xml efetch.xml
//! ```

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{path::PathBuf, process::ExitCode};

use clap::{builder::ArgAction, Parser};
use console::style;
use pubmed_papers::{config::Config, export, pipeline::Pipeline, report::ReportRow};
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

pub mod error;
pub mod interaction;

use crate::{error::*, interaction::*};

/// Command line interface configuration and argument parsing
#[derive(Parser, Debug)]
#[command(
  name = "get-papers-list",
  author,
  version,
  about = "List PubMed papers with at least one author from a non-academic organization"
)]
pub struct Cli {
  /// PubMed search query, full PubMed query syntax is supported
  #[arg(required_unless_present = "from_xml")]
  query: Option<String>,

  /// Save the results to this CSV file instead of printing a table
  #[arg(short, long, value_name = "FILE")]
  file: Option<PathBuf>,

  /// Print debug information about each step
  #[arg(short, long)]
  debug: bool,

  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(short, long, action = ArgAction::Count, help = "Increase logging verbosity")]
  verbose: u8,

  /// Maximum number of papers to fetch from PubMed
  #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
  max_results: Option<u32>,

  /// Configuration file. If not specified, the platform config directory is checked.
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Read PubMed XML (an efetch response) from this file instead of querying PubMed
  #[arg(long, value_name = "FILE", conflicts_with = "query")]
  from_xml: Option<PathBuf>,
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug, also selected by `--debug`
/// - 4+: trace
///
/// `RUST_LOG` takes precedence when set. Logs go to stderr so the table on stdout stays clean.
fn setup_logging(verbosity: u8, debug: bool) {
  let verbosity = if debug { verbosity.max(3) } else { verbosity };
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(verbosity > 3)
    .with_line_number(verbosity > 3)
    .with_target(true)
    .init();
}

/// Loads the configuration file and applies command line overrides.
///
/// An explicit `--config` must exist; the default location is optional.
fn load_config(cli: &Cli) -> Result<Config> {
  let mut config = match &cli.config {
    Some(path) => Config::load(path)?,
    None => Config::load_or_default(Config::default_path())?,
  };

  if let Some(max_results) = cli.max_results {
    config.max_results = max_results as usize;
  }
  trace!("Using configuration: {:?}", config);
  Ok(config)
}

/// Runs the search (or reads the XML file) and emits the report.
async fn run(cli: Cli) -> Result<()> {
  let pipeline = Pipeline::new(load_config(&cli)?)?;

  let rows: Vec<ReportRow> = match (&cli.from_xml, &cli.query) {
    (Some(path), _) => {
      debug!("Reading PubMed XML from {}", path.display());
      let xml = std::fs::read_to_string(path)
        .map_err(|source| GetPapersError::ReadInput { path: path.clone(), source })?;
      pipeline.report_from_xml(&xml)?
    },
    (None, Some(query)) => {
      debug!("Searching PubMed with query: {}", query);
      pipeline.run(query).await?
    },
    (None, None) => return Err(GetPapersError::MissingQuery),
  };
  debug!("{} papers with non-academic authors", rows.len());

  match &cli.file {
    Some(path) => {
      export::write_csv(&rows, path)?;
      reply(ResponseContent::Success(&format!("Results saved to '{}'", path.display())));
    },
    None => reply(ResponseContent::Report(&rows)),
  }
  Ok(())
}

/// Entry point for the get-papers-list CLI application
///
/// Parses the arguments, sets up logging and runs the pipeline. Any error is printed on stderr
/// and turns into a failing exit code.
#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();
  setup_logging(cli.verbose, cli.debug);

  match run(cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("{} {}", style(ERROR_PREFIX).red(), e);
      ExitCode::FAILURE
    },
  }
}
