//! Errors surfaced by the command line tool.

use std::path::PathBuf;

use pubmed_papers::error::PapersError;
use thiserror::Error;

/// Error type alias used for the `get-papers-list` binary.
pub type Result<T> = core::result::Result<T, GetPapersError>;

/// Errors that end a `get-papers-list` run.
#[derive(Error, Debug)]
pub enum GetPapersError {
  /// Searching, parsing or exporting failed inside the library.
  #[error(transparent)]
  Papers(#[from] PapersError),

  /// The file given to `--from-xml` could not be read.
  #[error("Could not read {}: {source}", .path.display())]
  ReadInput {
    /// The file that was requested
    path:   PathBuf,
    /// Underlying I/O failure
    source: std::io::Error,
  },

  /// Neither a query nor an input file was given.
  #[error("Please specify a search query. Use --help for usage information.")]
  MissingQuery,
}
