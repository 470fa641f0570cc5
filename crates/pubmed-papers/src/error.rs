//! Error types for the pubmed-papers library.
//!
//! Every fallible operation in the crate returns [`PapersError`]. Errors from the underlying
//! crates (`reqwest`, `quick-xml`, `csv`, ...) are wrapped transparently so callers can still
//! inspect them.
//!
//! # Examples
//!
//! ```
//! use pubmed_papers::{error::PapersError, extractor::parse_pubmed_xml};
//!
//! match parse_pubmed_xml("<PubmedArticleSet><PubmedArticle>") {
//!   Err(PapersError::MalformedXml(reason)) => println!("bad document: {reason}"),
//!   Err(e) => println!("other error: {e}"),
//!   Ok(articles) => println!("parsed {} articles", articles.len()),
//! }
//! ```

use thiserror::Error;

/// Error type alias used for the [`pubmed_papers`](crate) crate.
pub type Result<T> = core::result::Result<T, PapersError>;

/// Errors that can occur while searching, parsing and exporting PubMed records.
#[derive(Error, Debug)]
pub enum PapersError {
  /// The XML reader rejected the document.
  ///
  /// This covers syntax errors and mismatched closing tags. No articles are returned when this
  /// happens, even if some records were read successfully before the error.
  #[error(transparent)]
  Parse(#[from] quick_xml::Error),

  /// The document is well formed so far but structurally incomplete.
  ///
  /// Raised for an input without any root element or a document that ends with elements still
  /// open.
  #[error("Malformed XML: {0}")]
  MalformedXml(String),

  /// A record carried no `PMID`.
  ///
  /// Only returned when the extractor runs with
  /// [`MissingIdentifier::Abort`](crate::extractor::MissingIdentifier::Abort); the default
  /// policy skips such records.
  #[error("Record #{record} has no PubMed identifier")]
  MissingIdentifier {
    /// Zero based position of the record in the document.
    record: usize,
  },

  /// A network request failed or returned a non-success status.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The E-utilities API answered with something we could not use.
  #[error("API error: {0}")]
  ApiError(String),

  /// A JSON response body could not be decoded.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// Writing CSV output failed.
  #[error(transparent)]
  Csv(#[from] csv::Error),

  /// A file system operation failed.
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// The configuration file is not valid TOML for [`Config`](crate::config::Config).
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// Any other configuration problem.
  #[error("{0}")]
  Config(String),
}
