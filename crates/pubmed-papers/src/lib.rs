//! Find PubMed papers written with authors from industry.
//!
//! `pubmed-papers` searches PubMed through the NCBI E-utilities API, parses the returned
//! article records and reports every paper that has at least one author affiliated with a
//! non-academic organization (a pharmaceutical company, a biotech startup, a contract research
//! organization, ...).
//!
//! The library is a linear pipeline:
//!
//! 1. [`client::PubMed::search`] turns a query into a list of PubMed identifiers.
//! 2. [`client::PubMed::fetch_details`] downloads the records as XML.
//! 3. [`extractor::parse_pubmed_xml`] turns the XML into [`article::Article`] values.
//! 4. [`classifier::AffiliationClassifier`] keeps the authors with non-academic affiliations.
//! 5. [`report::build_report_row`] folds each article into a [`report::ReportRow`].
//!
//! [`pipeline::Pipeline`] runs all of the above for you.
//!
//! # Getting Started
//!
//! ```no_run
//! use pubmed_papers::{config::Config, export, pipeline::Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let pipeline = Pipeline::new(Config::default())?;
//!   let rows = pipeline.run("cancer immunotherapy").await?;
//!   export::write_csv(&rows, "results.csv")?;
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`article`]: Parsed article and author records
//! - [`extractor`]: PubMed XML to [`article::Article`] translation
//! - [`classifier`]: Academic/non-academic affiliation heuristic
//! - [`report`]: Output rows and their column layout
//! - [`export`]: CSV export
//! - [`client`]: E-utilities HTTP client
//! - [`config`]: User configuration
//! - [`pipeline`]: End to end processing of a query

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  collections::HashSet,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod article;
pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod extractor;
pub mod pipeline;
pub mod report;

use crate::{article::*, classifier::*, config::*, error::*, report::*};

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use pubmed_papers::prelude::*;
///
/// fn example(xml: &str) -> Result<Vec<ReportRow>, PapersError> {
///   let articles = parse_pubmed_xml(xml)?;
///   Ok(build_report(&articles, &AffiliationClassifier::default()))
/// }
/// ```
pub mod prelude {
  pub use crate::{
    article::{Article, Author},
    classifier::{AffiliationClassifier, ClassifiedAuthor},
    error::PapersError,
    extractor::parse_pubmed_xml,
    report::{build_report, ReportRow},
  };
}
