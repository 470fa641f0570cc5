//! End to end processing of a query.
//!
//! [`Pipeline`] strings the other modules together: search, fetch, parse, classify and build the
//! report. The remote half and the local half can also be run separately, which is what the
//! command line tool does for `--from-xml`.

use crate::{
  client::PubMed,
  extractor::{parse_pubmed_xml_with, MissingIdentifier},
};

use super::*;

/// Everything needed to turn a query into report rows.
#[derive(Debug, Clone)]
pub struct Pipeline {
  /// E-utilities client
  pubmed:     PubMed,
  /// Affiliation heuristic
  classifier: AffiliationClassifier,
  /// Policy for records without PMID
  on_missing: MissingIdentifier,
}

impl Pipeline {
  /// Builds a pipeline from a configuration.
  pub fn new(config: Config) -> Result<Self> {
    Ok(Self {
      pubmed:     PubMed::new(&config)?,
      classifier: config.classifier(),
      on_missing: config.on_missing_identifier,
    })
  }

  /// Searches PubMed and reports the matching articles with non-academic authors.
  ///
  /// A query without hits yields an empty report without fetching anything.
  pub async fn run(&self, query: &str) -> Result<Vec<ReportRow>> {
    let ids = self.pubmed.search(query).await?;
    debug!("Found {} paper IDs for {:?}", ids.len(), query);
    if ids.is_empty() {
      return Ok(Vec::new());
    }

    let xml = self.pubmed.fetch_details(&ids).await?;
    self.report_from_xml(&xml)
  }

  /// Parses already fetched `efetch` XML and builds the report.
  pub fn report_from_xml(&self, xml: &str) -> Result<Vec<ReportRow>> {
    let articles = parse_pubmed_xml_with(xml, self.on_missing)?;
    let undated = articles.iter().filter(|article| !article.has_known_year()).count();
    debug!("Parsed {} articles, {} without publication year", articles.len(), undated);
    Ok(build_report(&articles, &self.classifier))
  }
}
