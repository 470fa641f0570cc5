//! NCBI E-utilities client.
//!
//! Two endpoints are used:
//!
//! - `esearch.fcgi` (JSON) turns a query into PubMed identifiers
//! - `efetch.fcgi` (XML) returns the full records for a list of identifiers
//!
//! # Examples
//!
//! ```no_run
//! use pubmed_papers::{client::PubMed, config::Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pubmed = PubMed::new(&Config::default())?;
//! let ids = pubmed.search("crispr off-target").await?;
//! let xml = pubmed.fetch_details(&ids).await?;
//! println!("{} bytes of XML for {} records", xml.len(), ids.len());
//! # Ok(())
//! # }
//! ```

use super::*;

/// Returned by [`PubMed::fetch_details`] for an empty identifier list.
pub const EMPTY_ARTICLE_SET: &str =
  "<?xml version=\"1.0\" ?>\n<PubmedArticleSet></PubmedArticleSet>\n";

/// Above this many identifiers `efetch` is called with POST, as NCBI asks.
const POST_THRESHOLD: usize = 200;

/// Thin async wrapper over the PubMed E-utilities.
#[derive(Debug, Clone)]
pub struct PubMed {
  /// Shared HTTP client
  client:      reqwest::Client,
  /// Base URL without trailing slash
  base_url:    String,
  /// `retmax` sent to `esearch`
  max_results: usize,
  /// `api_key`, `email` and `tool` parameters, when configured
  credentials: Vec<(&'static str, String)>,
}

/// Top level of an `esearch` JSON answer.
#[derive(Debug, Deserialize)]
struct ESearchResponse {
  /// Present on success and on query errors
  esearchresult: Option<ESearchResult>,
  /// Present on service level errors such as rate limiting
  error:         Option<String>,
}

/// The `esearchresult` object.
#[derive(Debug, Deserialize)]
struct ESearchResult {
  /// Total number of hits, as a decimal string
  count:  Option<String>,
  /// Identifiers of the returned page of hits
  #[serde(default)]
  idlist: Vec<String>,
  /// Query level error message
  #[serde(rename = "ERROR")]
  error:  Option<String>,
}

impl PubMed {
  /// Builds a client from the endpoint, result limit and credentials in `config`.
  pub fn new(config: &Config) -> Result<Self> {
    let client = reqwest::Client::builder()
      .user_agent(concat!("pubmed-papers/", env!("CARGO_PKG_VERSION")))
      .build()?;

    let credentials =
      [("api_key", &config.api_key), ("email", &config.email), ("tool", &config.tool)]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|value| (key, value)))
        .collect();

    Ok(Self {
      client,
      base_url: config.base_url.trim_end_matches('/').to_string(),
      max_results: config.max_results,
      credentials,
    })
  }

  /// Full URL of an E-utilities endpoint.
  fn endpoint(&self, name: &str) -> String { format!("{}/{}", self.base_url, name) }

  /// Returns the PubMed identifiers matching `query`, at most `max_results` of them.
  ///
  /// # Errors
  ///
  /// - [`PapersError::Network`] if the request fails or the status is not a success
  /// - [`PapersError::Json`] if the body is not JSON
  /// - [`PapersError::ApiError`] if NCBI reports an error or the body has no `esearchresult`
  pub async fn search(&self, query: &str) -> Result<Vec<String>> {
    let url = self.endpoint("esearch.fcgi");
    let retmax = self.max_results.to_string();
    debug!("Searching PubMed for {:?} via {}", query, url);

    let response = self
      .client
      .get(&url)
      .query(&[
        ("db", "pubmed"),
        ("term", query),
        ("retmode", "json"),
        ("retmax", retmax.as_str()),
      ])
      .query(&self.credentials)
      .send()
      .await?
      .error_for_status()?;
    let data = response.bytes().await?;
    trace!("esearch response: {}", String::from_utf8_lossy(&data));

    let response: ESearchResponse = serde_json::from_slice(&data)?;
    if let Some(error) = response.error {
      return Err(PapersError::ApiError(error));
    }
    let result = response.esearchresult.ok_or_else(|| {
      PapersError::ApiError("esearch response has no `esearchresult`".to_string())
    })?;
    if let Some(error) = result.error {
      return Err(PapersError::ApiError(error));
    }

    info!(
      "PubMed returned {} of {} matching identifiers",
      result.idlist.len(),
      result.count.as_deref().unwrap_or("?")
    );
    Ok(result.idlist)
  }

  /// Downloads the full XML records for `ids`.
  ///
  /// An empty list short-circuits to [`EMPTY_ARTICLE_SET`] without touching the network.
  pub async fn fetch_details(&self, ids: &[String]) -> Result<String> {
    if ids.is_empty() {
      debug!("No identifiers to fetch");
      return Ok(EMPTY_ARTICLE_SET.to_string());
    }

    let url = self.endpoint("efetch.fcgi");
    let id = ids.join(",");
    let params = [("db", "pubmed"), ("id", id.as_str()), ("retmode", "xml")];
    debug!("Fetching {} records via {}", ids.len(), url);

    let request = if ids.len() > POST_THRESHOLD {
      let mut form: Vec<(&str, &str)> = params.to_vec();
      form.extend(self.credentials.iter().map(|(key, value)| (*key, value.as_str())));
      self.client.post(&url).form(&form)
    } else {
      self.client.get(&url).query(&params).query(&self.credentials)
    };

    let response = request.send().await?.error_for_status()?;
    let xml = response.text().await?;
    trace!("efetch returned {} bytes", xml.len());
    Ok(xml)
  }
}
