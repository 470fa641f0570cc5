//! User configuration.
//!
//! Configuration lives in a TOML file, by default `<config dir>/pubmed-papers/config.toml`.
//! Every key is optional:
//!
//! ```toml
//! base_url = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils"
//! max_results = 100
//! api_key = "0123456789abcdef"
//! email = "me@example.com"
//! tool = "pubmed-papers"
//! academic_keywords = ["university", "college", "school"]
//! on_missing_identifier = "skip"
//! ```

use crate::extractor::MissingIdentifier;

use super::*;

/// Default NCBI E-utilities endpoint.
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Default number of identifiers requested from `esearch`.
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Settings for searching PubMed and classifying affiliations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// E-utilities base URL, without trailing slash
  pub base_url:              String,
  /// Maximum number of articles per query
  pub max_results:           usize,
  /// NCBI API key, raises the request quota when present
  pub api_key:               Option<String>,
  /// Contact email sent to NCBI with every request
  pub email:                 Option<String>,
  /// Tool name sent to NCBI with every request
  pub tool:                  Option<String>,
  /// Overrides [`ACADEMIC_KEYWORDS`] when set
  pub academic_keywords:     Option<Vec<String>>,
  /// What to do with records lacking a PMID
  pub on_missing_identifier: MissingIdentifier,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      base_url:              DEFAULT_BASE_URL.to_string(),
      max_results:           DEFAULT_MAX_RESULTS,
      api_key:               None,
      email:                 None,
      tool:                  None,
      academic_keywords:     None,
      on_missing_identifier: MissingIdentifier::default(),
    }
  }
}

impl Config {
  /// Platform specific location of the configuration file.
  ///
  /// Falls back to the current directory when the platform has no config directory.
  pub fn default_path() -> PathBuf {
    dirs::config_dir()
      .unwrap_or_else(|| PathBuf::from("."))
      .join("pubmed-papers")
      .join("config.toml")
  }

  /// Parses a configuration from TOML text.
  pub fn from_toml_str(toml_str: &str) -> Result<Self> {
    let config: Self = toml::from_str(toml_str)?;
    config.validate()?;
    Ok(config)
  }

  /// Reads a configuration file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    Self::from_toml_str(&content)
  }

  /// Reads `path` if it exists, otherwise returns the defaults.
  pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if path.exists() {
      Self::load(path)
    } else {
      debug!("No configuration at {}, using defaults", path.display());
      Ok(Self::default())
    }
  }

  /// The classifier described by this configuration.
  pub fn classifier(&self) -> AffiliationClassifier {
    match &self.academic_keywords {
      Some(keywords) => AffiliationClassifier::with_keywords(keywords),
      None => AffiliationClassifier::default(),
    }
  }

  /// Rejects values that would make every request fail.
  fn validate(&self) -> Result<()> {
    if self.base_url.trim().is_empty() {
      return Err(PapersError::Config("`base_url` must not be empty".to_string()));
    }
    if self.max_results == 0 {
      return Err(PapersError::Config("`max_results` must be at least 1".to_string()));
    }
    if self.academic_keywords.as_ref().is_some_and(|keywords| keywords.is_empty()) {
      return Err(PapersError::Config("`academic_keywords` must not be empty".to_string()));
    }
    Ok(())
  }
}
