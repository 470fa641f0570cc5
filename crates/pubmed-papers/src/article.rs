//! Parsed PubMed article records.
//!
//! An [`Article`] is what the [`extractor`](crate::extractor) produces for each `PubmedArticle`
//! in an `efetch` response. Values are built once and only read afterwards.

use super::*;

/// Placeholder used for [`Article::publication_year`] when the record has no `PubDate/Year`.
pub const UNKNOWN_YEAR: &str = "Unknown";

/// A single PubMed article with its authors.
///
/// # Examples
///
/// ```
/// use pubmed_papers::article::{Article, Author, UNKNOWN_YEAR};
///
/// let article = Article {
///   id:               "12345678".to_string(),
///   title:            "A study".to_string(),
///   publication_year: UNKNOWN_YEAR.to_string(),
///   authors:          vec![Author::default()],
/// };
/// assert!(!article.has_known_year());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
  /// PubMed identifier (`PMID`)
  pub id:               String,
  /// Article title, empty when the record has none
  pub title:            String,
  /// Four digit year of publication or [`UNKNOWN_YEAR`]
  pub publication_year: String,
  /// Authors in the order PubMed lists them
  pub authors:          Vec<Author>,
}

/// An author as listed on one article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
  /// Given name and family name joined by a space, may be empty
  pub full_name:    String,
  /// Trimmed affiliation strings in source order
  pub affiliations: Vec<String>,
  /// First affiliation containing an `@`, or empty
  pub email:        String,
}

impl Article {
  /// Whether the record carried a publication year.
  pub fn has_known_year(&self) -> bool { self.publication_year != UNKNOWN_YEAR }
}

impl Author {
  /// Builds an author from the raw name parts and affiliation texts of a record.
  ///
  /// Missing name parts are treated as empty strings and the joined name is trimmed, so an
  /// author with only a family name ends up with just that name. Affiliations are trimmed and
  /// blank ones dropped. The email is the first remaining affiliation that contains an `@`;
  /// that affiliation is kept in the list as well.
  ///
  /// ```
  /// use pubmed_papers::article::Author;
  ///
  /// let author = Author::from_parts(None, Some("Smith"), vec!["  Acme Corp, a@acme.com ".into()]);
  /// assert_eq!(author.full_name, "Smith");
  /// assert_eq!(author.email, "Acme Corp, a@acme.com");
  /// ```
  pub fn from_parts(
    fore_name: Option<&str>,
    last_name: Option<&str>,
    affiliations: Vec<String>,
  ) -> Self {
    let full_name =
      format!("{} {}", fore_name.unwrap_or_default(), last_name.unwrap_or_default())
        .trim()
        .to_string();

    let affiliations: Vec<String> = affiliations
      .into_iter()
      .map(|affiliation| affiliation.trim().to_string())
      .filter(|affiliation| !affiliation.is_empty())
      .collect();

    let email = affiliations
      .iter()
      .find(|affiliation| affiliation.contains('@'))
      .cloned()
      .unwrap_or_default();

    Self { full_name, affiliations, email }
  }
}
