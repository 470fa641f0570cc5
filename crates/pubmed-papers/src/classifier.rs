//! Academic versus non-academic affiliation heuristic.
//!
//! An affiliation counts as academic when its lowercase form contains any of
//! [`ACADEMIC_KEYWORDS`] as a plain substring. Everything else is treated as a company.
//!
//! The test is deliberately crude and its mistakes are part of the contract: "XYZ Lab Solutions"
//! is academic because it contains "lab", and "Labcorp" is academic for the same reason, while a
//! university spelled in another language ("Universität Wien") is a company.
//!
//! ```
//! use pubmed_papers::classifier::AffiliationClassifier;
//!
//! let classifier = AffiliationClassifier::default();
//! assert!(classifier.is_non_academic("Pfizer Inc., New York, NY, USA"));
//! assert!(!classifier.is_non_academic("Department of Chemistry, MIT"));
//! ```

use super::*;

/// Substrings that mark an affiliation as academic.
pub const ACADEMIC_KEYWORDS: [&str; 11] = [
  "university",
  "college",
  "school",
  "institute",
  "department",
  "hospital",
  "centre",
  "center",
  "faculty",
  "lab",
  "clinic",
];

/// Keyword based affiliation classifier.
///
/// The keyword list is fixed once the classifier is built. [`Default`] uses
/// [`ACADEMIC_KEYWORDS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffiliationClassifier {
  /// Lowercase academic keywords
  keywords: Vec<String>,
}

/// An author kept because of at least one non-academic affiliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedAuthor {
  /// The author's full name
  pub name:      String,
  /// Non-academic affiliations in source order, without duplicates
  pub companies: Vec<String>,
  /// The author's email, possibly empty
  pub email:     String,
}

impl Default for AffiliationClassifier {
  fn default() -> Self { Self::with_keywords(ACADEMIC_KEYWORDS) }
}

impl AffiliationClassifier {
  /// Builds a classifier from a custom keyword list.
  ///
  /// Keywords are lowercased and blank entries dropped, so matching stays case insensitive.
  pub fn with_keywords<I, S>(keywords: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>, {
    let keywords = keywords
      .into_iter()
      .map(|keyword| keyword.as_ref().trim().to_lowercase())
      .filter(|keyword| !keyword.is_empty())
      .collect();
    Self { keywords }
  }

  /// The lowercase keywords this classifier matches.
  pub fn keywords(&self) -> &[String] { &self.keywords }

  /// Returns `true` when `affiliation` contains none of the academic keywords.
  pub fn is_non_academic(&self, affiliation: &str) -> bool {
    let affiliation = affiliation.to_lowercase();
    !self.keywords.iter().any(|keyword| affiliation.contains(keyword.as_str()))
  }

  /// Keeps the authors that have at least one non-academic affiliation.
  ///
  /// Each kept author carries only its non-academic affiliations, in their original order.
  /// Authors without any are dropped rather than returned with an empty list.
  pub fn extract_company_authors(&self, authors: &[Author]) -> Vec<ClassifiedAuthor> {
    authors
      .iter()
      .filter_map(|author| {
        let mut seen = HashSet::new();
        let companies: Vec<String> = author
          .affiliations
          .iter()
          .filter(|affiliation| self.is_non_academic(affiliation))
          .filter(|affiliation| seen.insert(affiliation.as_str()))
          .cloned()
          .collect();

        if companies.is_empty() {
          trace!("No company affiliation for author {:?}", author.full_name);
          return None;
        }

        Some(ClassifiedAuthor {
          name: author.full_name.clone(),
          companies,
          email: author.email.clone(),
        })
      })
      .collect()
  }
}
