//! Flat report rows, one per article with industry-affiliated authors.
//!
//! Both the CSV export and the console table use [`ReportRow::HEADERS`] and
//! [`ReportRow::fields`], so the two outputs always agree on column names and order.

use super::*;

/// Separator used when a list is written into a single column.
pub const LIST_SEPARATOR: &str = "; ";

/// One line of the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
  /// PubMed identifier of the article
  pub id:                   String,
  /// Article title
  pub title:                String,
  /// Publication year or `"Unknown"`
  pub publication_year:     String,
  /// Names of the non-academic authors, in author order
  pub non_academic_authors: Vec<String>,
  /// Every company affiliation of those authors, each listed once
  pub company_affiliations: Vec<String>,
  /// First non-empty email among those authors
  pub corresponding_email:  String,
}

impl ReportRow {
  /// Column headers, in output order.
  pub const HEADERS: [&'static str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
  ];

  /// Column values matching [`ReportRow::HEADERS`], lists joined with [`LIST_SEPARATOR`].
  pub fn fields(&self) -> [String; 6] {
    [
      self.id.clone(),
      self.title.clone(),
      self.publication_year.clone(),
      self.non_academic_authors.join(LIST_SEPARATOR),
      self.company_affiliations.join(LIST_SEPARATOR),
      self.corresponding_email.clone(),
    ]
  }
}

/// Folds an article and its classified authors into a report row.
///
/// Returns `None` when `authors` is empty. Company affiliations shared by several authors
/// appear once, in the order they are first met.
///
/// ```
/// use pubmed_papers::{article::Article, classifier::ClassifiedAuthor, report::build_report_row};
///
/// let article = Article { id: "1".into(), ..Default::default() };
/// assert!(build_report_row(&article, &[]).is_none());
///
/// let authors = [ClassifiedAuthor { name: "Jane Doe".into(), ..Default::default() }];
/// let row = build_report_row(&article, &authors).unwrap();
/// assert_eq!(row.non_academic_authors, ["Jane Doe"]);
/// ```
pub fn build_report_row(article: &Article, authors: &[ClassifiedAuthor]) -> Option<ReportRow> {
  if authors.is_empty() {
    return None;
  }

  let mut seen = HashSet::new();
  let company_affiliations = authors
    .iter()
    .flat_map(|author| author.companies.iter())
    .filter(|company| seen.insert(company.as_str()))
    .cloned()
    .collect();

  let corresponding_email = authors
    .iter()
    .map(|author| author.email.as_str())
    .find(|email| !email.is_empty())
    .unwrap_or_default()
    .to_string();

  Some(ReportRow {
    id: article.id.clone(),
    title: article.title.clone(),
    publication_year: article.publication_year.clone(),
    non_academic_authors: authors.iter().map(|author| author.name.clone()).collect(),
    company_affiliations,
    corresponding_email,
  })
}

/// Classifies every article and keeps the ones that produce a row, in source order.
pub fn build_report(articles: &[Article], classifier: &AffiliationClassifier) -> Vec<ReportRow> {
  let rows: Vec<ReportRow> = articles
    .iter()
    .filter_map(|article| {
      let authors = classifier.extract_company_authors(&article.authors);
      build_report_row(article, &authors)
    })
    .collect();

  debug!("{} of {} articles have non-academic authors", rows.len(), articles.len());
  rows
}
