//! Translation of PubMed `efetch` XML into [`Article`] values.
//!
//! The extractor walks the document with a streaming [`quick_xml::Reader`] and matches the
//! handful of elements it cares about against the PubMed schema:
//!
//! ```xml
//! <PubmedArticleSet>
//!   <PubmedArticle>
//!     <MedlineCitation>
//!       <PMID>12345678</PMID>
//!       <Article>
//!         <Journal><JournalIssue><PubDate><Year>2021</Year></PubDate></JournalIssue></Journal>
//!         <ArticleTitle>A study</ArticleTitle>
//!         <AuthorList>
//!           <Author>
//!             <LastName>Doe</LastName>
//!             <ForeName>Jane</ForeName>
//!             <AffiliationInfo><Affiliation>Acme Biotech Inc.</Affiliation></AffiliationInfo>
//!           </Author>
//!         </AuthorList>
//!       </Article>
//!     </MedlineCitation>
//!   </PubmedArticle>
//! </PubmedArticleSet>
//! ```
//!
//! Every "this field may be absent" decision lives here. Downstream code only ever sees fully
//! populated [`Article`] and [`Author`] values.
//!
//! Matching rules inside a `PubmedArticle`:
//!
//! - the first `PMID` anywhere in the record is the identifier
//! - the first `ArticleTitle` is the title, including the text of inline markup such as `<i>`
//! - the first `Year` directly under a `PubDate` is the publication year
//! - every `Author` is an author; its direct `ForeName`/`LastName` children form the name and
//!   every `Affiliation` directly under an `AffiliationInfo` is an affiliation
//!
//! `PubmedBookArticle` records are not reported.

use quick_xml::{events::Event, Reader};

use super::*;

/// What to do with a record that has no `PMID`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingIdentifier {
  /// Log a warning and leave the record out of the result.
  #[default]
  Skip,
  /// Fail the whole batch with [`PapersError::MissingIdentifier`].
  Abort,
}

/// Parses an `efetch` response, skipping records without an identifier.
///
/// Equivalent to [`parse_pubmed_xml_with`] using [`MissingIdentifier::Skip`].
///
/// # Errors
///
/// Returns [`PapersError::Parse`] or [`PapersError::MalformedXml`] when the document is not
/// well formed. No partial result is returned in that case.
///
/// # Examples
///
/// ```
/// use pubmed_papers::extractor::parse_pubmed_xml;
///
/// let xml = r#"<PubmedArticleSet>
///   <PubmedArticle><MedlineCitation><PMID>1</PMID></MedlineCitation></PubmedArticle>
/// </PubmedArticleSet>"#;
/// let articles = parse_pubmed_xml(xml)?;
/// assert_eq!(articles[0].id, "1");
/// assert_eq!(articles[0].publication_year, "Unknown");
/// # Ok::<(), pubmed_papers::error::PapersError>(())
/// ```
pub fn parse_pubmed_xml(xml: &str) -> Result<Vec<Article>> {
  parse_pubmed_xml_with(xml, MissingIdentifier::default())
}

/// Parses an `efetch` response into articles, one per `PubmedArticle`, in document order.
///
/// # Errors
///
/// - [`PapersError::Parse`] for syntax errors and mismatched tags
/// - [`PapersError::MalformedXml`] for a document without root element, with unclosed
///   elements or with text outside the root element
/// - [`PapersError::MissingIdentifier`] for a record without `PMID` when `on_missing` is
///   [`MissingIdentifier::Abort`]
pub fn parse_pubmed_xml_with(xml: &str, on_missing: MissingIdentifier) -> Result<Vec<Article>> {
  let mut reader = Reader::from_str(xml);
  reader.config_mut().expand_empty_elements = true;

  let mut extraction = Extraction::new(on_missing);
  loop {
    match reader.read_event()? {
      Event::Start(e) => extraction.open(e.local_name().as_ref())?,
      Event::Text(e) => extraction.text(&e.unescape().map_err(quick_xml::Error::from)?)?,
      Event::CData(e) => extraction.text(&String::from_utf8_lossy(&e))?,
      Event::End(_) => extraction.close()?,
      Event::Eof => break,
      _ => (),
    }
  }

  extraction.finish()
}

/// Leaf elements whose text we keep.
#[derive(Debug, Clone, Copy)]
enum Field {
  /// `PMID`
  Pmid,
  /// `ArticleTitle`
  Title,
  /// `PubDate/Year`
  Year,
  /// `Author/ForeName`
  ForeName,
  /// `Author/LastName`
  LastName,
  /// `AffiliationInfo/Affiliation`
  Affiliation,
}

/// Text collected for a [`Field`] until its element closes.
#[derive(Debug)]
struct Capture {
  /// Field being collected
  field: Field,
  /// Element depth at which the field was opened
  depth: usize,
  /// Raw text seen so far
  text:  String,
}

/// Fields of a `PubmedArticle` gathered so far.
#[derive(Debug, Default)]
struct RecordBuilder {
  /// `PMID` text
  id:      Option<String>,
  /// `ArticleTitle` text
  title:   Option<String>,
  /// `PubDate/Year` text
  year:    Option<String>,
  /// Completed authors
  authors: Vec<Author>,
}

/// Fields of an `Author` gathered so far.
#[derive(Debug, Default)]
struct AuthorBuilder {
  /// `ForeName` text
  fore_name:    Option<String>,
  /// `LastName` text
  last_name:    Option<String>,
  /// `Affiliation` texts
  affiliations: Vec<String>,
}

impl AuthorBuilder {
  /// Finalizes the author, applying the name and email rules of [`Author::from_parts`].
  fn build(self) -> Author {
    Author::from_parts(self.fore_name.as_deref(), self.last_name.as_deref(), self.affiliations)
  }
}

/// State of one pass over a document.
struct Extraction {
  /// Missing identifier policy
  on_missing:   MissingIdentifier,
  /// Local names of the currently open elements
  stack:        Vec<Vec<u8>>,
  /// Whether the document element has been closed
  root_closed:  bool,
  /// Open `PubmedArticle` and its depth
  record:       Option<(usize, RecordBuilder)>,
  /// Open `Author` and its depth
  author:       Option<(usize, AuthorBuilder)>,
  /// Field currently collecting text
  capture:      Option<Capture>,
  /// Number of records closed so far, including skipped ones
  records_seen: usize,
  /// Finished articles
  articles:     Vec<Article>,
}

impl Extraction {
  /// Starts a pass with the given policy.
  fn new(on_missing: MissingIdentifier) -> Self {
    Self {
      on_missing,
      stack: Vec::new(),
      root_closed: false,
      record: None,
      author: None,
      capture: None,
      records_seen: 0,
      articles: Vec::new(),
    }
  }

  /// Whether the innermost open element is `tag`.
  fn parent_is(&self, tag: &[u8]) -> bool {
    self.stack.last().is_some_and(|parent| parent.as_slice() == tag)
  }

  /// Handles an opening tag.
  fn open(&mut self, name: &[u8]) -> Result<()> {
    if self.stack.is_empty() && self.root_closed {
      return Err(PapersError::MalformedXml("content after the document element".to_string()));
    }

    let under_pub_date = self.parent_is(b"PubDate");
    let under_affiliation_info = self.parent_is(b"AffiliationInfo");
    self.stack.push(name.to_vec());
    let depth = self.stack.len();

    if self.capture.is_some() {
      return Ok(());
    }

    if self.record.is_none() {
      if name == b"PubmedArticle" {
        trace!("Record #{} starts at depth {}", self.records_seen, depth);
        self.record = Some((depth, RecordBuilder::default()));
      }
      return Ok(());
    }
    if name == b"Author" {
      if self.author.is_none() {
        self.author = Some((depth, AuthorBuilder::default()));
      }
      return Ok(());
    }

    let Some((_, record)) = &self.record else { return Ok(()) };

    let author_child = |field: Field| match &self.author {
      Some((author_depth, author)) if depth == author_depth + 1 => {
        let taken = match field {
          Field::ForeName => author.fore_name.is_some(),
          _ => author.last_name.is_some(),
        };
        (!taken).then_some(field)
      },
      _ => None,
    };

    let field = match name {
      b"PMID" if record.id.is_none() => Some(Field::Pmid),
      b"ArticleTitle" if record.title.is_none() => Some(Field::Title),
      b"Year" if under_pub_date && record.year.is_none() => Some(Field::Year),
      b"ForeName" => author_child(Field::ForeName),
      b"LastName" => author_child(Field::LastName),
      b"Affiliation" if under_affiliation_info && self.author.is_some() =>
        Some(Field::Affiliation),
      _ => None,
    };

    self.capture = field.map(|field| Capture { field, depth, text: String::new() });
    Ok(())
  }

  /// Handles character data. Only whitespace may sit outside the document element.
  fn text(&mut self, text: &str) -> Result<()> {
    if self.stack.is_empty() {
      if text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}').is_empty() {
        return Ok(());
      }
      let place = if self.root_closed { "after" } else { "before" };
      return Err(PapersError::MalformedXml(format!("text {place} the document element")));
    }

    if let Some(capture) = self.capture.as_mut() {
      capture.text.push_str(text);
    }
    Ok(())
  }

  /// Handles a closing tag.
  fn close(&mut self) -> Result<()> {
    let depth = self.stack.len();

    match self.capture.take() {
      Some(capture) if capture.depth == depth => self.store(capture),
      other => self.capture = other,
    }

    match self.author.take() {
      Some((author_depth, author)) if author_depth == depth =>
        if let Some((_, record)) = self.record.as_mut() {
          record.authors.push(author.build());
        },
      other => self.author = other,
    }

    match self.record.take() {
      Some((record_depth, record)) if record_depth == depth => self.finish_record(record)?,
      other => self.record = other,
    }

    self.stack.pop();
    if self.stack.is_empty() {
      self.root_closed = true;
    }
    Ok(())
  }

  /// Moves captured text into the open record or author.
  fn store(&mut self, capture: Capture) {
    let value = capture.text.trim().to_string();
    match capture.field {
      Field::Pmid | Field::Title | Field::Year => {
        let Some((_, record)) = self.record.as_mut() else { return };
        let slot = match capture.field {
          Field::Pmid => &mut record.id,
          Field::Title => &mut record.title,
          _ => &mut record.year,
        };
        *slot = Some(value);
      },
      Field::ForeName | Field::LastName | Field::Affiliation => {
        let Some((_, author)) = self.author.as_mut() else { return };
        match capture.field {
          Field::ForeName => author.fore_name = Some(value),
          Field::LastName => author.last_name = Some(value),
          _ => author.affiliations.push(value),
        }
      },
    }
  }

  /// Turns a closed record into an [`Article`] or applies the missing identifier policy.
  fn finish_record(&mut self, record: RecordBuilder) -> Result<()> {
    let position = self.records_seen;
    self.records_seen += 1;

    let Some(id) = record.id.filter(|id| !id.is_empty()) else {
      return match self.on_missing {
        MissingIdentifier::Skip => {
          warn!("Skipping PubMed record #{} because it has no PMID", position);
          Ok(())
        },
        MissingIdentifier::Abort => Err(PapersError::MissingIdentifier { record: position }),
      };
    };

    let publication_year = record
      .year
      .filter(|year| !year.is_empty())
      .unwrap_or_else(|| UNKNOWN_YEAR.to_string());

    trace!("Parsed record {} with {} authors", id, record.authors.len());
    self.articles.push(Article {
      id,
      title: record.title.unwrap_or_default(),
      publication_year,
      authors: record.authors,
    });
    Ok(())
  }

  /// Checks that the document was complete and hands out the articles.
  fn finish(self) -> Result<Vec<Article>> {
    if let Some(open) = self.stack.last() {
      return Err(PapersError::MalformedXml(format!(
        "document ended inside <{}>",
        String::from_utf8_lossy(open)
      )));
    }
    if !self.root_closed {
      return Err(PapersError::MalformedXml("no root element found".to_string()));
    }

    debug!("Parsed {} articles from {} records", self.articles.len(), self.records_seen);
    Ok(self.articles)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Wraps record bodies into a `PubmedArticleSet`.
  fn article_set(records: &[&str]) -> String {
    let mut xml = String::from(
      "<?xml version=\"1.0\" ?>\n<!DOCTYPE PubmedArticleSet PUBLIC \"-//NLM//DTD PubMedArticle, \
       1st January 2024//EN\" \"https://dtd.nlm.nih.gov/ncbi/pubmed/out/pubmed_240101.dtd\">\n\
       <PubmedArticleSet>\n",
    );
    for record in records {
      xml.push_str("<PubmedArticle>");
      xml.push_str(record);
      xml.push_str("</PubmedArticle>\n");
    }
    xml.push_str("</PubmedArticleSet>\n");
    xml
  }

  const JANE_DOE: &str = r#"
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">38000001</PMID>
      <DateCompleted><Year>2024</Year><Month>01</Month><Day>05</Day></DateCompleted>
      <Article PubModel="Print">
        <Journal>
          <JournalIssue CitedMedium="Internet">
            <PubDate><Year>2023</Year><Month>Dec</Month></PubDate>
          </JournalIssue>
        </Journal>
        <ArticleTitle>Antibody engineering at scale.</ArticleTitle>
        <AuthorList CompleteYN="Y">
          <Author ValidYN="Y">
            <LastName>Doe</LastName>
            <ForeName>Jane</ForeName>
            <Initials>J</Initials>
            <AffiliationInfo>
              <Affiliation>Massachusetts General Hospital</Affiliation>
            </AffiliationInfo>
            <AffiliationInfo>
              <Affiliation>Acme Biotech Inc, contact: jane@acme.com</Affiliation>
            </AffiliationInfo>
          </Author>
          <Author ValidYN="Y">
            <LastName>Smith</LastName>
            <AffiliationInfo>
              <Affiliation>  Harvard University  </Affiliation>
            </AffiliationInfo>
          </Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
    <PubmedData>
      <ArticleIdList><ArticleId IdType="pubmed">38000001</ArticleId></ArticleIdList>
    </PubmedData>"#;

  #[test]
  fn test_parse_full_record() {
    let articles = parse_pubmed_xml(&article_set(&[JANE_DOE])).unwrap();
    assert_eq!(articles.len(), 1);

    let article = &articles[0];
    assert_eq!(article.id, "38000001");
    assert_eq!(article.title, "Antibody engineering at scale.");
    assert_eq!(article.publication_year, "2023");
    assert_eq!(article.authors.len(), 2);

    let jane = &article.authors[0];
    assert_eq!(jane.full_name, "Jane Doe");
    assert_eq!(jane.affiliations, vec![
      "Massachusetts General Hospital",
      "Acme Biotech Inc, contact: jane@acme.com"
    ]);
    assert_eq!(jane.email, "Acme Biotech Inc, contact: jane@acme.com");

    let smith = &article.authors[1];
    assert_eq!(smith.full_name, "Smith");
    assert_eq!(smith.affiliations, vec!["Harvard University"]);
    assert_eq!(smith.email, "");
  }

  #[test]
  fn test_missing_optional_fields_degrade() {
    let record = r#"<MedlineCitation><PMID>2</PMID><Article>
        <Journal><JournalIssue><PubDate><MedlineDate>2019 Nov-Dec</MedlineDate></PubDate>
        </JournalIssue></Journal>
        <AuthorList><Author ValidYN="Y"/><Author><CollectiveName>The Consortium</CollectiveName>
        </Author></AuthorList>
      </Article></MedlineCitation>"#;
    let articles = parse_pubmed_xml(&article_set(&[record])).unwrap();
    let article = &articles[0];
    assert_eq!(article.title, "");
    assert_eq!(article.publication_year, UNKNOWN_YEAR);
    assert_eq!(article.authors.len(), 2);
    assert!(article.authors.iter().all(|a| a.full_name.is_empty() && a.affiliations.is_empty()));
  }

  #[test]
  fn test_year_only_from_pub_date() {
    let record = r#"<MedlineCitation><PMID>3</PMID>
        <DateCompleted><Year>2020</Year></DateCompleted>
        <DateRevised><Year>2022</Year></DateRevised>
      </MedlineCitation>"#;
    let articles = parse_pubmed_xml(&article_set(&[record])).unwrap();
    assert_eq!(articles[0].publication_year, UNKNOWN_YEAR);
  }

  #[test]
  fn test_first_pmid_wins() {
    let record = r#"<MedlineCitation><PMID>4</PMID>
        <CommentsCorrectionsList><CommentsCorrections RefType="CommentOn">
          <RefSource>Other paper</RefSource><PMID>99</PMID>
        </CommentsCorrections></CommentsCorrectionsList>
      </MedlineCitation>"#;
    let articles = parse_pubmed_xml(&article_set(&[record])).unwrap();
    assert_eq!(articles[0].id, "4");
  }

  #[test]
  fn test_title_with_inline_markup_and_entities() {
    let record = r#"<MedlineCitation><PMID>5</PMID><Article>
        <ArticleTitle>Role of <i>E. coli</i> in R&amp;D pipelines</ArticleTitle>
        <AuthorList><Author><LastName>O&apos;Brien</LastName><ForeName>Pat</ForeName>
          <AffiliationInfo><Affiliation><![CDATA[Foo & Bar Ltd]]></Affiliation></AffiliationInfo>
        </Author></AuthorList>
      </Article></MedlineCitation>"#;
    let articles = parse_pubmed_xml(&article_set(&[record])).unwrap();
    assert_eq!(articles[0].title, "Role of E. coli in R&D pipelines");
    assert_eq!(articles[0].authors[0].full_name, "Pat O'Brien");
    assert_eq!(articles[0].authors[0].affiliations, vec!["Foo & Bar Ltd"]);
  }

  #[test]
  fn test_affiliation_requires_affiliation_info_parent() {
    let record = r#"<MedlineCitation><PMID>6</PMID><Article><AuthorList><Author>
        <LastName>Roe</LastName>
        <Affiliation>Stray Corp</Affiliation>
        <AffiliationInfo><Affiliation></Affiliation></AffiliationInfo>
        <AffiliationInfo><Affiliation>Real Corp</Affiliation></AffiliationInfo>
      </Author></AuthorList></Article></MedlineCitation>"#;
    let articles = parse_pubmed_xml(&article_set(&[record])).unwrap();
    assert_eq!(articles[0].authors[0].affiliations, vec!["Real Corp"]);
  }

  #[test]
  fn test_records_keep_document_order() {
    let first = "<MedlineCitation><PMID>10</PMID></MedlineCitation>";
    let second = "<MedlineCitation><PMID>11</PMID></MedlineCitation>";
    let third = "<MedlineCitation><PMID>12</PMID></MedlineCitation>";
    let ids: Vec<String> = parse_pubmed_xml(&article_set(&[first, second, third]))
      .unwrap()
      .into_iter()
      .map(|article| article.id)
      .collect();
    assert_eq!(ids, vec!["10", "11", "12"]);
  }

  #[test]
  fn test_empty_article_set() {
    assert!(parse_pubmed_xml(&article_set(&[])).unwrap().is_empty());
    assert!(parse_pubmed_xml("<PubmedArticleSet/>").unwrap().is_empty());
  }

  #[traced_test]
  #[test]
  fn test_missing_identifier_is_skipped() {
    let anonymous = "<MedlineCitation><Article><ArticleTitle>No id</ArticleTitle></Article>\
                     </MedlineCitation>";
    let blank = "<MedlineCitation><PMID>  </PMID></MedlineCitation>";
    let valid = "<MedlineCitation><PMID>7</PMID></MedlineCitation>";
    let articles = parse_pubmed_xml(&article_set(&[anonymous, blank, valid])).unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].id, "7");
    assert!(logs_contain("Skipping PubMed record #0"));
    assert!(logs_contain("Skipping PubMed record #1"));
  }

  #[test]
  fn test_missing_identifier_aborts() {
    let valid = "<MedlineCitation><PMID>7</PMID></MedlineCitation>";
    let anonymous = "<MedlineCitation></MedlineCitation>";
    let result =
      parse_pubmed_xml_with(&article_set(&[valid, anonymous]), MissingIdentifier::Abort);
    assert!(matches!(result, Err(PapersError::MissingIdentifier { record: 1 })));
  }

  #[test]
  fn test_malformed_markup_fails() {
    assert!(parse_pubmed_xml("").is_err());
    assert!(parse_pubmed_xml("   \n").is_err());
    assert!(parse_pubmed_xml("not xml at all").is_err());
    assert!(parse_pubmed_xml("<PubmedArticleSet><PubmedArticle>").is_err());
    assert!(parse_pubmed_xml("<PubmedArticleSet><PMID>1</Title></PubmedArticleSet>").is_err());
    assert!(parse_pubmed_xml("<PubmedArticleSet/><PubmedArticleSet/>").is_err());
    assert!(parse_pubmed_xml("<PubmedArticleSet></PubmedArticleSet>garbage").is_err());
    assert!(parse_pubmed_xml("garbage<PubmedArticleSet></PubmedArticleSet>").is_err());
  }

  #[test]
  fn test_whitespace_around_root_allowed() {
    let xml = "<?xml version=\"1.0\"?>\n<!DOCTYPE PubmedArticleSet>\n  <PubmedArticleSet>\
               </PubmedArticleSet>\n\n";
    assert!(parse_pubmed_xml(xml).unwrap().is_empty());
  }

  #[test]
  fn test_book_articles_ignored() {
    let xml = "<PubmedArticleSet><PubmedBookArticle><BookDocument><PMID>8</PMID></BookDocument>\
               </PubmedBookArticle></PubmedArticleSet>";
    assert!(parse_pubmed_xml(xml).unwrap().is_empty());
  }
}
