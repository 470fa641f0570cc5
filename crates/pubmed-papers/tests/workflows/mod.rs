use super::*;

const ACME: &str = "Acme Biotech Inc, Cambridge, MA, USA. Electronic address: jane@acme.com.";

#[test]
fn test_sample_articles_parse() -> TestResult<()> {
  let articles = parse_pubmed_xml(&sample_xml())?;
  assert_eq!(articles.len(), 3);

  assert_eq!(articles[0].id, "38100001");
  assert_eq!(articles[0].title, "Engineered antibodies against Staphylococcus aureus toxins.");
  assert_eq!(articles[0].publication_year, "2023");
  assert_eq!(articles[0].authors[2].full_name, "Anna Müller");

  assert_eq!(articles[2].publication_year, UNKNOWN_YEAR);
  assert_eq!(articles[2].authors[0].full_name, "Smith");
  assert_eq!(articles[2].authors[2].full_name, "");
  Ok(())
}

#[test]
fn test_sample_report() -> TestResult<()> {
  let articles = parse_pubmed_xml(&sample_xml())?;
  let rows = build_report(&articles, &AffiliationClassifier::default());
  assert_eq!(rows.len(), 3);

  let first = &rows[0];
  assert_eq!(first.non_academic_authors, vec!["Jane Doe", "Bo Li"]);
  assert_eq!(first.company_affiliations, vec![ACME, "Genentech, South San Francisco, CA, USA."]);
  assert_eq!(first.corresponding_email, ACME);

  // "Istituto" is not "institute", so the heuristic calls it a company.
  let second = &rows[1];
  assert_eq!(second.non_academic_authors, vec!["Marco Rossi"]);
  assert_eq!(second.company_affiliations, vec!["Istituto Superiore di Sanità, Rome, Italy."]);
  assert_eq!(second.corresponding_email, "");

  // "XYZ Lab Solutions" reads as academic, so Smith is not reported.
  let third = &rows[2];
  assert_eq!(third.publication_year, UNKNOWN_YEAR);
  assert_eq!(third.non_academic_authors, vec!["Yuki Tanaka"]);
  Ok(())
}

#[test]
fn test_sample_report_to_csv() -> TestResult<()> {
  let rows = Pipeline::new(Config::default())?.report_from_xml(&sample_xml())?;
  let dir = tempdir()?;
  let path = dir.path().join("papers.csv");
  write_csv(&rows, &path)?;

  let content = fs::read_to_string(&path)?;
  let mut lines = content.lines();
  assert_eq!(lines.next(), Some(ReportRow::HEADERS.join(",").as_str()));
  assert!(lines.next().is_some_and(|line| line.starts_with("38100001,")));
  assert!(content.contains("Jane Doe; Bo Li"));
  assert_eq!(content.lines().count(), 4);
  Ok(())
}
