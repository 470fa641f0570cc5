//! CSV export of report rows.
//!
//! The header row is always [`ReportRow::HEADERS`], even when there are no rows to write.

use std::io::Write;

use super::*;

/// Writes `rows` as CSV to the file at `path`, replacing it if it exists.
pub fn write_csv(rows: &[ReportRow], path: impl AsRef<Path>) -> Result<()> {
  let path = path.as_ref();
  let file = std::fs::File::create(path)?;
  write_csv_to(rows, file)?;
  info!("Wrote {} rows to {}", rows.len(), path.display());
  Ok(())
}

/// Writes `rows` as CSV to any writer.
///
/// ```
/// use pubmed_papers::{export::write_csv_to, report::ReportRow};
///
/// let mut out = Vec::new();
/// write_csv_to(&[ReportRow::default()], &mut out)?;
/// assert!(String::from_utf8(out)?.starts_with("PubmedID,Title,Publication Date,"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_csv_to<W: Write>(rows: &[ReportRow], writer: W) -> Result<()> {
  let mut writer = csv::Writer::from_writer(writer);
  writer.write_record(ReportRow::HEADERS)?;
  for row in rows {
    writer.write_record(row.fields())?;
  }
  writer.flush()?;
  Ok(())
}
