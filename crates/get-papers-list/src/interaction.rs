//! Console output.

use tabled::{
  builder::Builder,
  settings::{object::Rows, Alignment, Modify, Style},
};

use super::*;

pub static INFO_PREFIX: &str = "ℹ ";
pub static SUCCESS_PREFIX: &str = "✓ ";
pub static ERROR_PREFIX: &str = "✗ ";

/// Title printed above the results table.
pub static TABLE_TITLE: &str = "PubMed Results";

#[derive(Debug)]
pub enum ResponseContent<'a> {
  Report(&'a [ReportRow]),
  Success(&'a str),
  Info(&'a str),
}

/// Prints a response on stdout.
pub fn reply(content: ResponseContent) {
  match content {
    ResponseContent::Report(rows) =>
      if rows.is_empty() {
        reply(ResponseContent::Info("No papers with non-academic authors found"));
      } else {
        println!("{}", style(TABLE_TITLE).bold());
        println!("{}", render_table(rows));
        reply(ResponseContent::Info(&format!("Found {} papers", rows.len())));
      },
    ResponseContent::Success(message) => println!("{} {}", style(SUCCESS_PREFIX).green(), message),
    ResponseContent::Info(message) => println!("{} {}", style(INFO_PREFIX).blue(), message),
  }
}

/// Renders the report as a table with [`ReportRow::HEADERS`] as header row.
pub fn render_table(rows: &[ReportRow]) -> String {
  let mut builder = Builder::default();
  builder.push_record(ReportRow::HEADERS);
  for row in rows {
    builder.push_record(row.fields());
  }

  let mut table = builder.build();
  table.with(Style::rounded()).with(Modify::new(Rows::first()).with(Alignment::center()));
  table.to_string()
}
