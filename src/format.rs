use std::fmt::Write;

use anyhow::{Context, Result};

use crate::stats::Results;

const COLUMN_WIDTH: usize = 14;
const COLUMN_PADDING: &str = "  ";
const COLUMNS: [&str; 4] = ["test", "variant", "tick_count", "code_size"];

fn format_header() -> String {
  let header = COLUMNS
    .iter()
    .map(|col| format!("{col:<COLUMN_WIDTH$}"))
    .collect::<Vec<_>>()
    .join(COLUMN_PADDING);

  format!("{header}\n{}", "=".repeat(header.len()))
}

/// Names are left-aligned, measurements right-aligned.
fn format_row(cols: [&str; 4]) -> String {
  cols
    .iter()
    .enumerate()
    .map(|(i, col)| {
      if i < 2 {
        format!("{col:<COLUMN_WIDTH$}")
      } else {
        format!("{col:>COLUMN_WIDTH$}")
      }
    })
    .collect::<Vec<_>>()
    .join(COLUMN_PADDING)
}

/// Renders `results` as a text table, one block of rows per test.
pub fn format(results: &Results) -> Result<String> {
  let mut table = String::new();

  writeln!(table, "{}", format_header())?;

  for (test, variants) in results.iter() {
    let mut width = 0;

    for (i, (variant, measurement)) in variants.iter().enumerate() {
      let code_size = measurement.code_size.to_string();
      let row = format_row([
        if i == 0 { test } else { "" },
        variant.name(),
        measurement.tick_count.as_str(),
        code_size.as_str(),
      ]);

      writeln!(table, "{row}")?;
      width = row.len();
    }

    writeln!(table, "{}", "-".repeat(width))?;
  }

  Ok(table)
}

/// Renders `results` as pretty JSON, keyed by test then variant.
pub fn json(results: &Results) -> Result<String> {
  serde_json::to_string_pretty(results).context("serialize results")
}
