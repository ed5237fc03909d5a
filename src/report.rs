use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::{
  config::Config,
  stats::{Measurement, Ticks},
  variant::Variant,
};

/// Position of the cycle count in `stats.txt`: second line, second column.
const TICKS_LINE: usize = 1;
const TICKS_FIELD: usize = 1;

/// Returns the cycle count of a gem5 `stats.txt` report, unparsed.
fn parse_ticks(report: &str) -> Result<Ticks> {
  let Some(line) = report.lines().nth(TICKS_LINE) else {
    anyhow::bail!("report has fewer than {} lines", TICKS_LINE + 1);
  };

  let Some(ticks) = line.split_whitespace().nth(TICKS_FIELD) else {
    anyhow::bail!("no field {} in {line:?}", TICKS_FIELD + 1);
  };

  Ok(ticks.to_string())
}

fn read_ticks(report: &Path) -> Result<Ticks> {
  let contents = fs::read_to_string(report).with_context(|| format!("read {report:?}"))?;

  parse_ticks(&contents).with_context(|| format!("parse {report:?}"))
}

fn code_size(binary: &Path) -> Result<u64> {
  let metadata = fs::metadata(binary).with_context(|| format!("metadata {binary:?}"))?;

  Ok(metadata.len())
}

/// Reads the measurement for `test` compiled as `variant` from the last
/// simulation's report and the binary on disk.
pub fn measure(config: &Config, test: &str, variant: Variant) -> Result<Measurement> {
  let tick_count = read_ticks(&config.report_path()).context("tick count")?;
  let code_size = code_size(&config.binary_path(test, variant)).context("code size")?;

  Ok(Measurement { tick_count, code_size })
}
