use std::{fmt, fs, io::Write};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::{
  config::Config,
  report,
  run::{self, Runner, Status},
  stats::Results,
  variant::Variant,
};

const TEST_RULE: usize = 50;
const STEP_RULE: usize = 25;

/// What went wrong, and how much got measured, over a whole run.
#[derive(Debug, Default)]
pub struct Summary {
  pub measured: usize,
  pub failed_builds: Vec<String>,
  pub failed_simulations: Vec<(String, Variant)>,
}

impl fmt::Display for Summary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let builds = self.failed_builds.join(", ");
    let simulations = self
      .failed_simulations
      .iter()
      .map(|(test, variant)| format!("{test}/{variant}"))
      .collect::<Vec<_>>()
      .join(", ");

    write!(
      f,
      "measured {}, failed builds [{builds}], failed simulations [{simulations}]",
      self.measured
    )
  }
}

pub struct Bench<R, W> {
  config: Config,
  runner: R,
  /// Receives the progress text.
  out: W,
  /// Measurements for every configured test and variant.
  pub results: Results,
  pub summary: Summary,
}

impl<R: Runner, W: Write> Bench<R, W> {
  pub fn new(config: Config, runner: R, out: W) -> Self {
    let results = Results::new(config.tests.iter().map(String::as_str), &config.variants);

    Self {
      config,
      runner,
      out,
      results,
      summary: Summary::default(),
    }
  }

  /// Builds and simulates every configured test. Failed builds and
  /// simulations are skipped; a run only errors if a command can't be
  /// launched or a successful simulation left no usable report.
  pub fn bench(&mut self) -> Result<()> {
    for test in self.config.tests.clone() {
      self.bench_test(&test).with_context(|| format!("bench {test}"))?;
    }

    Ok(())
  }

  fn bench_test(&mut self, test: &str) -> Result<()> {
    writeln!(self.out)?;
    writeln!(self.out, "TEST={test}")?;
    writeln!(self.out, "{}", "=".repeat(TEST_RULE))?;
    writeln!(self.out)?;

    if !self.build(test).context("build")? {
      return Ok(());
    }

    writeln!(self.out)?;

    for variant in self.config.variants.clone() {
      writeln!(self.out, "{variant}")?;
      writeln!(self.out, "{}", "=".repeat(STEP_RULE))?;

      if self.simulate(test, variant).with_context(|| format!("simulate {variant}"))? {
        self.extract(test, variant).with_context(|| format!("extract {variant}"))?;
      }

      writeln!(self.out)?;
    }

    writeln!(self.out, "{}", "=".repeat(TEST_RULE))?;
    writeln!(self.out)?;

    Ok(())
  }

  fn build(&mut self, test: &str) -> Result<bool> {
    self.progress("running make... ")?;

    let status = self.runner.run(&mut run::make_command(&self.config, test), self.config.timeout)?;
    self.status(status, "")?;

    if !status.is_success() {
      warn!(test, %status, "build failed");
      self.summary.failed_builds.push(test.to_string());
    }

    Ok(status.is_success())
  }

  fn simulate(&mut self, test: &str, variant: Variant) -> Result<bool> {
    self.progress("\trunning gem5...")?;

    // The report location is shared by every simulation.
    let report = self.config.report_path();
    if report.exists() {
      fs::remove_file(&report).with_context(|| format!("remove stale {report:?}"))?;
    }

    let mut gem5 = run::gem5_command(&self.config, test, variant);
    let status = self.runner.run(&mut gem5, self.config.timeout)?;
    self.status(status, "\t")?;

    if !status.is_success() {
      warn!(test, %variant, %status, "simulation failed");
      self.summary.failed_simulations.push((test.to_string(), variant));
    }

    Ok(status.is_success())
  }

  fn extract(&mut self, test: &str, variant: Variant) -> Result<()> {
    let measurement = report::measure(&self.config, test, variant)?;

    info!(
      test,
      %variant,
      tick_count = %measurement.tick_count,
      code_size = measurement.code_size,
      "measured"
    );

    self.results.record(test, variant, measurement)?;
    self.summary.measured += 1;

    Ok(())
  }

  /// Writes a partial line and flushes it, so it shows before the command's
  /// own output.
  fn progress(&mut self, message: &str) -> Result<()> {
    write!(self.out, "{message}")?;
    self.out.flush().context("flush progress")
  }

  fn status(&mut self, status: Status, indent: &str) -> Result<()> {
    writeln!(self.out, "{}", if status.is_success() { "SUCCESS" } else { "FAIL" })?;
    writeln!(self.out, "{indent}{}", "=".repeat(STEP_RULE))?;

    Ok(())
  }
}
