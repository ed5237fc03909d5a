mod bench;
mod config;
mod ext;
mod format;
mod report;
mod run;
mod stats;
mod variant;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use self::{bench::Bench, config::Config, run::ProcessRunner, variant::Variant};

#[derive(Parser)]
struct Args {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Build every test, simulate each variant in gem5, and print the results.
  Bench {
    /// Tests to benchmark, in order.
    #[arg(short, long = "test", value_delimiter = ',', default_values = config::DEFAULT_TESTS)]
    tests: Vec<String>,
    /// Variants to simulate for each test, in order.
    #[arg(
      short,
      long = "variant",
      value_enum,
      value_delimiter = ',',
      default_values = ["O1", "O1_w_slp", "O2"]
    )]
    variants: Vec<Variant>,
    /// Path to the gem5 installation.
    #[arg(long, default_value = config::DEFAULT_GEM5_DIR)]
    gem5_dir: PathBuf,
    /// Directory with the Makefile and one sub-directory per test.
    #[arg(long, default_value = ".")]
    tests_dir: PathBuf,
    /// Build tool, invoked as `<make> all TEST=<test>`.
    #[arg(long, default_value = "make")]
    make: String,
    /// Kill a build or simulation after this many seconds.
    #[arg(long)]
    timeout: Option<u64>,
    /// Print the results as JSON instead of a table.
    #[arg(long)]
    json: bool,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(io::stderr)
    .init();

  match Args::parse().command {
    Command::Bench {
      tests,
      variants,
      gem5_dir,
      tests_dir,
      make,
      timeout,
      json,
    } => {
      let config = Config {
        tests,
        variants,
        gem5_dir,
        tests_dir,
        make,
        timeout: timeout.map(Duration::from_secs),
      };
      config.validate()?;

      let mut bench = Bench::new(config, ProcessRunner, io::stdout());
      bench.bench().context("bench")?;

      info!(entries = bench.results.len(), summary = %bench.summary, "done");

      let output = if json {
        format::json(&bench.results)
      } else {
        format::format(&bench.results)
      };
      println!("{}", output.context("format")?);
    }
  }

  Ok(())
}
