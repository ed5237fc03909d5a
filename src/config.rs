use std::{path::PathBuf, time::Duration};

use anyhow::Result;

use crate::variant::Variant;

pub const DEFAULT_TESTS: [&str; 5] = ["axpy", "arithmetic", "dotprod", "memcpy", "mmm"];
pub const DEFAULT_GEM5_DIR: &str = "/compiler/15745/gem5";

const GEM5_BIN: &str = "build/ARM/gem5.opt";
const SE_SCRIPT: &str = "configs/example/se.py";
const OUT_DIR: &str = "m5_out";
const REPORT: &str = "stats.txt";

/// Everything a benchmarking run needs to know up front.
#[derive(Clone, Debug)]
pub struct Config {
  /// Tests to build and simulate, in order.
  pub tests: Vec<String>,
  /// Variants simulated for every test that builds, in order.
  pub variants: Vec<Variant>,
  /// Root of the gem5 installation.
  pub gem5_dir: PathBuf,
  /// Holds the Makefile, one sub-directory per test, and gem5's output.
  pub tests_dir: PathBuf,
  /// Build tool invoked as `<make> all TEST=<test>`.
  pub make: String,
  /// Subprocesses running longer than this are killed and count as failed.
  pub timeout: Option<Duration>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      tests: DEFAULT_TESTS.map(String::from).to_vec(),
      variants: Variant::ALL.to_vec(),
      gem5_dir: PathBuf::from(DEFAULT_GEM5_DIR),
      tests_dir: PathBuf::from("."),
      make: "make".to_string(),
      timeout: None,
    }
  }
}

impl Config {
  /// Checks what can be checked before anything runs.
  pub fn validate(&self) -> Result<()> {
    if !self.tests_dir.is_dir() {
      anyhow::bail!("tests directory {:?} is not a directory", self.tests_dir);
    }

    Ok(())
  }

  pub fn gem5_bin(&self) -> PathBuf {
    self.gem5_dir.join(GEM5_BIN)
  }

  pub fn se_script(&self) -> PathBuf {
    self.gem5_dir.join(SE_SCRIPT)
  }

  /// Directory gem5 is told to write its output into.
  pub fn out_dir(&self) -> PathBuf {
    self.tests_dir.join(OUT_DIR)
  }

  /// The stats report written by the most recent simulation.
  pub fn report_path(&self) -> PathBuf {
    self.out_dir().join(REPORT)
  }

  /// Where the Makefile leaves `test` compiled as `variant`.
  pub fn binary_path(&self, test: &str, variant: Variant) -> PathBuf {
    self.tests_dir.join(test).join(format!("{test}{}", variant.suffix()))
  }
}
