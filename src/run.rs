use std::{
  ffi::OsString,
  fmt,
  process::{Command, ExitStatus},
  time::Duration,
};

use anyhow::{Context, Result};
use tracing::debug;

use crate::{
  config::Config,
  ext::{ChildExt, CommandExt},
  variant::Variant,
};

const CPU_TYPE: &str = "O3_ARM_v7a_3";
const MEM_SIZE: &str = "8GB";

/// How an external command finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
  Success,
  /// Non-zero exit, with the code if the process was not killed by a signal.
  Failure(Option<i32>),
  TimedOut,
}

impl Status {
  pub fn is_success(self) -> bool {
    self == Status::Success
  }
}

impl From<ExitStatus> for Status {
  fn from(status: ExitStatus) -> Self {
    if status.success() {
      Status::Success
    } else {
      Status::Failure(status.code())
    }
  }
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Status::Success => write!(f, "success"),
      Status::Failure(Some(code)) => write!(f, "exit code {code}"),
      Status::Failure(None) => write!(f, "killed by signal"),
      Status::TimedOut => write!(f, "timed out"),
    }
  }
}

/// Runs external commands to completion.
pub trait Runner {
  /// Runs `command`, waiting at most `timeout` if one is given. Errors are
  /// reserved for commands that could not be run at all; a command that ran
  /// and failed is reported through [`Status`].
  fn run(&mut self, command: &mut Command, timeout: Option<Duration>) -> Result<Status>;
}

/// Spawns real processes, inheriting stdio.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
  fn run(&mut self, command: &mut Command, timeout: Option<Duration>) -> Result<Status> {
    debug!(command = %command.command_line(), ?timeout, "running");

    // Only a timed run needs its own group; otherwise the child stays in the
    // terminal's foreground group and still sees Ctrl-C.
    if timeout.is_some() {
      command.own_process_group();
    }

    let mut child = command.spawn().with_context(|| format!("spawn {:?}", command.get_program()))?;

    let status: Status = match timeout {
      None => child.wait().context("wait")?.into(),
      Some(timeout) => child.wait_or_kill(timeout)?.map_or(Status::TimedOut, Status::from),
    };

    Ok(status)
  }
}

/// `make all TEST=<test>`, run from the tests directory.
pub fn make_command(config: &Config, test: &str) -> Command {
  let mut make = Command::new(&config.make);
  make
    .current_dir(&config.tests_dir)
    .arg("all")
    .arg(format!("TEST={test}"));

  make
}

/// gem5 in syscall-emulation mode on the binary for `test` built as `variant`,
/// with an out-of-order ARM core, L1 and L2 caches, and 8GB of memory.
pub fn gem5_command(config: &Config, test: &str, variant: Variant) -> Command {
  let mut outdir = OsString::from("--outdir=");
  outdir.push(config.out_dir());

  let mut cmd = OsString::from("--cmd=");
  cmd.push(config.binary_path(test, variant));

  let mut gem5 = Command::new(config.gem5_bin());
  gem5
    .arg(outdir)
    .arg(config.se_script())
    .arg(format!("--cpu-type={CPU_TYPE}"))
    .args(["--caches", "--l2cache"])
    .arg(cmd)
    .arg(format!("--mem-size={MEM_SIZE}"));

  gem5
}
