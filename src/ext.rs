use std::{
  io,
  process::{Child, Command, ExitStatus},
  time::Duration,
};

use anyhow::{Context, Result};
use wait_timeout::ChildExt as WaitExt;

#[extend::ext(name = ChildExt)]
pub impl Child {
  /// Waits for the child to exit. If it is still running after `timeout`,
  /// every process in its group is killed, the child is reaped, and `Ok(None)`
  /// is returned. The child must lead its own process group.
  fn wait_or_kill(&mut self, timeout: Duration) -> Result<Option<ExitStatus>> {
    let Some(status) = self.wait_timeout(timeout).context("wait")? else {
      kill_group(self).context("kill after timeout")?;
      self.wait().context("wait after kill")?;

      return Ok(None);
    };

    Ok(Some(status))
  }
}

#[extend::ext(name = CommandExt)]
pub impl Command {
  /// The program and its arguments joined by spaces, for logs.
  fn command_line(&self) -> String {
    std::iter::once(self.get_program())
      .chain(self.get_args())
      .map(|arg| arg.to_string_lossy())
      .collect::<Vec<_>>()
      .join(" ")
  }

  /// Spawns the command as the leader of a new process group, so everything
  /// it starts can be killed together.
  fn own_process_group(&mut self) -> &mut Command {
    #[cfg(unix)]
    std::os::unix::process::CommandExt::process_group(self, 0);

    self
  }
}

#[cfg(unix)]
fn kill_group(child: &mut Child) -> io::Result<()> {
  let pgid = libc::pid_t::try_from(child.id()).map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;

  // SAFETY: `killpg` takes no pointers; it only signals the group `pgid`.
  if unsafe { libc::killpg(pgid, libc::SIGKILL) } == -1 {
    let err = io::Error::last_os_error();
    // The group is already gone if everything in it exited after the timeout.
    if err.raw_os_error() != Some(libc::ESRCH) {
      return Err(err);
    }
  }

  Ok(())
}

#[cfg(not(unix))]
fn kill_group(child: &mut Child) -> io::Result<()> {
  child.kill()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn command_line_joins_program_and_args() {
    let mut command = Command::new("make");
    command.args(["all", "TEST=axpy"]);

    assert_eq!(command.command_line(), "make all TEST=axpy");
  }

  #[cfg(unix)]
  #[test]
  fn slow_children_are_killed() {
    let mut child = Command::new("sleep").arg("5").own_process_group().spawn().unwrap();

    assert_eq!(child.wait_or_kill(Duration::from_millis(50)).unwrap(), None);
  }

  #[cfg(unix)]
  #[test]
  fn fast_children_report_status() {
    let mut child = Command::new("true").own_process_group().spawn().unwrap();

    let status = child.wait_or_kill(Duration::from_secs(30)).unwrap();

    assert!(status.is_some_and(|status| status.success()));
  }
}
