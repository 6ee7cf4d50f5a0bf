//! Running toolchain commands.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::registry::BuildCommand;

/// Lines of stderr kept for failure reports.
const STDERR_TAIL_LINES: usize = 20;

/// How a build command finished.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExitStatus {
  /// Exit code, `None` when terminated by a signal.
  pub code: Option<i32>,
  /// Tail of the command's stderr.
  pub stderr: String,
}

impl ExitStatus {
  pub fn success() -> Self {
    Self {
      code: Some(0),
      stderr: String::new(),
    }
  }

  pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
    Self {
      code: Some(code),
      stderr: stderr.into(),
    }
  }

  pub fn is_success(&self) -> bool {
    self.code == Some(0)
  }
}

/// Capability to run an external build command to completion.
pub trait CommandRunner {
  /// Run `command` with `env` layered over the inherited environment.
  ///
  /// `Err` means the command could not be started at all.
  fn run(&self, command: &BuildCommand, env: &BTreeMap<String, String>) -> io::Result<ExitStatus>;
}

/// Runs commands as child processes in the project directory.
#[derive(Debug, Clone)]
pub struct SystemRunner {
  cwd: PathBuf,
}

impl SystemRunner {
  pub fn new(cwd: impl Into<PathBuf>) -> Self {
    Self { cwd: cwd.into() }
  }

  pub fn cwd(&self) -> &Path {
    &self.cwd
  }
}

impl CommandRunner for SystemRunner {
  fn run(&self, command: &BuildCommand, env: &BTreeMap<String, String>) -> io::Result<ExitStatus> {
    info!(cmd = %command, "executing command");

    let mut process = Command::new(&command.program);
    process.args(&command.args).current_dir(&self.cwd).envs(env);

    debug!(working_dir = ?self.cwd, env_keys = ?env.keys().collect::<Vec<_>>(), "spawning process");

    let output = process.output()?;
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    if !output.status.success() {
      if !stderr.is_empty() {
        debug!(stderr = %stderr, "command stderr");
      }
      if !stdout.is_empty() {
        debug!(stdout = %stdout, "command stdout");
      }
    }

    Ok(ExitStatus {
      code: output.status.code(),
      stderr: tail(&stderr, STDERR_TAIL_LINES),
    })
  }
}

fn tail(text: &str, lines: usize) -> String {
  let all: Vec<&str> = text.trim_end().lines().collect();
  all[all.len().saturating_sub(lines)..].join("\n")
}
