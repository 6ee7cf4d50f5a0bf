//! Test utilities for nbind-lib.
//!
//! Cross-platform helpers for tests that need to execute shell commands.

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Returns the shell command and args to print an environment variable on stderr.
#[cfg(unix)]
pub fn shell_echo_env_to_stderr(var: &str) -> (&'static str, Vec<String>) {
  shell_cmd(&format!("echo \"${}\" >&2", var))
}

#[cfg(windows)]
pub fn shell_echo_env_to_stderr(var: &str) -> (&'static str, Vec<String>) {
  shell_cmd(&format!(">&2 echo %{}%", var))
}
