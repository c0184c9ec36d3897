//! External command execution
//!
//! Every tool cargo-ship drives (cargo, git, hdiutil, wasm-bindgen, wasm2js,
//! npx) is described as an [`Invocation`] and handed to a [`CommandRunner`].
//! [`SystemRunner`] spawns real processes; tests substitute a recording runner
//! that never leaves the process.

use crate::core::error::{ShipResult, ToolError};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A single external command: program, arguments, working directory and
/// environment overrides merged over the inherited environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub program: OsString,
  pub args: Vec<OsString>,
  pub cwd: Option<PathBuf>,
  pub env: Vec<(OsString, OsString)>,
}

impl Invocation {
  pub fn new(program: impl AsRef<OsStr>) -> Self {
    Self {
      program: program.as_ref().to_os_string(),
      args: Vec::new(),
      cwd: None,
      env: Vec::new(),
    }
  }

  pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
    self.args.push(arg.as_ref().to_os_string());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    self.args.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
    self
  }

  pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
    self.cwd = Some(dir.as_ref().to_path_buf());
    self
  }

  pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
    self.env.push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
    self
  }

  fn to_command(&self) -> Command {
    let mut cmd = Command::new(&self.program);
    cmd.args(&self.args);
    if let Some(cwd) = &self.cwd {
      cmd.current_dir(cwd);
    }
    cmd.envs(self.env.iter().map(|(k, v)| (k, v)));
    cmd
  }
}

impl fmt::Display for Invocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program.to_string_lossy())?;
    for arg in &self.args {
      write!(f, " {}", arg.to_string_lossy())?;
    }
    Ok(())
  }
}

/// Runs external commands
pub trait CommandRunner {
  /// Run to completion with stdout/stderr streamed to the terminal.
  /// A non-zero exit is an error.
  fn run(&self, invocation: &Invocation) -> ShipResult<()>;

  /// Run to completion and return captured stdout.
  /// A non-zero exit is an error carrying the captured stderr.
  fn output(&self, invocation: &Invocation) -> ShipResult<String>;
}

/// Spawns real processes with `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  fn run(&self, invocation: &Invocation) -> ShipResult<()> {
    log_invocation(invocation);

    let status = invocation
      .to_command()
      .stdin(Stdio::null())
      .status()
      .map_err(|source| ToolError::Spawn {
        command: invocation.to_string(),
        source,
      })?;

    if !status.success() {
      return Err(
        ToolError::Failed {
          command: invocation.to_string(),
          code: status.code(),
          stderr: String::new(),
        }
        .into(),
      );
    }

    Ok(())
  }

  fn output(&self, invocation: &Invocation) -> ShipResult<String> {
    log_invocation(invocation);

    let output = invocation
      .to_command()
      .stdin(Stdio::null())
      .output()
      .map_err(|source| ToolError::Spawn {
        command: invocation.to_string(),
        source,
      })?;

    if !output.status.success() {
      return Err(
        ToolError::Failed {
          command: invocation.to_string(),
          code: output.status.code(),
          stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
        .into(),
      );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
  }
}

fn log_invocation(invocation: &Invocation) {
  tracing::debug!(
    command = %invocation,
    cwd = ?invocation.cwd,
    env = ?invocation.env,
    "spawning external command"
  );
}
