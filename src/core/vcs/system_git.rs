//! System git backend
//!
//! Only the two queries release packaging needs: the current branch (resolved
//! once at startup as the default `--branch`) and the HEAD revision written
//! to `REVISION.txt`. Both run through a [`CommandRunner`] so tests never
//! need a real repository.

use crate::core::error::{ShipError, ShipResult};
use crate::core::exec::{CommandRunner, Invocation};
use std::path::{Path, PathBuf};

/// Git backend using the system `git` binary
pub struct SystemGit<'a> {
  runner: &'a dyn CommandRunner,

  /// Directory git is run from (`git -C <repo_path>`)
  repo_path: PathBuf,
}

impl<'a> SystemGit<'a> {
  pub fn new(runner: &'a dyn CommandRunner, repo_path: &Path) -> Self {
    Self {
      runner,
      repo_path: repo_path.to_path_buf(),
    }
  }

  /// Get HEAD commit SHA
  pub fn head_commit(&self) -> ShipResult<String> {
    let sha = self.query(&["rev-parse", "HEAD"])?;
    if !is_valid_sha(&sha) {
      return Err(ShipError::message(format!("git rev-parse HEAD returned an unexpected value: '{}'", sha)));
    }
    Ok(sha)
  }

  /// Get current branch name
  ///
  /// A detached HEAD yields the literal `HEAD`, as git reports it.
  pub fn current_branch(&self) -> ShipResult<String> {
    let branch = self.query(&["rev-parse", "--abbrev-ref", "HEAD"])?;
    if branch.is_empty() {
      return Err(ShipError::with_help(
        "Could not determine the current git branch",
        "Pass --branch explicitly.",
      ));
    }
    Ok(branch)
  }

  fn query(&self, args: &[&str]) -> ShipResult<String> {
    let stdout = self.runner.output(&self.git_cmd().args(args))?;
    Ok(stdout.trim().to_string())
  }

  /// Base git invocation pinned to the repository path
  ///
  /// - Runs with `-C <repo_path>`
  /// - Disables path quoting so non-ASCII output stays readable
  fn git_cmd(&self) -> Invocation {
    Invocation::new("git")
      .arg("-C")
      .arg(&self.repo_path)
      .args(["-c", "core.quotePath=false"])
  }
}

/// Validate SHA format (40 or 64 hex chars, for sha1 and sha256 repositories)
fn is_valid_sha(sha: &str) -> bool {
  (sha.len() == 40 || sha.len() == 64) && sha.chars().all(|c| c.is_ascii_hexdigit())
}
