//! Artifact naming
//!
//! Every native build ships twice: once pinned to the resolved version and
//! once under the branch name, so consumers get both a permanent artifact and
//! a moving "latest for this branch" one.

use crate::core::config::{ARCHITECTURE, TargetOs};
use crate::core::error::{ConfigError, ShipResult};
use semver::Version;
use std::path::{Path, PathBuf};

/// Which flavour of name an artifact carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactTag {
  Version(Version),
  Branch(String),
}

impl ArtifactTag {
  /// `v1.2.0` or the branch name verbatim
  pub fn suffix(&self) -> String {
    match self {
      ArtifactTag::Version(v) => format!("v{}", v),
      ArtifactTag::Branch(b) => b.clone(),
    }
  }
}

/// Version tag first, branch tag second
pub fn release_tags(version: &Version, branch: &str) -> [ArtifactTag; 2] {
  [ArtifactTag::Version(version.clone()), ArtifactTag::Branch(branch.to_string())]
}

/// Reject branch names that would not form a single file name
///
/// `git rev-parse --abbrev-ref HEAD` happily returns `feature/x`, which would
/// put the branch archive in a subdirectory that does not exist.
pub fn check_branch(branch: &str) -> ShipResult<()> {
  let unusable = branch.is_empty() || branch == "." || branch == ".." || branch.contains(['/', '\\']);
  if unusable {
    return Err(
      ConfigError::InvalidBranch {
        branch: branch.to_string(),
      }
      .into(),
    );
  }
  Ok(())
}

/// `<name>-<os>-x86_64-<suffix>`
pub fn archive_base_name(name: &str, os: TargetOs, tag: &ArtifactTag) -> String {
  format!("{}-{}-{}-{}", name, os, ARCHITECTURE, tag.suffix())
}

/// `<app_name>-<suffix>.dmg`
pub fn dmg_file_name(app_name: &str, tag: &ArtifactTag) -> String {
  format!("{}-{}.dmg", app_name, tag.suffix())
}

/// One archive to produce: its base name, what goes in it, where it goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveDescriptor {
  pub base_name: String,
  pub source_dir: PathBuf,
  pub dest_dir: PathBuf,
}

impl ArchiveDescriptor {
  pub fn new(base_name: impl Into<String>, source_dir: &Path, dest_dir: &Path) -> Self {
    Self {
      base_name: base_name.into(),
      source_dir: source_dir.to_path_buf(),
      dest_dir: dest_dir.to_path_buf(),
    }
  }

  /// `<dest_dir>/<base_name>.zip`
  pub fn zip_path(&self) -> PathBuf {
    self.dest_dir.join(format!("{}.zip", self.base_name))
  }
}
