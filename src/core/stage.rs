//! Scoped stage directory
//!
//! Artifacts are assembled in a fresh temporary directory owned by a single
//! build. The directory is removed when the [`StageDir`] is dropped, which
//! covers success, `?` early returns and panics alike. [`StageDir::keep`]
//! opts out for post-mortem inspection.

use crate::core::error::{ShipError, ShipResult};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct StageDir {
  dir: TempDir,
}

impl StageDir {
  /// Create a fresh, empty stage directory
  pub fn create() -> ShipResult<Self> {
    let dir = tempfile::Builder::new()
      .prefix("cargo-ship-stage-")
      .tempdir()
      .map_err(|e| ShipError::message(format!("Failed to create stage directory: {}", e)))?;
    tracing::debug!(path = %dir.path().display(), "created stage directory");
    Ok(Self { dir })
  }

  pub fn path(&self) -> &Path {
    self.dir.path()
  }

  /// Path of an entry inside the stage directory
  pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
    self.dir.path().join(name)
  }

  /// Disarm cleanup and return the directory's path
  pub fn keep(self) -> PathBuf {
    self.dir.keep()
  }
}
