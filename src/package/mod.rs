//! Artifact assembly
//!
//! - **naming**: version/branch artifact names and archive descriptors
//! - **metadata**: LICENSE/README/REVISION files shipped beside the binaries
//! - **archive**: zip archives rooted at a single top-level folder
//! - **dmg**: macOS `.app` bundle layout and `hdiutil` disk images

pub mod archive;
pub mod dmg;
pub mod metadata;
pub mod naming;

use crate::core::error::{ShipError, ShipResult};
use std::fs;
use std::path::Path;

/// Copy a file, reporting the missing side on failure
pub(crate) fn copy_file(from: &Path, to: &Path) -> ShipResult<()> {
  if !from.is_file() {
    return Err(ShipError::fs(
      from,
      std::io::Error::new(std::io::ErrorKind::NotFound, "source file not found"),
    ));
  }
  fs::copy(from, to).map_err(|e| ShipError::fs(to, e))?;
  tracing::debug!(from = %from.display(), to = %to.display(), "copied");
  Ok(())
}
