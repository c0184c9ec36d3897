//! macOS application bundle and disk images
//!
//! Layout assembled under the stage directory:
//!
//! ```text
//! <App>/
//!   Applications -> /Applications
//!   LICENSE.txt  README.txt  REVISION.txt
//!   <App>.app/Contents/MacOS/
//!     <App>      launcher script
//!     app        graphical binary
//! ```
//!
//! The `<App>` folder is then handed to `hdiutil create -srcfolder`.

use crate::core::error::{ShipError, ShipResult};
use crate::core::exec::{CommandRunner, Invocation};
use crate::package::{copy_file, metadata};
use std::fs;
use std::path::{Path, PathBuf};

/// Launcher script inside `--package-path`
pub const LAUNCHER_SCRIPT: &str = "macos-run-app.sh";

/// Fixed name of the graphical binary inside `Contents/MacOS`
pub const APP_BINARY: &str = "app";

/// Inputs for [`assemble_bundle`]
pub struct BundleSpec<'a> {
  pub app_name: &'a str,
  /// Directory holding already-staged LICENSE/README/REVISION files
  pub metadata_dir: &'a Path,
  /// Directory holding [`LAUNCHER_SCRIPT`]
  pub package_path: &'a Path,
  pub graphical_binary: &'a Path,
}

/// Build the disk image source folder under `parent`; returns its path
pub fn assemble_bundle(parent: &Path, spec: &BundleSpec<'_>) -> ShipResult<PathBuf> {
  let dmg_dir = parent.join(spec.app_name);
  let macos_dir = dmg_dir
    .join(format!("{}.app", spec.app_name))
    .join("Contents")
    .join("MacOS");
  fs::create_dir_all(&macos_dir).map_err(|e| ShipError::fs(&macos_dir, e))?;

  metadata::copy_staged(spec.metadata_dir, &dmg_dir)?;
  copy_file(&spec.package_path.join(LAUNCHER_SCRIPT), &macos_dir.join(spec.app_name))?;
  copy_file(spec.graphical_binary, &macos_dir.join(APP_BINARY))?;
  link_applications(&dmg_dir)?;

  Ok(dmg_dir)
}

/// `hdiutil create <dest> -srcfolder <source_dir>`
pub fn hdiutil_create(dest: &Path, source_dir: &Path) -> Invocation {
  Invocation::new("hdiutil")
    .arg("create")
    .arg(dest)
    .arg("-srcfolder")
    .arg(source_dir)
}

/// Create one disk image from an assembled bundle folder
pub fn create_dmg(runner: &dyn CommandRunner, source_dir: &Path, dest: &Path) -> ShipResult<()> {
  runner.run(&hdiutil_create(dest, source_dir))
}

#[cfg(unix)]
fn link_applications(dmg_dir: &Path) -> ShipResult<()> {
  let link = dmg_dir.join("Applications");
  std::os::unix::fs::symlink("/Applications", &link).map_err(|e| ShipError::fs(&link, e))
}

#[cfg(not(unix))]
fn link_applications(_dmg_dir: &Path) -> ShipResult<()> {
  Err(ShipError::message("macOS bundles can only be assembled on a unix host"))
}
