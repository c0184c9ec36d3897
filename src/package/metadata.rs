//! Release metadata files
//!
//! Every release carries the project license and readme (renamed to `.txt` so
//! they open anywhere) and the git revision it was built from.

use crate::core::error::{ShipError, ShipResult};
use crate::package::copy_file;
use std::fs;
use std::path::{Path, PathBuf};

pub const LICENSE_FILE: &str = "LICENSE.txt";
pub const README_FILE: &str = "README.txt";
pub const REVISION_FILE: &str = "REVISION.txt";

/// Project-root source file and its staged name
const PROJECT_FILES: &[(&str, &str)] = &[("LICENSE", LICENSE_FILE), ("README.md", README_FILE)];

/// Staged metadata file names, in the order they are written
pub const STAGED_FILES: &[&str] = &[LICENSE_FILE, README_FILE, REVISION_FILE];

/// Copy license/readme from `root_dir` and write the revision into `dest_dir`
pub fn stage_metadata(root_dir: &Path, dest_dir: &Path, revision: &str) -> ShipResult<()> {
  for (source, staged) in PROJECT_FILES {
    copy_file(&root_dir.join(source), &dest_dir.join(staged))?;
  }

  let revision_path = dest_dir.join(REVISION_FILE);
  fs::write(&revision_path, format!("{}\n", revision)).map_err(|e| ShipError::fs(&revision_path, e))?;
  Ok(())
}

/// Copy already-staged metadata files from one directory to another
pub fn copy_staged(from_dir: &Path, to_dir: &Path) -> ShipResult<Vec<PathBuf>> {
  STAGED_FILES
    .iter()
    .map(|name| {
      let dest = to_dir.join(name);
      copy_file(&from_dir.join(name), &dest)?;
      Ok::<_, ShipError>(dest)
    })
    .collect()
}
