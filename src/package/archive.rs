//! Zip archives
//!
//! The whole source directory is written under a single top-level folder named
//! after the archive, so extracting `demo-linux-x86_64-main.zip` yields one
//! `demo-linux-x86_64-main/` directory. Entries are sorted and carry no
//! per-run timestamps, so two archives of the same directory differ only in
//! that folder name.

use crate::core::error::{ShipError, ShipResult};
use crate::package::naming::ArchiveDescriptor;
use crate::ui::progress::ArchiveProgress;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// A regular file to archive
struct Entry {
  path: PathBuf,
  /// Path relative to the source dir, `/`-separated
  name: String,
  mode: u32,
}

/// Write `<dest_dir>/<base_name>.zip`, creating `dest_dir` if needed
pub fn write_zip(descriptor: &ArchiveDescriptor) -> ShipResult<PathBuf> {
  fs::create_dir_all(&descriptor.dest_dir).map_err(|e| ShipError::fs(&descriptor.dest_dir, e))?;

  let entries = collect_entries(&descriptor.source_dir)?;
  let zip_path = descriptor.zip_path();
  let file = File::create(&zip_path).map_err(|e| ShipError::fs(&zip_path, e))?;
  let mut zip = ZipWriter::new(BufWriter::new(file));

  let label = zip_path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| descriptor.base_name.clone());
  let mut progress = ArchiveProgress::new(entries.len(), label);

  for entry in &entries {
    let options = SimpleFileOptions::default()
      .compression_method(CompressionMethod::Deflated)
      .unix_permissions(entry.mode);
    zip.start_file(format!("{}/{}", descriptor.base_name, entry.name), options)?;

    let mut source = File::open(&entry.path).map_err(|e| ShipError::fs(&entry.path, e))?;
    io::copy(&mut source, &mut zip).map_err(|e| ShipError::fs(&entry.path, e))?;
    progress.inc();
  }

  zip.finish()?.flush().map_err(|e| ShipError::fs(&zip_path, e))?;
  tracing::info!(archive = %zip_path.display(), files = entries.len(), "wrote zip archive");
  Ok(zip_path)
}

/// Regular files under `source_dir`, sorted by path
fn collect_entries(source_dir: &Path) -> ShipResult<Vec<Entry>> {
  let mut entries = Vec::new();

  for item in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
    let item = item?;
    if !item.file_type().is_file() {
      continue;
    }

    let rel = item.path().strip_prefix(source_dir)?;
    let name = rel
      .components()
      .map(|c| c.as_os_str().to_string_lossy())
      .collect::<Vec<_>>()
      .join("/");
    let metadata = item.metadata()?;

    entries.push(Entry {
      path: item.path().to_path_buf(),
      name,
      mode: file_mode(&metadata),
    });
  }

  Ok(entries)
}

#[cfg(unix)]
fn file_mode(metadata: &fs::Metadata) -> u32 {
  use std::os::unix::fs::PermissionsExt;
  metadata.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn file_mode(metadata: &fs::Metadata) -> u32 {
  if metadata.permissions().readonly() { 0o444 } else { 0o644 }
}
