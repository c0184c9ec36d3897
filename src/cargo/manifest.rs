//! Package manifest reading
//!
//! Only `[package] name` and `version` matter for packaging. The version may be
//! inherited from the workspace (`version.workspace = true`), in which case the
//! nearest ancestor `Cargo.toml` with `[workspace.package] version` supplies it.

use crate::core::error::{ConfigError, ResultExt, ShipError, ShipResult};
use semver::Version;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name and version of a buildable package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
  pub path: PathBuf,
  pub name: String,
  pub version: Version,
}

#[derive(Deserialize)]
struct RawManifest {
  package: Option<RawPackage>,
  workspace: Option<RawWorkspace>,
}

#[derive(Deserialize)]
struct RawPackage {
  name: String,
  version: Option<VersionField>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VersionField {
  Literal(String),
  Inherited { workspace: bool },
}

#[derive(Deserialize)]
struct RawWorkspace {
  package: Option<RawWorkspacePackage>,
}

#[derive(Deserialize)]
struct RawWorkspacePackage {
  version: Option<String>,
}

impl Manifest {
  /// Load a manifest from a `Cargo.toml` path
  pub fn load(path: &Path) -> ShipResult<Self> {
    let raw = read_raw(path)?;
    let package = raw.package.ok_or_else(|| ConfigError::MissingPackage {
      manifest: path.to_path_buf(),
    })?;

    let version_str = match package.version {
      Some(VersionField::Literal(v)) => v,
      Some(VersionField::Inherited { workspace: true }) => workspace_version(path)?,
      Some(VersionField::Inherited { workspace: false }) => {
        return Err(ShipError::message(format!(
          "Unsupported `version.workspace = false` in {}",
          path.display()
        )));
      }
      // Cargo treats a missing version as 0.0.0
      None => "0.0.0".to_string(),
    };

    let version = Version::parse(&version_str).map_err(|_| ConfigError::InvalidVersion {
      manifest: path.to_path_buf(),
      version: version_str.clone(),
    })?;

    Ok(Self {
      path: path.to_path_buf(),
      name: package.name,
      version,
    })
  }

  /// File name cargo gives this package's compiled artifacts
  ///
  /// Binaries keep the package name as-is; library artifacts such as the
  /// `.wasm` of a cdylib replace `-` with `_`.
  pub fn lib_artifact_stem(&self) -> String {
    self.name.replace('-', "_")
  }
}

/// Load the paired terminal/graphical manifests and check they ship the same version
pub fn load_pair(terminal: &Path, graphical: &Path) -> ShipResult<(Manifest, Manifest)> {
  let terminal = Manifest::load(terminal)?;
  let graphical = Manifest::load(graphical)?;

  if terminal.version != graphical.version {
    return Err(
      ConfigError::VersionMismatch {
        terminal: terminal.version.to_string(),
        graphical: graphical.version.to_string(),
      }
      .into(),
    );
  }

  Ok((terminal, graphical))
}

fn read_raw(path: &Path) -> ShipResult<RawManifest> {
  let content = fs::read_to_string(path).map_err(|e| ShipError::fs(path, e))?;
  toml_edit::de::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Walk up from the manifest's directory to the first workspace defining a version
fn workspace_version(manifest_path: &Path) -> ShipResult<String> {
  let start = manifest_path
    .canonicalize()
    .map_err(|e| ShipError::fs(manifest_path, e))?;

  for dir in start.ancestors().skip(1) {
    let candidate = dir.join("Cargo.toml");
    if !candidate.is_file() {
      continue;
    }
    let raw = read_raw(&candidate)?;
    if let Some(version) = raw.workspace.and_then(|w| w.package).and_then(|p| p.version) {
      tracing::debug!(manifest = %manifest_path.display(), workspace = %candidate.display(), "inherited workspace version");
      return Ok(version);
    }
  }

  Err(
    ConfigError::WorkspaceVersionNotFound {
      manifest: manifest_path.to_path_buf(),
    }
    .into(),
  )
}
