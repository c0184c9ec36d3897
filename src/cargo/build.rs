//! `cargo build` invocations and artifact locations

use crate::core::config::{BuildMode, WASM_TARGET};
use crate::core::exec::Invocation;
use std::path::{Path, PathBuf};

/// `cargo build` for one manifest
///
/// `--target-dir` is always passed so the artifact lands where
/// [`binary_path`] / [`wasm_path`] look for it.
pub fn cargo_build(manifest_path: &Path, target_dir: &Path, mode: BuildMode, target: Option<&str>) -> Invocation {
  let mut invocation = Invocation::new("cargo").arg("build");
  if let Some(target) = target {
    invocation = invocation.args(["--target", target]);
  }
  invocation
    .arg("--manifest-path")
    .arg(manifest_path)
    .arg("--target-dir")
    .arg(target_dir)
    .args(mode.cargo_args())
}

/// Host binary produced by `cargo build`: `<target_dir>/<mode>/<bin_name>`
pub fn binary_path(target_dir: &Path, mode: BuildMode, bin_name: &str) -> PathBuf {
  target_dir.join(mode.dir_name()).join(bin_name)
}

/// WebAssembly module: `<target_dir>/wasm32-unknown-unknown/<mode>/<stem>.wasm`
pub fn wasm_path(target_dir: &Path, mode: BuildMode, artifact_stem: &str) -> PathBuf {
  target_dir
    .join(WASM_TARGET)
    .join(mode.dir_name())
    .join(format!("{}.wasm", artifact_stem))
}
