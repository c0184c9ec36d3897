//! Resolved build configuration
//!
//! Command-line flags are turned into these values once, in `main`, and then
//! passed down by reference. Nothing below `main` consults the process
//! environment or git for defaults.

use clap::ValueEnum;
use std::fmt;
use std::path::PathBuf;

/// Architecture tag embedded in every native artifact name
pub const ARCHITECTURE: &str = "x86_64";

/// Target triple for WebAssembly builds
pub const WASM_TARGET: &str = "wasm32-unknown-unknown";

/// Release vs debug build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
  Debug,
  Release,
}

impl BuildMode {
  pub fn from_release_flag(release: bool) -> Self {
    if release { BuildMode::Release } else { BuildMode::Debug }
  }

  /// Subdirectory of the target dir cargo writes this profile to
  pub fn dir_name(self) -> &'static str {
    match self {
      BuildMode::Debug => "debug",
      BuildMode::Release => "release",
    }
  }

  /// Extra `cargo build` flags for this mode
  pub fn cargo_args(self) -> &'static [&'static str] {
    match self {
      BuildMode::Debug => &[],
      BuildMode::Release => &["--release"],
    }
  }

  /// Value for `WEBPACK_MODE`
  pub fn webpack_mode(self) -> &'static str {
    match self {
      BuildMode::Debug => "development",
      BuildMode::Release => "production",
    }
  }
}

/// Operating system tag for native artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetOs {
  Linux,
  Macos,
}

impl TargetOs {
  pub fn as_str(self) -> &'static str {
    match self {
      TargetOs::Linux => "linux",
      TargetOs::Macos => "macos",
    }
  }
}

impl fmt::Display for TargetOs {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Everything the native release builder needs
#[derive(Debug, Clone)]
pub struct NativeConfig {
  /// Package name embedded in artifact file names
  pub name: String,
  pub os: TargetOs,
  /// Project root holding LICENSE and README.md
  pub root_dir: PathBuf,
  /// Manifest of the terminal variant
  pub unix_path: PathBuf,
  /// Manifest of the graphical variant
  pub glutin_path: PathBuf,
  /// Directory holding packaging assets (macOS launcher script)
  pub package_path: PathBuf,
  pub mode: BuildMode,
  /// Branch embedded in branch-named artifacts, resolved at startup
  pub branch: String,
  pub target_dir: PathBuf,
  pub output_dir: PathBuf,
  /// When set, also produce a `.app` bundle and disk images
  pub macos_app_name: Option<String>,
  /// Keep the stage directory instead of removing it
  pub keep_stage: bool,
}

/// Everything the WebAssembly release builder needs
#[derive(Debug, Clone)]
pub struct WasmConfig {
  pub manifest_path: PathBuf,
  /// Web application directory (receives `wasm_out/`, bundler cwd)
  pub webapp_dir: PathBuf,
  pub target_dir: PathBuf,
  pub mode: BuildMode,
  /// wasm2js executable; when set the JS build replaces the wasm binary
  pub wasm2js: Option<PathBuf>,
  /// Absolute bundle output directory; when set, webpack runs
  pub output_dir: Option<PathBuf>,
}
