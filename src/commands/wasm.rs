//! `cargo ship wasm` - WebAssembly release builder
//!
//! Pipeline:
//! 1. `cargo build --target wasm32-unknown-unknown`
//! 2. Resolve the crate name and locate the `.wasm` module
//! 3. `wasm-bindgen` into `<webapp>/wasm_out` as `app_bg.wasm` + `app.js`
//! 4. Optionally transpile with `wasm2js`, leaving `app_bg.js` as the only runtime artifact
//! 5. Optionally bundle the web app with `npx webpack`

use crate::cargo::Manifest;
use crate::cargo::build;
use crate::core::config::{BuildMode, WASM_TARGET, WasmConfig};
use crate::core::error::{ShipError, ShipResult};
use crate::core::exec::{CommandRunner, Invocation};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Subdirectory of the web app receiving the bindgen output
pub const WASM_OUT: &str = "wasm_out";

/// `--out-name` given to wasm-bindgen
const OUT_NAME: &str = "app";
const APP_BG_WASM: &str = "app_bg.wasm";
const APP_BG_JS: &str = "app_bg.js";

/// What a wasm run produced
#[derive(Debug)]
pub struct WasmArtifacts {
  /// `app_bg.wasm`, or `app_bg.js` when transpiled
  pub runtime: PathBuf,
  /// Bundle output directory, when webpack ran
  pub bundle_dir: Option<PathBuf>,
}

/// Run the WebAssembly release builder
pub fn run_wasm(config: &WasmConfig, runner: &dyn CommandRunner) -> ShipResult<WasmArtifacts> {
  println!("🔨 Building {} for {}", config.manifest_path.display(), WASM_TARGET);
  runner.run(&build::cargo_build(
    &config.manifest_path,
    &config.target_dir,
    config.mode,
    Some(WASM_TARGET),
  ))?;

  let manifest = Manifest::load(&config.manifest_path)?;
  let module = build::wasm_path(&config.target_dir, config.mode, &manifest.lib_artifact_stem());
  if !module.is_file() {
    return Err(ShipError::with_help(
      format!("WebAssembly module not found: {}", module.display()),
      "Make sure the crate is a cdylib and --target-dir matches the cargo target directory.",
    ));
  }

  let out_dir = config.webapp_dir.join(WASM_OUT);
  fs::create_dir_all(&out_dir).map_err(|e| ShipError::fs(&out_dir, e))?;

  println!("🔗 Generating bindings in {}", out_dir.display());
  runner.run(&wasm_bindgen(&module, &out_dir))?;

  let app_bg_wasm = out_dir.join(APP_BG_WASM);
  let app_bg_js = out_dir.join(APP_BG_JS);
  let runtime = match &config.wasm2js {
    Some(wasm2js) => {
      println!("🔁 Transpiling {} to JavaScript", APP_BG_WASM);
      runner.run(&Invocation::new(wasm2js).arg(&app_bg_wasm).arg("-o").arg(&app_bg_js))?;
      fs::remove_file(&app_bg_wasm).map_err(|e| ShipError::fs(&app_bg_wasm, e))?;
      app_bg_js
    }
    None => {
      remove_stale(&app_bg_js)?;
      app_bg_wasm
    }
  };

  let bundle_dir = match &config.output_dir {
    Some(output_dir) => {
      println!("🌐 Bundling web app into {}", output_dir.display());
      runner.run(&webpack(&config.webapp_dir, config.mode, output_dir))?;
      Some(output_dir.clone())
    }
    None => None,
  };

  let artifacts = WasmArtifacts { runtime, bundle_dir };
  print_summary(&artifacts);
  Ok(artifacts)
}

fn print_summary(artifacts: &WasmArtifacts) {
  println!("\n✅ WebAssembly runtime: {}", artifacts.runtime.display());
  if let Some(dir) = &artifacts.bundle_dir {
    println!("✅ Web app bundle: {}", dir.display());
  }
}

/// `wasm-bindgen <module> --out-dir <out_dir> --out-name app`
fn wasm_bindgen(module: &Path, out_dir: &Path) -> Invocation {
  Invocation::new("wasm-bindgen")
    .arg(module)
    .arg("--out-dir")
    .arg(out_dir)
    .args(["--out-name", OUT_NAME])
}

/// `npx webpack` in the web app with mode and output dir in the environment
fn webpack(webapp_dir: &Path, mode: BuildMode, output_dir: &Path) -> Invocation {
  Invocation::new("npx")
    .arg("webpack")
    .current_dir(webapp_dir)
    .env("WEBPACK_MODE", mode.webpack_mode())
    .env("OUTPUT_DIR", output_dir)
}

/// Remove a leftover from an earlier run; absence is fine
fn remove_stale(path: &Path) -> ShipResult<()> {
  match fs::remove_file(path) {
    Ok(()) => {
      tracing::debug!(path = %path.display(), "removed stale artifact");
      Ok(())
    }
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(ShipError::fs(path, e)),
  }
}
