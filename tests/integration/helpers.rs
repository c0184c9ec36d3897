//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Writes `binary of <name>` (or a `.wasm` for `--target`) where cargo would put it
const CARGO_STUB: &str = r#"#!/bin/sh
[ -n "$STUB_CARGO_FAIL" ] && { echo "error: could not compile" >&2; exit 101; }
manifest=""; target_dir="target"; profile="debug"; triple=""
while [ $# -gt 0 ]; do
  case "$1" in
    --manifest-path) manifest="$2"; shift ;;
    --target-dir) target_dir="$2"; shift ;;
    --target) triple="$2"; shift ;;
    --release) profile="release" ;;
  esac
  shift
done
name=$(sed -n 's/^name = "\(.*\)"/\1/p' "$manifest" | head -n 1)
if [ -n "$triple" ]; then
  out="$target_dir/$triple/$profile"
  mkdir -p "$out"
  printf 'wasm of %s' "$name" > "$out/$(echo "$name" | tr '-' '_').wasm"
else
  out="$target_dir/$profile"
  mkdir -p "$out"
  printf 'binary of %s' "$name" > "$out/$name"
  chmod +x "$out/$name"
fi
"#;

/// `wasm-bindgen <module> --out-dir <dir> --out-name <name>`
const WASM_BINDGEN_STUB: &str = r#"#!/bin/sh
cp "$1" "$3/$5_bg.wasm"
printf 'import * as wasm from "./%s_bg.wasm";\n' "$5" > "$3/$5.js"
"#;

/// `wasm2js <in> -o <out>`
const WASM2JS_STUB: &str = r#"#!/bin/sh
printf 'transpiled %s\n' "$(cat "$1")" > "$3"
"#;

/// `hdiutil create <dest> -srcfolder <dir>`
const HDIUTIL_STUB: &str = r#"#!/bin/sh
[ -e "$2" ] && { echo "hdiutil: create failed - File exists" >&2; exit 1; }
ls "$4" > "$2"
"#;

/// Records what webpack would have seen into `$OUTPUT_DIR/webpack.env`
const NPX_STUB: &str = r#"#!/bin/sh
mkdir -p "$OUTPUT_DIR"
printf 'args=%s\nmode=%s\ncwd=%s\n' "$*" "$WEBPACK_MODE" "$(pwd)" > "$OUTPUT_DIR/webpack.env"
"#;

/// A throwaway project with git history and stub tools
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
  bin_dir: PathBuf,
}

impl TestProject {
  /// Git repository on `main` with stub tools installed beside it
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("project");
    let bin_dir = root.path().join("bin");
    std::fs::create_dir_all(&path)?;
    std::fs::create_dir_all(&bin_dir)?;

    for (name, script) in [
      ("cargo", CARGO_STUB),
      ("wasm-bindgen", WASM_BINDGEN_STUB),
      ("wasm2js", WASM2JS_STUB),
      ("hdiutil", HDIUTIL_STUB),
      ("npx", NPX_STUB),
    ] {
      write_executable(&bin_dir.join(name), script)?;
    }

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    Ok(Self { _root: root, path, bin_dir })
  }

  /// Native project layout: LICENSE, README.md, two variant manifests, launcher
  pub fn native(unix_version: &str, glutin_version: &str) -> Result<Self> {
    let project = Self::new()?;
    project.write_file("LICENSE", "MIT License\n")?;
    project.write_file("README.md", "# Demo\n")?;
    project.write_file(
      "unix/Cargo.toml",
      &format!("[package]\nname = \"demo_unix\"\nversion = \"{}\"\n", unix_version),
    )?;
    project.write_file(
      "glutin/Cargo.toml",
      &format!("[package]\nname = \"demo_glutin\"\nversion = \"{}\"\n", glutin_version),
    )?;
    project.write_file("package/macos-run-app.sh", "#!/bin/sh\nexec \"$(dirname \"$0\")/app\"\n")?;
    project.commit("Initial project")?;
    Ok(project)
  }

  /// Web project layout: the wasm crate doubles as the web app
  pub fn web(crate_name: &str) -> Result<Self> {
    let project = Self::new()?;
    project.write_file(
      "wasm/Cargo.toml",
      &format!(
        "[package]\nname = \"{}\"\nversion = \"0.3.0\"\n\n[lib]\ncrate-type = [\"cdylib\"]\n",
        crate_name
      ),
    )?;
    project.write_file("wasm/webpack.config.js", "module.exports = {};\n")?;
    project.commit("Initial project")?;
    Ok(project)
  }

  /// Commit current changes and return the SHA
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;
    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Write a file relative to the project, creating parents
  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let full = self.path.join(path);
    if let Some(parent) = full.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(full, content)?;
    Ok(())
  }

  /// Delete one of the stub tools
  pub fn remove_tool(&self, name: &str) -> Result<()> {
    std::fs::remove_file(self.bin_dir.join(name))?;
    Ok(())
  }

  /// PATH holding only the stub tools and the base system directories
  pub fn isolated_path(&self) -> String {
    format!("{}:/usr/bin:/bin", self.bin_dir.display())
  }

  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  /// Run `cargo-ship` in the project with the stub tools first on PATH
  pub fn ship(&self, args: &[&str]) -> Result<Output> {
    self.ship_with_env(args, &[])
  }

  pub fn ship_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> Result<Output> {
    let path = std::env::var_os("PATH").unwrap_or_default();
    let mut paths = vec![self.bin_dir.clone()];
    paths.extend(std::env::split_paths(&path));

    Command::new(env!("CARGO_BIN_EXE_cargo-ship"))
      .current_dir(&self.path)
      .arg("ship")
      .args(args)
      .env("PATH", std::env::join_paths(paths)?)
      .env_remove("CARGO_SHIP_LOG")
      .envs(env.iter().copied())
      .output()
      .context("Failed to run cargo-ship")
  }
}

/// Run `cargo-ship` and fail with its output unless it succeeded
pub fn ship_ok(project: &TestProject, args: &[&str]) -> Result<Output> {
  let output = project.ship(args)?;
  if !output.status.success() {
    anyhow::bail!(
      "cargo-ship command failed: cargo ship {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      String::from_utf8_lossy(&output.stdout),
      String::from_utf8_lossy(&output.stderr)
    );
  }
  Ok(output)
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Entry name to contents for every file in a zip archive
pub fn read_zip(path: &Path) -> Result<BTreeMap<String, Vec<u8>>> {
  let mut archive = zip::ZipArchive::new(File::open(path)?)?;
  let mut files = BTreeMap::new();
  for i in 0..archive.len() {
    let mut file = archive.by_index(i)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    files.insert(file.name().to_string(), bytes);
  }
  Ok(files)
}

fn write_executable(path: &Path, script: &str) -> Result<()> {
  std::fs::write(path, script)?;
  std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
  Ok(())
}
