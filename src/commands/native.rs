//! `cargo ship native` - Native release builder
//!
//! Pipeline:
//! 1. Load the terminal and graphical manifests; their versions must match
//! 2. `cargo build` each variant and stage `<name>-terminal` / `<name>-graphical`
//! 3. Stage LICENSE.txt, README.txt and REVISION.txt
//! 4. Zip the stage under a version-named and a branch-named base name
//! 5. With `--macos-app-name`, assemble a `.app` bundle and two disk images
//!
//! The first failing step aborts the run. The stage directory is removed on
//! every exit path unless `--keep-stage` was given.

use crate::cargo::build;
use crate::cargo::manifest::{self, Manifest};
use crate::core::config::NativeConfig;
use crate::core::error::{ShipError, ShipResult};
use crate::core::exec::CommandRunner;
use crate::core::stage::StageDir;
use crate::core::vcs::SystemGit;
use crate::package::naming::{self, ArchiveDescriptor, ArtifactTag};
use crate::package::{archive, copy_file, dmg, metadata};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// The two binaries shipped in every native release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
  Terminal,
  Graphical,
}

impl Variant {
  fn suffix(self) -> &'static str {
    match self {
      Variant::Terminal => "terminal",
      Variant::Graphical => "graphical",
    }
  }
}

impl fmt::Display for Variant {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.suffix())
  }
}

/// What a native run produced
#[derive(Debug, Default)]
pub struct NativeArtifacts {
  pub archives: Vec<PathBuf>,
  pub disk_images: Vec<PathBuf>,
  /// Set when the stage directory was kept
  pub stage_dir: Option<PathBuf>,
}

/// Run the native release builder
pub fn run_native(config: &NativeConfig, runner: &dyn CommandRunner) -> ShipResult<NativeArtifacts> {
  // No tool runs before the branch and paired versions are known to be usable
  naming::check_branch(&config.branch)?;
  let (terminal, graphical) = manifest::load_pair(&config.unix_path, &config.glutin_path)?;
  let version = terminal.version.clone();

  println!(
    "📦 Packaging {} v{} for {} ({} build)",
    config.name,
    version,
    config.os,
    config.mode.dir_name()
  );

  let stage = StageDir::create()?;

  build_variant(config, runner, &terminal, &stage, Variant::Terminal)?;
  let graphical_bin = build_variant(config, runner, &graphical, &stage, Variant::Graphical)?;

  let revision = SystemGit::new(runner, &config.root_dir).head_commit()?;
  metadata::stage_metadata(&config.root_dir, stage.path(), &revision)?;
  tracing::info!(revision = %revision, "staged release metadata");

  let tags = naming::release_tags(&version, &config.branch);
  let mut artifacts = NativeArtifacts::default();

  println!("🗜  Writing archives to {}", config.output_dir.display());
  for tag in &tags {
    let descriptor = ArchiveDescriptor::new(
      naming::archive_base_name(&config.name, config.os, tag),
      stage.path(),
      &config.output_dir,
    );
    artifacts.archives.push(archive::write_zip(&descriptor)?);
  }

  if let Some(app_name) = &config.macos_app_name {
    artifacts.disk_images = package_macos(config, runner, &stage, app_name, &graphical_bin, &tags)?;
  }

  if config.keep_stage {
    artifacts.stage_dir = Some(stage.keep());
  }

  print_summary(&artifacts);
  Ok(artifacts)
}

/// Build one variant and copy its binary into the stage
fn build_variant(
  config: &NativeConfig,
  runner: &dyn CommandRunner,
  manifest: &Manifest,
  stage: &StageDir,
  variant: Variant,
) -> ShipResult<PathBuf> {
  println!("🔨 Building {} variant ({})", variant, manifest.path.display());
  runner.run(&build::cargo_build(&manifest.path, &config.target_dir, config.mode, None))?;

  let built = build::binary_path(&config.target_dir, config.mode, &manifest.name);
  let staged = stage.join(format!("{}-{}", config.name, variant.suffix()));
  copy_file(&built, &staged)?;
  Ok(staged)
}

/// Assemble the `.app` bundle and produce the version and branch disk images
fn package_macos(
  config: &NativeConfig,
  runner: &dyn CommandRunner,
  stage: &StageDir,
  app_name: &str,
  graphical_bin: &Path,
  tags: &[ArtifactTag],
) -> ShipResult<Vec<PathBuf>> {
  println!("🍎 Assembling {}.app", app_name);
  let spec = dmg::BundleSpec {
    app_name,
    metadata_dir: stage.path(),
    package_path: &config.package_path,
    graphical_binary: graphical_bin,
  };
  let dmg_dir = dmg::assemble_bundle(stage.path(), &spec)?;

  let mut images = Vec::with_capacity(tags.len());
  for tag in tags {
    let dest = config.output_dir.join(naming::dmg_file_name(app_name, tag));
    // hdiutil refuses to overwrite an existing image
    if dest.exists() {
      fs::remove_file(&dest).map_err(|e| ShipError::fs(&dest, e))?;
    }
    dmg::create_dmg(runner, &dmg_dir, &dest)?;
    images.push(dest);
  }
  Ok(images)
}

fn print_summary(artifacts: &NativeArtifacts) {
  println!("\n✅ Release artifacts:");
  for path in artifacts.archives.iter().chain(&artifacts.disk_images) {
    println!("  📄 {}", path.display());
  }
  if let Some(stage_dir) = &artifacts.stage_dir {
    println!("  🗂  Stage directory kept at {}", stage_dir.display());
  }
}
