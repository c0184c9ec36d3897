mod cargo;
mod commands;
mod core;
mod package;
mod ui;

use clap::{Args, Parser, Subcommand};
use core::config::{BuildMode, NativeConfig, TargetOs, WasmConfig};
use core::error::{ShipError, ShipResult, print_error};
use core::exec::SystemRunner;
use core::vcs::SystemGit;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Package native and WebAssembly release artifacts
#[derive(Parser)]
#[command(name = "cargo")]
#[command(bin_name = "cargo")]
#[command(styles = get_styles())]
enum CargoCli {
  Ship(ShipCli),
}

#[derive(Parser)]
#[command(name = "ship")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct ShipCli {
  /// Enable debug logging (overridden by CARGO_SHIP_LOG)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build terminal and graphical binaries and package them as zip (and dmg) archives
  Native(NativeArgs),

  /// Build the WebAssembly crate, generate JS bindings and optionally bundle the web app
  Wasm(WasmArgs),
}

#[derive(Args)]
struct NativeArgs {
  /// Project root (source of LICENSE and README.md)
  #[arg(long, default_value = ".")]
  root_dir: PathBuf,
  /// Manifest of the terminal variant
  #[arg(long, default_value = "unix/Cargo.toml")]
  unix_path: PathBuf,
  /// Manifest of the graphical variant
  #[arg(long, default_value = "glutin/Cargo.toml")]
  glutin_path: PathBuf,
  /// Packaging assets (macOS launcher script)
  #[arg(long, default_value = "package")]
  package_path: PathBuf,
  /// Build with optimizations
  #[arg(long)]
  release: bool,
  /// Cargo target directory
  #[arg(long, default_value = "target")]
  target_dir: PathBuf,
  /// Destination for archives and disk images
  #[arg(long, default_value = "uploads")]
  output_dir: PathBuf,
  /// Package name embedded in artifact file names
  #[arg(long)]
  name: String,
  /// Operating system tag embedded in artifact file names
  #[arg(long, value_enum)]
  os: TargetOs,
  /// Also produce a macOS .app bundle wrapped in disk images
  #[arg(long)]
  macos_app_name: Option<String>,
  /// Branch name for branch-tagged artifacts (default: current git branch)
  #[arg(long)]
  branch: Option<String>,
  /// Keep the stage directory for inspection instead of removing it
  #[arg(long)]
  keep_stage: bool,
}

impl NativeArgs {
  /// Resolve defaults that depend on the environment, once
  fn into_config(self) -> ShipResult<NativeConfig> {
    let branch = match self.branch {
      Some(branch) => branch,
      None => SystemGit::new(&SystemRunner, &self.root_dir).current_branch()?,
    };

    Ok(NativeConfig {
      name: self.name,
      os: self.os,
      root_dir: self.root_dir,
      unix_path: self.unix_path,
      glutin_path: self.glutin_path,
      package_path: self.package_path,
      mode: BuildMode::from_release_flag(self.release),
      branch,
      target_dir: self.target_dir,
      output_dir: self.output_dir,
      macos_app_name: self.macos_app_name,
      keep_stage: self.keep_stage,
    })
  }
}

#[derive(Args)]
struct WasmArgs {
  /// Manifest of the crate compiled to WebAssembly
  #[arg(long, default_value = "wasm/Cargo.toml")]
  manifest_path: PathBuf,
  /// Web application directory
  #[arg(long, default_value = "wasm")]
  webapp_dir: PathBuf,
  /// Cargo target directory
  #[arg(long, default_value = "target")]
  target_dir: PathBuf,
  /// Bundle the web application into this directory with webpack
  #[arg(long)]
  output_dir: Option<PathBuf>,
  /// Transpile the module to plain JavaScript with this wasm2js executable
  #[arg(long)]
  wasm2js: Option<PathBuf>,
  /// Optimized build and production bundle
  #[arg(long)]
  release: bool,
}

impl WasmArgs {
  fn into_config(self) -> ShipResult<WasmConfig> {
    // webpack runs inside the web app, so a relative path would resolve there
    let output_dir = self
      .output_dir
      .map(|dir| std::path::absolute(&dir).map_err(|e| ShipError::fs(dir, e)))
      .transpose()?;

    Ok(WasmConfig {
      manifest_path: self.manifest_path,
      webapp_dir: self.webapp_dir,
      target_dir: self.target_dir,
      mode: BuildMode::from_release_flag(self.release),
      wasm2js: self.wasm2js,
      output_dir,
    })
  }
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// Logs go to stderr; stdout carries the progress lines
fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_env("CARGO_SHIP_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

fn main() {
  let CargoCli::Ship(cli) = CargoCli::parse();
  init_tracing(cli.verbose);

  let result = match cli.command {
    Commands::Native(args) => args
      .into_config()
      .and_then(|config| commands::run_native(&config, &SystemRunner).map(|_| ())),
    Commands::Wasm(args) => args
      .into_config()
      .and_then(|config| commands::run_wasm(&config, &SystemRunner).map(|_| ())),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ShipError) -> ! {
  tracing::debug!(error = ?err, "run failed");
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
