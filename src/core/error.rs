//! Error types for cargo-ship with contextual messages and exit codes
//!
//! Every failure is fatal: configuration problems are caught before any tool
//! runs, tool failures propagate the tool's own exit code, and filesystem
//! errors carry the path that was being touched.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for cargo-ship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, version mismatch)
  User,
  /// System error (I/O, spawn failures, signals)
  System,
  /// Exit status reported by a failed external tool
  Tool(i32),
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    match self {
      ExitCode::User => 1,
      ExitCode::System => 2,
      ExitCode::Tool(code) => code,
    }
  }
}

/// Main error type for cargo-ship
#[derive(Debug)]
pub enum ShipError {
  /// Configuration errors
  Config(ConfigError),

  /// External tool errors
  Tool(ToolError),

  /// I/O error tied to a specific path
  Fs { path: PathBuf, source: io::Error },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ShipError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Wrap an I/O error with the path it occurred on
  pub fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
    ShipError::Fs {
      path: path.into(),
      source,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ShipError::Message { message, context, help } => ShipError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ShipError::Config(_) => ExitCode::User,
      ShipError::Tool(ToolError::Failed { code: Some(code), .. }) => ExitCode::Tool(*code),
      ShipError::Tool(_) => ExitCode::System,
      ShipError::Fs { .. } | ShipError::Io(_) => ExitCode::System,
      ShipError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ShipError::Config(e) => e.help_message(),
      ShipError::Tool(e) => e.help_message(),
      ShipError::Fs { source, .. } if source.kind() == io::ErrorKind::NotFound => {
        Some("Check --root-dir, --package-path and --target-dir point at the right locations.".to_string())
      }
      ShipError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ShipError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ShipError::Config(e) => write!(f, "{}", e),
      ShipError::Tool(e) => write!(f, "{}", e),
      ShipError::Fs { path, source } => write!(f, "I/O error at {}: {}", path.display(), source),
      ShipError::Io(e) => write!(f, "I/O error: {}", e),
      ShipError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ShipError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ShipError::Io(e) => Some(e),
      ShipError::Fs { source, .. } => Some(source),
      ShipError::Tool(ToolError::Spawn { source, .. }) => Some(source),
      _ => None,
    }
  }
}

impl From<io::Error> for ShipError {
  fn from(err: io::Error) -> Self {
    ShipError::Io(err)
  }
}

impl From<ConfigError> for ShipError {
  fn from(err: ConfigError) -> Self {
    ShipError::Config(err)
  }
}

impl From<ToolError> for ShipError {
  fn from(err: ToolError) -> Self {
    ShipError::Tool(err)
  }
}

impl From<String> for ShipError {
  fn from(msg: String) -> Self {
    ShipError::message(msg)
  }
}

impl From<&str> for ShipError {
  fn from(msg: &str) -> Self {
    ShipError::message(msg)
  }
}

impl From<toml_edit::de::Error> for ShipError {
  fn from(err: toml_edit::de::Error) -> Self {
    ShipError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<zip::result::ZipError> for ShipError {
  fn from(err: zip::result::ZipError) -> Self {
    match err {
      zip::result::ZipError::Io(e) => ShipError::Io(e),
      other => ShipError::message(format!("Zip error: {}", other)),
    }
  }
}

impl From<walkdir::Error> for ShipError {
  fn from(err: walkdir::Error) -> Self {
    let path = err.path().map(|p| p.to_path_buf());
    match (path, err.into_io_error()) {
      (Some(path), Some(source)) => ShipError::fs(path, source),
      (_, Some(source)) => ShipError::Io(source),
      (_, None) => ShipError::message("Directory walk error: filesystem loop detected"),
    }
  }
}

impl From<std::path::StripPrefixError> for ShipError {
  fn from(err: std::path::StripPrefixError) -> Self {
    ShipError::message(format!("Path strip prefix error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// The paired manifests disagree on the version to ship
  VersionMismatch {
    terminal: String,
    graphical: String,
  },

  /// Manifest has no `[package]` table
  MissingPackage { manifest: PathBuf },

  /// Version string is not valid semver
  InvalidVersion { manifest: PathBuf, version: String },

  /// `version.workspace = true` with no ancestor `[workspace.package] version`
  WorkspaceVersionNotFound { manifest: PathBuf },

  /// Branch name cannot be embedded in an artifact file name
  InvalidBranch { branch: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::VersionMismatch { .. } => {
        Some("Bump both the terminal and graphical crates to the same version before packaging.".to_string())
      }
      ConfigError::WorkspaceVersionNotFound { .. } => {
        Some("Add `version` under `[workspace.package]` in the workspace root Cargo.toml.".to_string())
      }
      ConfigError::InvalidBranch { .. } => {
        Some("Pass --branch with a name that contains no path separators.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::VersionMismatch { terminal, graphical } => {
        write!(
          f,
          "Version mismatch between terminal and graphical crates: {} != {}",
          terminal, graphical
        )
      }
      ConfigError::MissingPackage { manifest } => {
        write!(f, "No [package] table in manifest: {}", manifest.display())
      }
      ConfigError::InvalidVersion { manifest, version } => {
        write!(f, "Invalid version '{}' in manifest: {}", version, manifest.display())
      }
      ConfigError::WorkspaceVersionNotFound { manifest } => {
        write!(
          f,
          "Manifest {} inherits its version from the workspace, but no workspace version was found",
          manifest.display()
        )
      }
      ConfigError::InvalidBranch { branch } => {
        write!(f, "Branch name '{}' cannot be used in an artifact file name", branch)
      }
    }
  }
}

/// External tool errors
#[derive(Debug)]
pub enum ToolError {
  /// The program could not be started at all
  Spawn { command: String, source: io::Error },

  /// The program ran and exited unsuccessfully
  Failed {
    command: String,
    code: Option<i32>,
    stderr: String,
  },
}

impl ToolError {
  fn help_message(&self) -> Option<String> {
    match self {
      ToolError::Spawn { source, command } if source.kind() == io::ErrorKind::NotFound => {
        let program = command.split_whitespace().next().unwrap_or(command);
        Some(format!("Is `{}` installed and on PATH?", program))
      }
      ToolError::Failed { stderr, .. } if stderr.contains("not a git repository") => {
        Some("Run from inside the project checkout or point --root-dir at it.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ToolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ToolError::Spawn { command, source } => {
        write!(f, "Failed to execute {}: {}", command, source)
      }
      ToolError::Failed { command, code, stderr } => {
        match code {
          Some(code) => write!(f, "Command failed with exit code {}: {}", code, command)?,
          None => write!(f, "Command terminated by signal: {}", command)?,
        }
        if !stderr.is_empty() {
          write!(f, "\n{}", stderr.trim_end())?;
        }
        Ok(())
      }
    }
  }
}

/// Result type alias for cargo-ship
pub type ShipResult<T> = Result<T, ShipError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ShipError>,
{
  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ShipError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
