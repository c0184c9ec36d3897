//! Core building blocks shared by both release builders
//!
//! - **config**: resolved build configuration (`NativeConfig`, `WasmConfig`, `BuildMode`)
//! - **error**: error types with contextual help messages and exit codes
//! - **exec**: external command execution (`CommandRunner`, `Invocation`)
//! - **stage**: scoped stage directory for assembling artifacts
//! - **vcs**: git queries (`SystemGit`)

pub mod config;
pub mod error;
pub mod exec;
pub mod stage;
pub mod vcs;
