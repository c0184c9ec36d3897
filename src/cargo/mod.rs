//! Cargo integration
//!
//! - **manifest**: read package name/version from `Cargo.toml` (with workspace inheritance)
//! - **build**: `cargo build` invocations and where their artifacts land

pub mod build;
pub mod manifest;

pub use manifest::Manifest;
