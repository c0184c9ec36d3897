//! CLI commands for cargo-ship
//!
//! - **native**: build terminal + graphical binaries, zip them, optionally wrap a macOS disk image
//! - **wasm**: build the WebAssembly crate, generate bindings, optionally transpile and bundle
//!
//! Commands receive a resolved config and a `&dyn CommandRunner`; they never
//! read flags, environment defaults or git state on their own.

pub mod native;
pub mod wasm;

pub use native::run_native;
pub use wasm::run_wasm;
