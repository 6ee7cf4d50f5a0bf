//! nbind-lib: prebuilt native binding resolution and packaging
//!
//! This crate connects two lifecycle phases through one path convention,
//! `<native_dir>/<os>-<arch>[-musl]/<binary_name>`:
//! - `orchestrator`: at package-build time, builds every registry target and
//!   installs its artifact under the native directory
//! - `probe` and `resolve`: at process start, detect the host triple and load
//!   exactly one matching artifact
//! - `registry`: the table of supported targets both phases consult
//! - `manifest`: what a build installed, read back by the runtime resolver

pub mod config;
pub mod consts;
pub mod manifest;
pub mod orchestrator;
pub mod platform;
pub mod probe;
pub mod registry;
pub mod resolve;
pub mod util;

pub use probe::ProbeResult;
pub use resolve::{NativeBinding, ResolveError, binding};
