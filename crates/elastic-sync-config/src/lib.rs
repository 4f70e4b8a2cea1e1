//! Configuration models and layered config loading.
//!
//! This crate owns the resource sync config schema, the JSON5 loader and the
//! layer-merging logic used by the core crate and the CLI.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Configuration schema models.
pub use model::*;
