//! Public surface for elastic-sync.
//!
//! Re-exports the config and core crates and provides a logging helper so
//! hosts embedding the synchronizer set up output the same way the CLI does.

/// Re-export for convenience.
pub use elastic_sync_config as config;
/// Re-export for convenience.
pub use elastic_sync_core as core;

/// Initialize `env_logger`, honouring `RUST_LOG` when set.
///
/// Falls back to `debug` when `verbose` is set and `info` otherwise. Safe to
/// call more than once.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env).try_init();
}
