//! Logger setup
//!
//! `RUST_LOG` sets the base filter (default `warn`). Verbose mode lifts the
//! default level to debug; module directives from `RUST_LOG` still apply.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "warn";

/// Logger builder reading its base filter from `RUST_LOG`
pub fn builder(verbose: bool) -> Builder {
    builder_from_env(Env::default().default_filter_or(DEFAULT_FILTER), verbose)
}

/// Logger builder reading its base filter from `env`
pub fn builder_from_env(env: Env<'_>, verbose: bool) -> Builder {
    let mut builder = Builder::from_env(env);
    builder.format_timestamp(None);
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder
}

/// Install the global logger
pub fn init(verbose: bool) {
    if let Err(e) = builder(verbose).try_init() {
        eprintln!("Logger already initialized: {}", e);
    }
}
