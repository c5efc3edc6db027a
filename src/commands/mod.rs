//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod fetch;
pub mod watch;

pub use fetch::run_fetch;
pub use watch::run_watch;
