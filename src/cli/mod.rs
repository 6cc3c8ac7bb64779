//! CLI module for the calendar backend
//!
//! Provides command-line interface for:
//! - serve: Boot backends and serve HTTP
//! - check-config: Validate a configuration file

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command};
pub use commands::{build_server, check_config, run, run_command, serve};
pub use config::{CacheBackend, CacheConfig, Config, MediaConfig};
pub use errors::{CliError, CliResult};
