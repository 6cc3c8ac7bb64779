//! CLI argument definitions using clap
//!
//! Commands:
//! - calendar-backend serve [--config <path>] [--port <port>]
//! - calendar-backend check-config --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Calendar, availability period and reservation backend
#[derive(Parser, Debug)]
#[command(name = "calendar-backend")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured HTTP port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Load and validate a configuration file, then exit
    CheckConfig {
        /// Path to configuration file
        #[arg(long)]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
