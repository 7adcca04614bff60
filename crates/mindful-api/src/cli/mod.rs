//! CLI command definitions for the `mindful` binary.

pub mod alerts;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Student mental-health support backend: chat relay, crisis alerts, peer forum.
#[derive(Parser)]
#[command(name = "mindful", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (default: {data_dir}/config.toml).
    #[arg(long, global = true, env = "MINDFUL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (overrides PORT and the config file).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides HOST and the config file).
        #[arg(long)]
        host: Option<String>,
    },

    /// List open crisis alerts, newest first.
    Alerts {
        /// Output machine-readable JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

impl Commands {
    /// Whether the command calls the model and so needs an API key.
    pub fn needs_model(&self) -> bool {
        matches!(self, Commands::Serve { .. })
    }
}

impl Cli {
    /// Log filter implied by `--quiet` and `-v`.
    pub fn default_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "info",
            1 => "info,mindful=debug",
            _ => "trace",
        }
    }
}
