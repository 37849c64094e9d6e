// Keygate — CLI Module
//
// Command-line interface using clap derive macros.
// Subcommands: serve, status.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::execute;

/// Keygate — origin-gated router in front of a keyring backend.
#[derive(Parser, Debug)]
#[command(name = "keygate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the Keygate daemon on a Unix domain socket.
    Serve {
        /// Socket path. Defaults to `$XDG_RUNTIME_DIR/keygate/keygate.sock`.
        #[arg(long)]
        socket: Option<PathBuf>,

        /// State snapshot path. Defaults to `$XDG_DATA_HOME/keygate/state.json`.
        #[arg(long)]
        state_file: Option<PathBuf>,
    },

    /// Show a summary of the persisted keyring state (never secrets).
    Status {
        /// State snapshot path. Defaults to `$XDG_DATA_HOME/keygate/state.json`.
        #[arg(long)]
        state_file: Option<PathBuf>,
    },
}
