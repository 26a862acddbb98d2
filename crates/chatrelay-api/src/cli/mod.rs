//! CLI command definitions for the `chatrelay` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod conversation;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Per-conversation chat relay: HTTP server and local conversation tools.
#[derive(Parser)]
#[command(name = "chatrelay", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "CHATRELAY_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Host to bind to (overrides config.toml).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Keep conversations in memory only.
        #[arg(long)]
        ephemeral: bool,
    },

    /// Send one message to a conversation and print the reply.
    Chat {
        /// Conversation identity.
        conversation: String,

        /// Message text.
        message: String,
    },

    /// Print a conversation's stored log.
    History {
        /// Conversation identity.
        conversation: String,
    },

    /// Empty a conversation's log.
    Clear {
        /// Conversation identity.
        conversation: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
