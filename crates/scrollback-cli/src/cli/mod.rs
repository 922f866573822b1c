//! CLI command definitions for the `scrollback` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chats;
pub mod fetch;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Retrieve the full message history of a chat from a session surface.
#[derive(Parser)]
#[command(name = "scrollback", version, about, long_about = None)]
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

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    /// Session snapshot to read (defaults to `{data_dir}/session.json`).
    #[arg(long, global = true, env = "SCROLLBACK_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scroll a chat to its origin and print every message.
    Fetch {
        /// Chat handle (e.g. 12345@c.us).
        chat: String,

        /// Keep only messages sent (true) or received (false) by the session.
        #[arg(long)]
        from_me: Option<bool>,

        /// Requested maximum number of messages (at least 1).
        #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        limit: Option<usize>,
    },

    /// Run only the convergence scroller and report how it ended.
    Probe {
        /// Chat handle (e.g. 12345@c.us).
        chat: String,
    },

    /// List chats known to the surface.
    #[command(alias = "ls")]
    Chats,

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
