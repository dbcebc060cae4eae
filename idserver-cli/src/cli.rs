//! CLI structure and command definitions.

use crate::commands::{AcquireCommand, ReleaseCommand, ServeCommand};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lease identifiers from a fixed pool over UDP or TCP.
#[derive(Parser)]
#[command(name = "idserver")]
#[command(version, about = "Lease identifiers from a fixed pool", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Read configuration from this file instead of ~/.idserver/config.yaml
    #[arg(long, value_name = "PATH", global = true, env = "IDSERVER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Serve identifiers to clients
    Serve(ServeCommand),

    /// Acquire or renew an identifier and print it
    Acquire(AcquireCommand),

    /// Release the identifier held by an owner
    Release(ReleaseCommand),
}
