//! Main entry point for the idserver CLI.
//!
//! Commands:
//! - `serve`: Run an id server over UDP, TCP or both
//! - `acquire`: Lease (or renew) an identifier and print it
//! - `release`: Give up the identifier held by an owner

use clap::Parser;
use idserver_cli::cli::{Cli, Command};
use idserver_cli::utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    idserver::init_logger(cli.verbose, cli.quiet).install();

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Serve(cmd) => cmd.execute(&global),
        Command::Acquire(cmd) => cmd.execute(&global),
        Command::Release(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
