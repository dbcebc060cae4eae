//! Acquire command implementation.
//!
//! Sends a `get` request and prints the granted identifier on stdout, so
//! the command composes in shell scripts: `ID=$(idserver acquire ...)`.

use crate::error::CliError;
use crate::utils::{connect, load_configuration, validate_owner, ConnectionArgs, GlobalOptions};
use clap::Args;

/// Acquire or renew an identifier.
#[derive(Args)]
pub struct AcquireCommand {
    /// Owner name to lease for
    #[arg(long, value_name = "NAME")]
    pub owner: String,

    /// Lease duration in seconds
    #[arg(long, value_name = "SECONDS")]
    pub expire: f64,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl AcquireCommand {
    /// Execute the acquire command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        validate_owner(&self.owner)?;
        if !self.expire.is_finite() || self.expire < 0.0 {
            return Err(CliError::InvalidArguments(format!(
                "--expire must be a non-negative number of seconds, got {}",
                self.expire
            )));
        }

        let config = load_configuration(global, self.connection.to_config())?;
        let mut client = connect(&config)?;

        let id = client.acquire(&self.owner, self.expire)?;
        log::debug!("{} holds {id} for {}s", self.owner, self.expire);
        println!("{id}");
        Ok(())
    }
}
