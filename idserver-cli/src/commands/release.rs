//! Release command implementation.

use crate::error::CliError;
use crate::utils::{connect, load_configuration, validate_owner, ConnectionArgs, GlobalOptions};
use clap::Args;

/// Release the identifier held by an owner.
#[derive(Args)]
pub struct ReleaseCommand {
    /// Owner name whose lease is released
    #[arg(long, value_name = "NAME")]
    pub owner: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl ReleaseCommand {
    /// Execute the release command.
    ///
    /// Releasing an owner that holds nothing is not an error.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        validate_owner(&self.owner)?;

        let config = load_configuration(global, self.connection.to_config())?;
        let mut client = connect(&config)?;

        client.release(&self.owner)?;
        log::debug!("released lease of {}", self.owner);
        Ok(())
    }
}
