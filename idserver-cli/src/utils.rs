//! Utility functions for CLI operations.
//!
//! Configuration loading and client construction shared by the commands.

use crate::error::CliError;
use clap::Args;
use idserver::client::{TcpTransport, Transport, UdpTransport};
use idserver::{Config, ConfigBuilder, IdClient, TransportKind};
use std::io;
use std::path::PathBuf;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Explicit configuration file.
    pub config: Option<PathBuf>,
}

/// Options for reaching a server.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Server host
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Transport to use (udp or tcp)
    #[arg(long, value_name = "KIND")]
    pub transport: Option<TransportKind>,

    /// Seconds to wait for the server
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl ConnectionArgs {
    /// The options as configuration overrides.
    pub fn to_config(&self) -> Config {
        Config {
            host: self.host.clone(),
            port: self.port,
            transport: self.transport,
            timeout_seconds: self.timeout,
            ..Config::default()
        }
    }
}

/// Load layered configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Command-line overrides (highest priority)
/// 2. Environment variables
/// 3. Configuration file
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions, overrides: Config) -> Result<Config, CliError> {
    let mut builder = ConfigBuilder::new();
    if let Some(ref path) = global.config {
        builder = builder.with_file(path);
    }

    builder
        .with_config(overrides)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// A client transport chosen at runtime.
#[derive(Debug)]
pub enum Connection {
    /// Datagram transport.
    Udp(UdpTransport),
    /// Stream transport.
    Tcp(TcpTransport),
}

impl Transport for Connection {
    fn exchange(&mut self, request: &str) -> io::Result<String> {
        match self {
            Connection::Udp(transport) => transport.exchange(request),
            Connection::Tcp(transport) => transport.exchange(request),
        }
    }
}

/// Connect a client to the server described by `config`.
pub fn connect(config: &Config) -> Result<IdClient<Connection>, CliError> {
    let address = config.address();
    let timeout = config.timeout();
    log::debug!("connecting to {address} over {}", config.transport());

    let connection = match config.transport() {
        TransportKind::Udp => UdpTransport::connect(address.as_str(), timeout).map(Connection::Udp),
        TransportKind::Tcp => TcpTransport::connect(address.as_str(), timeout).map(Connection::Tcp),
        TransportKind::Both => {
            return Err(CliError::InvalidArguments(
                "a client needs a single transport, udp or tcp".to_string(),
            ))
        }
    };

    connection
        .map(IdClient::new)
        .map_err(|e| CliError::from(idserver::Error::Transport(e)))
}

/// Check an owner name before sending it anywhere.
pub fn validate_owner(owner: &str) -> Result<(), CliError> {
    if owner.trim().is_empty() {
        return Err(CliError::InvalidArguments(
            "--owner cannot be empty".to_string(),
        ));
    }
    Ok(())
}
