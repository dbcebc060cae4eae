//! Serve command implementation.
//!
//! Builds the pool from configuration and runs the selected transport
//! adapter(s) against one shared handler.

use crate::error::CliError;
use crate::utils::{load_configuration, GlobalOptions};
use clap::Args;
use idserver::{Config, IdPool, ProtocolHandler, TcpServer, TransportKind, UdpServer};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Serve identifiers to clients.
#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to bind
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Transport to serve (udp, tcp or both)
    #[arg(long, value_name = "KIND")]
    pub transport: Option<TransportKind>,

    /// Explicit identifiers, comma-separated
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    pub ids: Option<Vec<String>>,

    /// Prefix for generated identifiers
    #[arg(long, value_name = "PREFIX")]
    pub id_prefix: Option<String>,

    /// Number of generated identifiers
    #[arg(long, value_name = "COUNT")]
    pub id_count: Option<usize>,

    /// Stop the UDP server after this many seconds without a request
    #[arg(long, value_name = "SECONDS")]
    pub idle_timeout: Option<u64>,
}

impl ServeCommand {
    /// Execute the serve command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if self.ids.is_some() && (self.id_prefix.is_some() || self.id_count.is_some()) {
            return Err(CliError::InvalidArguments(
                "Cannot specify --ids together with --id-prefix or --id-count".to_string(),
            ));
        }

        let overrides = Config {
            host: self.host,
            port: self.port,
            transport: self.transport,
            ids: self.ids,
            id_prefix: self.id_prefix,
            id_count: self.id_count,
            idle_timeout_seconds: self.idle_timeout,
            ..Config::default()
        };
        let config = load_configuration(global, overrides)?;

        let pool = IdPool::new(config.identifiers())?;
        log::info!("leasing {} identifiers", pool.len());
        let handler = Arc::new(ProtocolHandler::new(pool));
        let address = config.address();

        match config.transport() {
            TransportKind::Udp => serve_udp(&address, handler, config.idle_timeout()),
            TransportKind::Tcp => {
                TcpServer::bind(address.as_str(), handler)?.run()?;
                Ok(())
            }
            TransportKind::Both => {
                let tcp = TcpServer::bind(address.as_str(), Arc::clone(&handler))?;
                thread::spawn(move || {
                    if let Err(e) = tcp.run() {
                        log::error!("tcp server stopped: {e}");
                    }
                });
                serve_udp(&address, handler, config.idle_timeout())
            }
        }
    }
}

fn serve_udp(
    address: &str,
    handler: Arc<ProtocolHandler>,
    idle_timeout: Option<Duration>,
) -> Result<(), CliError> {
    UdpServer::bind(address, handler)?
        .with_idle_timeout(idle_timeout)?
        .run()?;
    Ok(())
}
