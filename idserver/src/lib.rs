#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # idserver
//!
//! A library for leasing identifiers from a fixed pool over the network.
//!
//! Clients obtain a unique, stable name (a shard id, a worker slot) drawn
//! from a bounded set, renew it while they are alive and release it when
//! they are done. Leases expire on their own, so a crashed client's
//! identifier becomes available again without coordination.
//!
//! ## Core Types
//!
//! - [`IdPool`]: ownership and expiry bookkeeping over the identifier set
//! - [`ProtocolHandler`]: turns JSON request text into JSON response text
//! - [`UdpServer`] and [`TcpServer`]: transport adapters for a handler
//! - [`IdClient`]: the client side, over a [`Transport`]
//! - [`Config`] and [`ConfigBuilder`]: layered configuration
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use idserver::{IdClient, IdPool, ProtocolHandler, UdpServer};
//!
//! let pool = IdPool::new(["shard-0", "shard-1"]).unwrap();
//! let handler = Arc::new(ProtocolHandler::new(pool));
//! let server = UdpServer::bind("127.0.0.1:0", handler).unwrap();
//! let addr = server.local_addr().unwrap();
//! std::thread::spawn(move || server.run());
//!
//! let mut client = IdClient::udp(addr, Duration::from_secs(5)).unwrap();
//! assert_eq!(client.acquire("worker-a", 30.0).unwrap(), "shard-0");
//! assert_eq!(client.acquire("worker-b", 30.0).unwrap(), "shard-1");
//! client.release("worker-a").unwrap();
//! ```

pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod pool;
pub mod protocol;
pub mod server;

// Re-export key types at crate root for convenience
pub use client::{IdClient, TcpTransport, Transport, UdpTransport};
pub use config::{Config, ConfigBuilder, TransportKind};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use pool::{IdPool, Lease};
pub use protocol::{ProtocolHandler, Request, Response};
pub use server::{TcpServer, UdpServer};
