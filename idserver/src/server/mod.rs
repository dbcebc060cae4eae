//! Transport adapters that expose a [`ProtocolHandler`] on the network.
//!
//! Both adapters take an explicitly constructed handler behind an `Arc`, so
//! one pool can be served over UDP and TCP at the same time.
//!
//! [`ProtocolHandler`]: crate::ProtocolHandler

pub mod tcp;
pub mod udp;

pub use tcp::{serve_stream, TcpServer, MAX_LINE};
pub use udp::UdpServer;
