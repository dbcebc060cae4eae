//! The id lease wire protocol.
//!
//! Requests and responses are single JSON objects:
//!
//! ```text
//! -> {"action":"get","owner":"w1","expire":30}
//! <- {"error":0,"value":"name-0"}
//! -> {"action":"put","owner":"w1"}
//! <- {"error":0}
//! ```
//!
//! Framing is left to the transport: one datagram per message over UDP,
//! one `\n`-terminated line per message over TCP.

pub mod handler;
pub mod message;

pub use handler::ProtocolHandler;
pub use message::{Request, Response, EXHAUSTED_MESSAGE};

/// Maximum size of a request or response datagram, in bytes.
pub const MAX_PACKET: usize = 8192;
