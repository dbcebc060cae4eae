//! CLI command implementations.
//!
//! - `serve`: Run an id server
//! - `acquire`: Lease or renew an identifier
//! - `release`: Release an identifier

pub mod acquire;
pub mod release;
pub mod serve;

pub use acquire::AcquireCommand;
pub use release::ReleaseCommand;
pub use serve::ServeCommand;
