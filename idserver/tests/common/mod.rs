//! Common test utilities for integration tests.
//!
//! Servers are bound to `127.0.0.1:0` and run on background threads for the
//! rest of the test process.

use std::net::SocketAddr;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use idserver::clock::ManualClock;
use idserver::{IdPool, ProtocolHandler, TcpServer, UdpServer};

/// Client timeout used throughout the integration tests.
#[allow(dead_code)]
pub const TIMEOUT: Duration = Duration::from_secs(5);

/// `count` identifiers named `id-0`, `id-1`, ...
#[allow(dead_code)]
pub fn ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("id-{i}")).collect()
}

/// A handler over `ids` driven by a manual clock the test can advance.
#[allow(dead_code)]
pub fn manual_handler<S: AsRef<str>>(
    ids: &[S],
) -> (Arc<ProtocolHandler<ManualClock>>, ManualClock) {
    let clock = ManualClock::new(1_000.0);
    let ids = ids.iter().map(|id| id.as_ref().to_string());
    let pool = IdPool::with_clock(ids, clock.clone()).unwrap();
    (Arc::new(ProtocolHandler::new(pool)), clock)
}

/// Starts a UDP server for `handler` and returns its address.
#[allow(dead_code)]
pub fn spawn_udp(handler: Arc<ProtocolHandler<ManualClock>>) -> SocketAddr {
    let server = UdpServer::bind("127.0.0.1:0", handler).unwrap();
    let addr = server.local_addr().unwrap();
    thread::spawn(move || server.run());
    addr
}

/// Starts a TCP server for `handler` and returns its address.
#[allow(dead_code)]
pub fn spawn_tcp(handler: Arc<ProtocolHandler<ManualClock>>) -> SocketAddr {
    let server = TcpServer::bind("127.0.0.1:0", handler).unwrap();
    let addr = server.local_addr().unwrap();
    thread::spawn(move || server.run());
    addr
}
