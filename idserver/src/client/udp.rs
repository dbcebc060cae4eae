//! Datagram transport: one request datagram, one response datagram.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use crate::protocol::MAX_PACKET;

use super::{resolve, Transport};

/// A UDP client endpoint for an id server.
///
/// Every exchange binds its own ephemeral socket, so a reply that arrives
/// after its request timed out is never read as the answer to a later
/// request. There is no retransmission: a lost request or response
/// surfaces as a receive timeout.
#[derive(Debug)]
pub struct UdpTransport {
    server: SocketAddr,
    timeout: Duration,
}

impl UdpTransport {
    /// Resolves `server` and checks that a socket can be opened towards it.
    ///
    /// # Errors
    ///
    /// Returns an error if the address does not resolve, the socket cannot
    /// be bound, or `timeout` is zero.
    pub fn connect(server: impl ToSocketAddrs, timeout: Duration) -> io::Result<Self> {
        let transport = Self {
            server: resolve(server)?,
            timeout,
        };
        transport.open()?;
        Ok(transport)
    }

    /// The server this transport talks to.
    #[must_use]
    pub const fn server(&self) -> SocketAddr {
        self.server
    }

    /// Binds an ephemeral local socket matching the server's address family
    /// and connects it to the server.
    fn open(&self) -> io::Result<UdpSocket> {
        let local: SocketAddr = if self.server.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local)?;
        socket.connect(self.server)?;
        socket.set_read_timeout(Some(self.timeout))?;
        socket.set_write_timeout(Some(self.timeout))?;
        Ok(socket)
    }
}

impl Transport for UdpTransport {
    fn exchange(&mut self, request: &str) -> io::Result<String> {
        let socket = self.open()?;
        socket.send(request.as_bytes())?;
        let mut buf = vec![0u8; MAX_PACKET];
        let len = socket.recv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf[..len]).into_owned())
    }
}
