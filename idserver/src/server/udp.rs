//! Datagram adapter: every datagram is one request, answered to its sender.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::protocol::{ProtocolHandler, MAX_PACKET};

/// A blocking UDP id server.
///
/// Datagrams are served one at a time. A client whose release datagram is
/// lost keeps its lease until it expires.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use idserver::{IdPool, ProtocolHandler, UdpServer};
///
/// let pool = IdPool::new((0..10).map(|i| format!("name-{i}"))).unwrap();
/// let handler = Arc::new(ProtocolHandler::new(pool));
/// let server = UdpServer::bind("127.0.0.1:9777", handler).unwrap();
/// server.run().unwrap();
/// ```
#[derive(Debug)]
pub struct UdpServer<C: Clock = SystemClock> {
    socket: UdpSocket,
    handler: Arc<ProtocolHandler<C>>,
    idle_timeout: Option<Duration>,
}

impl<C: Clock> UdpServer<C> {
    /// Binds a UDP socket on `addr`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the address cannot be bound.
    pub fn bind(addr: impl ToSocketAddrs, handler: Arc<ProtocolHandler<C>>) -> Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        Ok(Self {
            socket,
            handler,
            idle_timeout: None,
        })
    }

    /// Makes [`run`](Self::run) return once no datagram has arrived for
    /// `timeout`. `None` serves forever.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if `timeout` is zero.
    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Result<Self> {
        self.socket.set_read_timeout(timeout)?;
        self.idle_timeout = timeout;
        Ok(self)
    }

    /// The address the server is bound to.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the socket address cannot be read.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Receives and answers one datagram.
    ///
    /// Returns `Ok(false)` if the idle timeout elapsed without a datagram.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if receiving fails for a reason other than the
    /// idle timeout.
    pub fn serve_once(&self) -> Result<bool> {
        let mut buf = vec![0u8; MAX_PACKET];
        let (len, peer) = match self.socket.recv_from(&mut buf) {
            Ok(received) => received,
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                return Ok(false);
            }
            // ICMP port-unreachable from an earlier reply, reported on some platforms
            Err(e) if e.kind() == io::ErrorKind::ConnectionReset => {
                log::debug!("ignoring reset on udp socket: {e}");
                return Ok(true);
            }
            Err(e) => return Err(e.into()),
        };

        log::debug!("recv {len} bytes from {peer}");
        let request = String::from_utf8_lossy(&buf[..len]);
        let response = self.handler.handle(&request);
        log::debug!("send {response} to {peer}");
        if let Err(e) = self.socket.send_to(response.as_bytes(), peer) {
            log::warn!("failed to answer {peer}: {e}");
        }
        Ok(true)
    }

    /// Serves datagrams until the idle timeout elapses, or forever.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the socket fails.
    pub fn run(&self) -> Result<()> {
        if let Ok(addr) = self.socket.local_addr() {
            log::info!("serving udp on {addr}");
        }
        while self.serve_once()? {}
        if let Some(timeout) = self.idle_timeout {
            log::info!("no request for {}s, stopping udp server", timeout.as_secs_f64());
        }
        Ok(())
    }
}
