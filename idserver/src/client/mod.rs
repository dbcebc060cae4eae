//! Client helper for talking to an id server.
//!
//! [`IdClient`] builds requests and interprets responses; the bytes travel
//! over any [`Transport`]. UDP and TCP transports are provided, and any
//! `FnMut(&str) -> io::Result<String>` closure also works as a transport,
//! which is handy for wiring a client straight to a
//! [`ProtocolHandler`](crate::ProtocolHandler).

pub mod tcp;
pub mod udp;

use std::io;
use std::net::ToSocketAddrs;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::protocol::{Request, Response};

pub use tcp::TcpTransport;
pub use udp::UdpTransport;

/// Default time to wait for the server before giving up.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A send/receive primitive: deliver one request, return one response.
pub trait Transport {
    /// Sends `request` and waits for the matching response text.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the request cannot be delivered or no
    /// response arrives in time.
    fn exchange(&mut self, request: &str) -> io::Result<String>;
}

impl<F> Transport for F
where
    F: FnMut(&str) -> io::Result<String>,
{
    fn exchange(&mut self, request: &str) -> io::Result<String> {
        self(request)
    }
}

/// Issues `acquire`/`release` requests over a transport.
///
/// # Examples
///
/// ```
/// use std::io;
/// use idserver::{IdClient, IdPool, ProtocolHandler};
///
/// let handler = ProtocolHandler::new(IdPool::new(["a"]).unwrap());
/// let mut client = IdClient::new(|req: &str| -> io::Result<String> { Ok(handler.handle(req)) });
///
/// assert_eq!(client.acquire("w1", 30.0).unwrap(), "a");
/// assert!(client.acquire("w2", 30.0).unwrap_err().is_remote());
/// client.release("w1").unwrap();
/// ```
#[derive(Debug)]
pub struct IdClient<T: Transport> {
    transport: T,
}

impl<T: Transport> IdClient<T> {
    /// Creates a client over `transport`.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Acquires (or renews) an identifier for `owner` lasting `ttl_seconds`.
    ///
    /// # Errors
    ///
    /// - [`Error::Remote`] if the server refused, e.g. `id exhausted`
    /// - [`Error::Transport`] if the exchange itself failed
    /// - [`Error::MalformedResponse`] if the reply was not understood
    pub fn acquire(&mut self, owner: &str, ttl_seconds: f64) -> Result<String> {
        let request = Request::Get {
            owner: owner.to_string(),
            expire: ttl_seconds,
        };
        self.call(&request)?
            .ok_or_else(|| Error::MalformedResponse {
                details: "success response without a value".into(),
            })
    }

    /// Releases the identifier held by `owner`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`IdClient::acquire`], except that releasing
    /// without a lease is not an error.
    pub fn release(&mut self, owner: &str) -> Result<()> {
        let request = Request::Put {
            owner: owner.to_string(),
        };
        self.call(&request).map(|_| ())
    }

    /// Consumes the client, returning the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }

    fn call(&mut self, request: &Request) -> Result<Option<String>> {
        let text = request.encode()?;
        let reply = self.transport.exchange(&text).map_err(Error::Transport)?;
        Response::decode(&reply)?.into_result()
    }
}

impl IdClient<UdpTransport> {
    /// Creates a UDP client for the server at `server`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the address does not resolve or a
    /// local socket cannot be set up.
    pub fn udp(server: impl ToSocketAddrs, timeout: Duration) -> Result<Self> {
        UdpTransport::connect(server, timeout)
            .map(Self::new)
            .map_err(Error::Transport)
    }
}

impl IdClient<TcpTransport> {
    /// Creates a TCP client connected to the server at `server`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the address does not resolve or the
    /// connection fails.
    pub fn tcp(server: impl ToSocketAddrs, timeout: Duration) -> Result<Self> {
        TcpTransport::connect(server, timeout)
            .map(Self::new)
            .map_err(Error::Transport)
    }
}

/// Resolves `addr` to its first socket address.
pub(crate) fn resolve(addr: impl ToSocketAddrs) -> io::Result<std::net::SocketAddr> {
    addr.to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "address resolved to nothing")
    })
}
