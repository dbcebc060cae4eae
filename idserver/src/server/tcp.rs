//! Stream adapter: newline-delimited requests, one thread per connection.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::thread;

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::protocol::{ProtocolHandler, Response};

/// Longest request line accepted, in bytes, excluding the newline.
///
/// A peer that exceeds it gets an error envelope and the connection is
/// closed.
pub const MAX_LINE: usize = 64 * 1024;

/// Message sent before closing a connection whose request line is too long.
pub const LINE_TOO_LONG_MESSAGE: &str = "request line too long";

/// A threaded TCP id server.
///
/// Requests on one connection are answered strictly in order; separate
/// connections are served concurrently against the shared pool.
///
/// Connection threads are detached and unbounded, and no read timeout is
/// set: an idle connection keeps its thread until the peer disconnects.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use idserver::{IdPool, ProtocolHandler, TcpServer};
///
/// let pool = IdPool::new((0..10).map(|i| format!("name-{i}"))).unwrap();
/// let handler = Arc::new(ProtocolHandler::new(pool));
/// TcpServer::bind("127.0.0.1:9777", handler).unwrap().run().unwrap();
/// ```
#[derive(Debug)]
pub struct TcpServer<C: Clock = SystemClock> {
    listener: TcpListener,
    handler: Arc<ProtocolHandler<C>>,
}

impl<C: Clock + 'static> TcpServer<C> {
    /// Starts listening on `addr`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the address cannot be bound.
    pub fn bind(addr: impl ToSocketAddrs, handler: Arc<ProtocolHandler<C>>) -> Result<Self> {
        let listener = TcpListener::bind(addr)?;
        Ok(Self { listener, handler })
    }

    /// The address the server is listening on.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the socket address cannot be read.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections forever, serving each on its own thread.
    ///
    /// # Errors
    ///
    /// Accept failures are logged and skipped; this only returns if the
    /// listener stops yielding connections.
    pub fn run(&self) -> Result<()> {
        if let Ok(addr) = self.listener.local_addr() {
            log::info!("serving tcp on {addr}");
        }
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => self.spawn_connection(stream),
                Err(e) => log::warn!("failed to accept connection: {e}"),
            }
        }
        Ok(())
    }

    fn spawn_connection(&self, stream: TcpStream) {
        let handler = Arc::clone(&self.handler);
        thread::spawn(move || {
            let peer = stream
                .peer_addr()
                .map_or_else(|_| "unknown peer".to_string(), |addr| addr.to_string());
            log::debug!("connection from {peer}");
            match serve_connection(stream, &*handler, &peer) {
                Ok(()) => log::debug!("connection from {peer} closed"),
                Err(e) => log::warn!("connection from {peer} failed: {e}"),
            }
        });
    }
}

fn serve_connection<C: Clock>(
    stream: TcpStream,
    handler: &ProtocolHandler<C>,
    peer: &str,
) -> io::Result<()> {
    let writer = stream.try_clone()?;
    serve_stream(BufReader::new(stream), writer, handler, peer)
}

/// Answers newline-delimited requests from `reader` on `writer` until EOF.
///
/// Blank lines are skipped. Invalid UTF-8 is replaced rather than treated as
/// a connection error, so the client still gets an error envelope. A line
/// longer than [`MAX_LINE`] is answered with an error envelope and ends the
/// conversation.
///
/// # Errors
///
/// Returns an I/O error if reading or writing fails.
pub fn serve_stream<C, R, W>(
    mut reader: R,
    mut writer: W,
    handler: &ProtocolHandler<C>,
    peer: &str,
) -> io::Result<()>
where
    C: Clock,
    R: BufRead,
    W: Write,
{
    let mut line = Vec::new();
    loop {
        line.clear();
        let limit = MAX_LINE as u64 + 1;
        if reader.by_ref().take(limit).read_until(b'\n', &mut line)? == 0 {
            return Ok(());
        }
        if line.len() > MAX_LINE && !line.ends_with(b"\n") {
            log::warn!("request line from {peer} exceeds {MAX_LINE} bytes, closing");
            writer.write_all(Response::failure(LINE_TOO_LONG_MESSAGE).encode().as_bytes())?;
            writer.write_all(b"\n")?;
            return writer.flush();
        }
        let request = String::from_utf8_lossy(&line);
        let request = request.trim();
        if request.is_empty() {
            continue;
        }

        log::debug!("recv from {peer}");
        let response = handler.handle(request);
        log::debug!("send {response} to {peer}");
        writer.write_all(response.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
}
