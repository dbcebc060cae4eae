//! Stream transport: newline-delimited requests over one connection.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::{resolve, Transport};

/// A persistent TCP connection to an id server.
///
/// Each exchange writes one line and reads one line; exchanges on the same
/// connection are answered in order.
#[derive(Debug)]
pub struct TcpTransport {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl TcpTransport {
    /// Connects to `server`, applying `timeout` to the connect and to every
    /// subsequent read and write.
    ///
    /// # Errors
    ///
    /// Returns an error if the address does not resolve, the connection
    /// fails, or `timeout` is zero.
    pub fn connect(server: impl ToSocketAddrs, timeout: Duration) -> io::Result<Self> {
        let server = resolve(server)?;
        let stream = TcpStream::connect_timeout(&server, timeout)?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        stream.set_nodelay(true)?;
        let writer = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(stream),
            writer,
        })
    }
}

impl Transport for TcpTransport {
    fn exchange(&mut self, request: &str) -> io::Result<String> {
        self.writer.write_all(request.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "server closed the connection",
            ));
        }
        Ok(line.trim_end().to_string())
    }
}
