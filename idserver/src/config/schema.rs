//! Configuration schema definitions.
//!
//! Every field is optional so that partial configurations from different
//! sources can be merged; the accessor methods on [`Config`] supply the
//! built-in defaults for anything left unset.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use idserver::config::Config;
///
/// let config = Config {
///     id_prefix: Some("shard-".to_string()),
///     id_count: Some(3),
///     ..Default::default()
/// };
/// assert_eq!(config.identifiers(), vec!["shard-0", "shard-1", "shard-2"]);
/// assert_eq!(config.port(), 9777);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Address to bind (server) or contact (client).
    pub host: Option<String>,

    /// Port to bind or contact.
    pub port: Option<u16>,

    /// Which transport(s) to use.
    pub transport: Option<TransportKind>,

    /// Explicit identifier list, in scan order.
    pub ids: Option<Vec<String>>,

    /// Prefix for generated identifiers.
    pub id_prefix: Option<String>,

    /// Number of generated identifiers.
    pub id_count: Option<usize>,

    /// Client timeout waiting for the server (seconds).
    pub timeout_seconds: Option<u64>,

    /// UDP server exits after this many seconds without a request.
    pub idle_timeout_seconds: Option<u64>,
}

impl Config {
    /// Default bind/contact address.
    pub const DEFAULT_HOST: &'static str = "127.0.0.1";
    /// Default port.
    pub const DEFAULT_PORT: u16 = 9777;
    /// Default prefix for generated identifiers.
    pub const DEFAULT_ID_PREFIX: &'static str = "name-";
    /// Default number of generated identifiers.
    pub const DEFAULT_ID_COUNT: usize = 10;
    /// Default client timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

    /// The configured host, or [`Config::DEFAULT_HOST`].
    #[must_use]
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(Self::DEFAULT_HOST)
    }

    /// The configured port, or [`Config::DEFAULT_PORT`].
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(Self::DEFAULT_PORT)
    }

    /// The configured transport, or UDP.
    #[must_use]
    pub fn transport(&self) -> TransportKind {
        self.transport.unwrap_or_default()
    }

    /// `host:port`, bracketing IPv6 literals.
    ///
    /// ```
    /// use idserver::config::Config;
    ///
    /// let config = Config { host: Some("::1".to_string()), ..Default::default() };
    /// assert_eq!(config.address(), "[::1]:9777");
    /// ```
    #[must_use]
    pub fn address(&self) -> String {
        let host = self.host();
        if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{}", self.port())
        } else {
            format!("{host}:{}", self.port())
        }
    }

    /// The identifier set: the explicit `ids` list if given, otherwise
    /// `id_count` identifiers named `{id_prefix}{n}`.
    #[must_use]
    pub fn identifiers(&self) -> Vec<String> {
        if let Some(ids) = &self.ids {
            return ids.clone();
        }
        let prefix = self.id_prefix.as_deref().unwrap_or(Self::DEFAULT_ID_PREFIX);
        let count = self.id_count.unwrap_or(Self::DEFAULT_ID_COUNT);
        (0..count).map(|n| format!("{prefix}{n}")).collect()
    }

    /// Client timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(Self::DEFAULT_TIMEOUT_SECONDS))
    }

    /// UDP idle timeout, if any.
    #[must_use]
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_seconds.map(Duration::from_secs)
    }
}

/// Transport selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// One JSON message per datagram.
    #[default]
    Udp,
    /// One JSON message per line over a stream connection.
    Tcp,
    /// Serve both (server only).
    Both,
}

impl FromStr for TransportKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "udp" => Ok(Self::Udp),
            "tcp" => Ok(Self::Tcp),
            "both" => Ok(Self::Both),
            _ => Err(Error::Validation {
                field: "transport".into(),
                message: format!("Unknown transport '{s}' (expected udp, tcp or both)"),
            }),
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Udp => "udp",
            Self::Tcp => "tcp",
            Self::Both => "both",
        };
        f.write_str(name)
    }
}
