//! Environment variable handling for configuration overrides.
//!
//! `IDSERVER_*` variables override configuration file values.

use std::env;
use std::str::FromStr;

use crate::config::merger::ConfigMerger;
use crate::config::schema::{Config, TransportKind};
use crate::config::validator::ConfigValidator;
use crate::error::{Error, Result};

/// Bind/contact host.
pub const HOST_ENV: &str = "IDSERVER_HOST";
/// Bind/contact port.
pub const PORT_ENV: &str = "IDSERVER_PORT";
/// `udp`, `tcp` or `both`.
pub const TRANSPORT_ENV: &str = "IDSERVER_TRANSPORT";
/// Comma-separated identifier list.
pub const IDS_ENV: &str = "IDSERVER_IDS";
/// Prefix for generated identifiers.
pub const ID_PREFIX_ENV: &str = "IDSERVER_ID_PREFIX";
/// Number of generated identifiers.
pub const ID_COUNT_ENV: &str = "IDSERVER_ID_COUNT";
/// Client timeout in seconds.
pub const TIMEOUT_ENV: &str = "IDSERVER_TIMEOUT_SECONDS";
/// UDP idle timeout in seconds.
pub const IDLE_TIMEOUT_ENV: &str = "IDSERVER_IDLE_TIMEOUT_SECONDS";

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use idserver::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Read all `IDSERVER_*` variables into a partial configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable holds an unparseable value.
    pub fn load() -> Result<Config> {
        let mut config = Config::default();

        if let Ok(host) = env::var(HOST_ENV) {
            config.host = Some(host);
        }

        if let Ok(port) = env::var(PORT_ENV) {
            config.port = Some(Self::parse_number(PORT_ENV, &port)?);
        }

        if let Ok(transport) = env::var(TRANSPORT_ENV) {
            config.transport = Some(transport.parse::<TransportKind>()?);
        }

        if let Ok(ids) = env::var(IDS_ENV) {
            config.ids = Some(Self::parse_ids(&ids));
        }

        if let Ok(prefix) = env::var(ID_PREFIX_ENV) {
            config.id_prefix = Some(prefix);
        }

        if let Ok(count) = env::var(ID_COUNT_ENV) {
            config.id_count = Some(Self::parse_number(ID_COUNT_ENV, &count)?);
        }

        if let Ok(seconds) = env::var(TIMEOUT_ENV) {
            config.timeout_seconds = Some(Self::parse_number(TIMEOUT_ENV, &seconds)?);
        }

        if let Ok(seconds) = env::var(IDLE_TIMEOUT_ENV) {
            config.idle_timeout_seconds = Some(Self::parse_number(IDLE_TIMEOUT_ENV, &seconds)?);
        }

        Ok(config)
    }

    /// Apply environment variable overrides to `config`.
    ///
    /// The variables are validated as a source of their own before being
    /// merged, so `IDSERVER_IDS` together with `IDSERVER_ID_COUNT` is
    /// rejected rather than silently resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is invalid.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        let overrides = Self::load()?;
        ConfigValidator::validate(&overrides)?;
        ConfigMerger::merge_into(config, &overrides);
        Ok(())
    }

    /// Split a comma-separated identifier list, trimming each entry.
    ///
    /// Empty entries are kept so that validation can report them.
    fn parse_ids(s: &str) -> Vec<String> {
        if s.trim().is_empty() {
            return Vec::new();
        }
        s.split(',').map(|id| id.trim().to_string()).collect()
    }

    fn parse_number<T: FromStr>(field: &str, s: &str) -> Result<T> {
        s.trim().parse().map_err(|_| Error::Validation {
            field: field.into(),
            message: format!("Must be a non-negative integer, got '{s}'"),
        })
    }
}
