//! Configuration validation.

use std::collections::HashSet;

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Validates configuration values and their consistency.
///
/// # Examples
///
/// ```
/// use idserver::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
///
/// let bad = Config { port: Some(0), ..Default::default() };
/// assert!(ConfigValidator::validate(&bad).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration.
    ///
    /// Applies equally to a single source and to the merged result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref host) = config.host {
            if host.trim().is_empty() {
                return Err(invalid("host", "Cannot be empty or only whitespace"));
            }
        }

        if config.port == Some(0) {
            return Err(invalid("port", "Port must be between 1 and 65535"));
        }

        if let Some(ref ids) = config.ids {
            if config.id_prefix.is_some() || config.id_count.is_some() {
                return Err(invalid(
                    "ids",
                    "Cannot be combined with id_prefix or id_count",
                ));
            }
            Self::validate_ids(ids)?;
        }

        if let Some(ref prefix) = config.id_prefix {
            if prefix.contains('\0') {
                return Err(invalid("id_prefix", "Cannot contain null bytes"));
            }
        }

        if config.id_count == Some(0) {
            return Err(invalid("id_count", "Must be greater than 0"));
        }

        if config.timeout_seconds == Some(0) {
            return Err(invalid("timeout_seconds", "Timeout must be greater than 0"));
        }

        if config.idle_timeout_seconds == Some(0) {
            return Err(invalid(
                "idle_timeout_seconds",
                "Timeout must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Validate an explicit identifier list.
    fn validate_ids(ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Err(invalid("ids", "At least one identifier is required"));
        }

        let mut seen = HashSet::new();
        for id in ids {
            if id.trim().is_empty() {
                return Err(invalid("ids", "Identifiers cannot be empty"));
            }
            if !seen.insert(id.as_str()) {
                return Err(invalid("ids", &format!("Duplicate identifier '{id}'")));
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> Error {
    Error::Validation {
        field: field.into(),
        message: message.into(),
    }
}
