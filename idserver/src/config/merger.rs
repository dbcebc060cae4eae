//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::Config;

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use idserver::config::{Config, ConfigMerger};
///
/// let mut result = Config { port: Some(1000), ..Default::default() };
/// let high = Config { port: Some(2000), ..Default::default() };
///
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.port, Some(2000));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge sources, given lowest precedence first.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merge source config into target (source overwrites target).
    ///
    /// # Merging Rules
    ///
    /// - Simple fields: source overwrites if Some
    /// - Identifier set: an explicit `ids` list and the `id_prefix`/`id_count`
    ///   generator replace each other, so the higher source decides which
    ///   form is in effect
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.host.is_some() {
            target.host.clone_from(&source.host);
        }

        if source.port.is_some() {
            target.port = source.port;
        }

        if source.transport.is_some() {
            target.transport = source.transport;
        }

        if source.ids.is_some() {
            target.ids.clone_from(&source.ids);
            target.id_prefix = None;
            target.id_count = None;
        } else if source.id_prefix.is_some() || source.id_count.is_some() {
            target.ids = None;
            if source.id_prefix.is_some() {
                target.id_prefix.clone_from(&source.id_prefix);
            }
            if source.id_count.is_some() {
                target.id_count = source.id_count;
            }
        }

        if source.timeout_seconds.is_some() {
            target.timeout_seconds = source.timeout_seconds;
        }

        if source.idle_timeout_seconds.is_some() {
            target.idle_timeout_seconds = source.idle_timeout_seconds;
        }
    }
}
