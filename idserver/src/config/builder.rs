//! Layered configuration assembly.

use std::path::{Path, PathBuf};

use crate::config::environment::EnvironmentConfig;
use crate::config::loader::{ConfigLoader, ConfigSource};
use crate::config::merger::ConfigMerger;
use crate::config::schema::Config;
use crate::config::validator::ConfigValidator;
use crate::error::Result;

/// Builds a [`Config`] from files, environment and programmatic overrides.
///
/// Sources are applied lowest precedence first: the configuration file
/// (explicit path or the user config), then `IDSERVER_*` variables, then
/// the overrides given to [`ConfigBuilder::with_config`]. Each source is
/// validated on its own and the merged result is validated again.
///
/// # Examples
///
/// ```
/// use idserver::config::{Config, ConfigBuilder};
///
/// let config = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_config(Config { port: Some(4000), ..Default::default() })
///     .build()
///     .unwrap();
/// assert_eq!(config.port(), 4000);
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    file: Option<PathBuf>,
    skip_files: bool,
    skip_env: bool,
    overrides: Option<Config>,
}

impl ConfigBuilder {
    /// Creates a builder that reads the user config and the environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `path` instead of the user config. The file must exist.
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Do not read any configuration file.
    #[must_use]
    pub fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Ignore `IDSERVER_*` environment variables.
    #[must_use]
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Highest-precedence overrides, typically from command-line flags.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides = Some(config);
        self
    }

    /// Assemble and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file cannot be read, any source
    /// fails to parse, or any source or the merged result is invalid.
    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        if !self.skip_files {
            let source = match self.file {
                Some(path) => {
                    let config = ConfigLoader::load_file(&path)?;
                    Some(ConfigSource { path, config })
                }
                None => ConfigLoader::load_user_config()?,
            };
            if let Some(source) = source {
                ConfigValidator::validate(&source.config)?;
                ConfigMerger::merge_into(&mut config, &source.config);
            }
        }

        if !self.skip_env {
            EnvironmentConfig::apply_overrides(&mut config)?;
        }

        if let Some(overrides) = self.overrides {
            ConfigValidator::validate(&overrides)?;
            ConfigMerger::merge_into(&mut config, &overrides);
        }

        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}
