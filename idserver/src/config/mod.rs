//! Configuration system for idserver.
//!
//! This module provides layered configuration with support for:
//! - a YAML configuration file (the user config or an explicit path)
//! - `IDSERVER_*` environment variable overrides
//! - programmatic overrides via the builder
//!
//! # Configuration Precedence
//!
//! Highest to lowest:
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`IDSERVER_*`)
//! 3. Configuration file (`--config` path, or `~/.idserver/config.yaml`)
//! 4. Built-in defaults
//!
//! # Examples
//!
//! ```
//! use idserver::config::{Config, ConfigBuilder, TransportKind};
//!
//! let config = ConfigBuilder::new()
//!     .skip_files()
//!     .skip_env()
//!     .with_config(Config {
//!         transport: Some(TransportKind::Tcp),
//!         ids: Some(vec!["shard-a".to_string(), "shard-b".to_string()]),
//!         ..Default::default()
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.transport(), TransportKind::Tcp);
//! assert_eq!(config.identifiers(), vec!["shard-a", "shard-b"]);
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource};
pub use merger::ConfigMerger;
pub use schema::{Config, TransportKind};
pub use validator::ConfigValidator;
