//! PL/Container Protocol Configuration
//!
//! Provides the limits a host or container applies to call-request messages:
//! - Project configuration (plcontainer.toml)
//! - Global user configuration (~/.plcontainer/config.toml)
//! - Environment overrides (PLC_*)
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config (~/.plcontainer/config.toml)
//! 3. Project config (./plcontainer.toml)
//! 4. Environment variables (PLC_MAX_ARGUMENTS, PLC_MAX_FIELD_BYTES)
//!
//! # Example
//!
//! ```no_run
//! use plc_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("max arguments: {}", config.max_arguments());
//! ```

pub mod global;
pub mod limits;
pub mod loader;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use global::GlobalConfig;
pub use limits::{LimitsConfig, DEFAULT_MAX_ARGUMENTS, DEFAULT_MAX_FIELD_BYTES};
pub use loader::{Config, ConfigLoader};
pub use project::ProjectConfig;
