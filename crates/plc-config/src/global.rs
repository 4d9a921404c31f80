//! Global Configuration (~/.plcontainer/config.toml)
//!
//! Handles user-level defaults stored in `~/.plcontainer/config.toml`.

use crate::limits::LimitsConfig;
use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global user configuration from ~/.plcontainer/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Default message limits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<LimitsConfig>,
}

impl GlobalConfig {
    /// Load global configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the global configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(limits) = &self.limits {
            limits.validate("limits")?;
        }
        Ok(())
    }

    /// Get the global config file path (~/.plcontainer/config.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".plcontainer").join("config.toml"))
    }

    /// Default argument bound, if any
    pub fn max_arguments(&self) -> Option<u32> {
        self.limits.as_ref().and_then(|l| l.max_arguments)
    }

    /// Default field bound, if any
    pub fn max_field_bytes(&self) -> Option<u32> {
        self.limits.as_ref().and_then(|l| l.max_field_bytes)
    }
}
