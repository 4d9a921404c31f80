//! Project Configuration (plcontainer.toml)
//!
//! Handles configuration stored in `plcontainer.toml` next to the host or
//! container deployment.

use crate::limits::LimitsConfig;
use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Project configuration from plcontainer.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Message limits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<LimitsConfig>,
}

impl ProjectConfig {
    /// Load project configuration from a file
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

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(limits) = &self.limits {
            limits.validate("limits")?;
        }
        Ok(())
    }

    /// Configured argument bound, if any
    pub fn max_arguments(&self) -> Option<u32> {
        self.limits.as_ref().and_then(|l| l.max_arguments)
    }

    /// Configured field bound, if any
    pub fn max_field_bytes(&self) -> Option<u32> {
        self.limits.as_ref().and_then(|l| l.max_field_bytes)
    }

    /// Mutable access to the limits section, creating it when missing
    pub(crate) fn limits_mut(&mut self) -> &mut LimitsConfig {
        self.limits.get_or_insert_with(LimitsConfig::default)
    }
}
