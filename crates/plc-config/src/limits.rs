//! `[limits]` section shared by project and global configuration.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Default upper bound on `argument_count` accepted from a peer
pub const DEFAULT_MAX_ARGUMENTS: u32 = 65_535;

/// Default upper bound on a single text field (64 MiB)
pub const DEFAULT_MAX_FIELD_BYTES: u32 = 64 * 1024 * 1024;

/// Protocol limits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum number of arguments in one call request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_arguments: Option<u32>,

    /// Maximum byte length of one text field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_field_bytes: Option<u32>,
}

impl LimitsConfig {
    /// Validate the limits, reporting fields as `<section>.<key>`
    pub fn validate(&self, section: &str) -> ConfigResult<()> {
        if let Some(max) = self.max_arguments {
            validate_max_arguments(&format!("{}.max_arguments", section), max)?;
        }
        if let Some(max) = self.max_field_bytes {
            if max == 0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("{}.max_field_bytes", section),
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Merge another limits section into this one
    /// Other config takes precedence for non-None values
    pub fn merge(&mut self, other: &LimitsConfig) {
        if other.max_arguments.is_some() {
            self.max_arguments = other.max_arguments;
        }
        if other.max_field_bytes.is_some() {
            self.max_field_bytes = other.max_field_bytes;
        }
    }
}

/// `argument_count` travels as an int32, so the bound must fit in one
pub(crate) fn validate_max_arguments(field: &str, max: u32) -> ConfigResult<()> {
    if max == 0 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    if max > i32::MAX as u32 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("must not exceed {}, got {}", i32::MAX, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_other() {
        let mut base = LimitsConfig {
            max_arguments: Some(10),
            max_field_bytes: Some(1024),
        };
        base.merge(&LimitsConfig {
            max_arguments: Some(20),
            max_field_bytes: None,
        });

        assert_eq!(base.max_arguments, Some(20));
        assert_eq!(base.max_field_bytes, Some(1024));
    }

    #[test]
    fn test_zero_limits_rejected() {
        let limits = LimitsConfig {
            max_arguments: Some(0),
            max_field_bytes: None,
        };
        assert!(limits.validate("limits").is_err());

        let limits = LimitsConfig {
            max_arguments: None,
            max_field_bytes: Some(0),
        };
        assert!(limits.validate("limits").is_err());
    }

    #[test]
    fn test_max_arguments_must_fit_int32() {
        let limits = LimitsConfig {
            max_arguments: Some(u32::MAX),
            max_field_bytes: None,
        };
        let err = limits.validate("limits").unwrap_err();
        assert!(err.to_string().contains("limits.max_arguments"));
    }
}
