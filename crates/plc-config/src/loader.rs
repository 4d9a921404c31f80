//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::global::GlobalConfig;
use crate::limits::{
    validate_max_arguments, LimitsConfig, DEFAULT_MAX_ARGUMENTS, DEFAULT_MAX_FIELD_BYTES,
};
use crate::project::ProjectConfig;
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the project configuration file
pub const PROJECT_CONFIG_FILE: &str = "plcontainer.toml";

/// Environment variable overriding `limits.max_arguments`
pub const ENV_MAX_ARGUMENTS: &str = "PLC_MAX_ARGUMENTS";

/// Environment variable overriding `limits.max_field_bytes`
pub const ENV_MAX_FIELD_BYTES: &str = "PLC_MAX_FIELD_BYTES";

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.plcontainer/config.toml) - lowest priority
/// 2. Project config (./plcontainer.toml) - overrides global
/// 3. Environment variables (PLC_*) - overrides project
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Merged configuration result
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Project configuration (environment overrides already applied)
    pub project: ProjectConfig,

    /// Global configuration
    pub global: GlobalConfig,

    /// Directory where plcontainer.toml was found
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Create a loader that reads global configuration from `path`
    /// instead of the user's home directory
    pub fn with_global_config_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find plcontainer.toml, then loads and
    /// merges global config if it exists.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project_config) = self.find_project_config(start_dir)?;
        let global_config = self.load_global_config_or_default()?;
        let project_config = self.apply_env_overrides(project_config)?;

        Ok(Config {
            project: project_config,
            global: global_config,
            project_root,
        })
    }

    /// Load configuration from a specific project config file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let project_config = ProjectConfig::load_from_file(config_path)?;
        let global_config = self.load_global_config_or_default()?;
        let project_config = self.apply_env_overrides(project_config)?;

        let project_root = config_path.parent().map(|p| p.to_path_buf());

        Ok(Config {
            project: project_config,
            global: global_config,
            project_root,
        })
    }

    /// Find project configuration by walking up directory tree
    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(PROJECT_CONFIG_FILE);

            if config_path.exists() {
                let project_config = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(current), project_config));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, ProjectConfig::default())),
            }
        }
    }

    /// Global config is optional; a missing home directory or file means defaults
    fn load_global_config_or_default(&mut self) -> ConfigResult<GlobalConfig> {
        match self.load_global_config() {
            Ok(config) => Ok(config),
            Err(ConfigError::HomeNotFound) => Ok(GlobalConfig::default()),
            Err(e) => Err(e),
        }
    }

    /// Load global configuration from ~/.plcontainer/config.toml
    fn load_global_config(&mut self) -> ConfigResult<GlobalConfig> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => {
                let path = GlobalConfig::global_config_path()?;
                self.global_config_path = Some(path.clone());
                path
            }
        };

        if !path.exists() {
            return Ok(GlobalConfig::default());
        }

        GlobalConfig::load_from_file(&path)
    }

    /// Apply environment variable overrides to project config
    fn apply_env_overrides(&self, mut config: ProjectConfig) -> ConfigResult<ProjectConfig> {
        if let Ok(raw) = env::var(ENV_MAX_ARGUMENTS) {
            let max = parse_env_u32(ENV_MAX_ARGUMENTS, &raw)?;
            validate_max_arguments(ENV_MAX_ARGUMENTS, max)?;
            config.limits_mut().max_arguments = Some(max);
        }

        if let Ok(raw) = env::var(ENV_MAX_FIELD_BYTES) {
            let max = parse_env_u32(ENV_MAX_FIELD_BYTES, &raw)?;
            if max == 0 {
                return Err(ConfigError::InvalidValue {
                    field: ENV_MAX_FIELD_BYTES.to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
            config.limits_mut().max_field_bytes = Some(max);
        }

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env_u32(var: &str, raw: &str) -> ConfigResult<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|e| ConfigError::InvalidValue {
            field: var.to_string(),
            reason: format!("expected an unsigned integer, got '{}': {}", raw, e),
        })
}

impl Config {
    /// Global limits with project (and env) values merged over them
    pub fn limits(&self) -> LimitsConfig {
        let mut limits = self.global.limits.clone().unwrap_or_default();
        if let Some(project) = &self.project.limits {
            limits.merge(project);
        }
        limits
    }

    /// Effective argument bound (env/project > global > default)
    pub fn max_arguments(&self) -> u32 {
        self.limits().max_arguments.unwrap_or(DEFAULT_MAX_ARGUMENTS)
    }

    /// Effective text field bound (env/project > global > default)
    pub fn max_field_bytes(&self) -> u32 {
        self.limits()
            .max_field_bytes
            .unwrap_or(DEFAULT_MAX_FIELD_BYTES)
    }

    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if a plcontainer.toml was found
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn create_config_file(dir: &Path, content: &str) -> PathBuf {
        let config_path = dir.join(PROJECT_CONFIG_FILE);
        fs::write(&config_path, content).unwrap();
        config_path
    }

    fn isolated_loader(dir: &TempDir) -> ConfigLoader {
        ConfigLoader::with_global_config_path(dir.path().join("no-global.toml"))
    }

    #[test]
    #[serial]
    fn test_load_project_config() {
        let temp_dir = TempDir::new().unwrap();
        create_config_file(
            temp_dir.path(),
            r#"
[limits]
max_arguments = 12
"#,
        );

        let mut loader = isolated_loader(&temp_dir);
        let config = loader.load_from_directory(temp_dir.path()).unwrap();

        assert_eq!(config.max_arguments(), 12);
        assert_eq!(config.max_field_bytes(), DEFAULT_MAX_FIELD_BYTES);
        assert!(config.is_project());
    }

    #[test]
    #[serial]
    fn test_find_config_in_parent() {
        let temp_dir = TempDir::new().unwrap();
        create_config_file(temp_dir.path(), "");

        let sub_dir = temp_dir.path().join("subdir");
        fs::create_dir(&sub_dir).unwrap();

        let mut loader = isolated_loader(&temp_dir);
        let config = loader.load_from_directory(&sub_dir).unwrap();

        assert_eq!(config.project_root(), Some(temp_dir.path()));
    }

    #[test]
    #[serial]
    fn test_env_override_max_arguments() {
        let temp_dir = TempDir::new().unwrap();
        create_config_file(
            temp_dir.path(),
            r#"
[limits]
max_arguments = 12
"#,
        );

        env::set_var(ENV_MAX_ARGUMENTS, "99");

        let mut loader = isolated_loader(&temp_dir);
        let config = loader.load_from_directory(temp_dir.path()).unwrap();

        assert_eq!(config.max_arguments(), 99);

        env::remove_var(ENV_MAX_ARGUMENTS);
    }

    #[test]
    #[serial]
    fn test_env_override_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();

        env::set_var(ENV_MAX_FIELD_BYTES, "lots");

        let mut loader = isolated_loader(&temp_dir);
        let result = loader.load_from_directory(temp_dir.path());

        env::remove_var(ENV_MAX_FIELD_BYTES);

        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_limits_merge_project_over_global() {
        let config = Config {
            project: ProjectConfig {
                limits: Some(LimitsConfig {
                    max_arguments: Some(20),
                    max_field_bytes: None,
                }),
            },
            global: GlobalConfig {
                limits: Some(LimitsConfig {
                    max_arguments: Some(10),
                    max_field_bytes: Some(100),
                }),
            },
            project_root: None,
        };

        assert_eq!(
            config.limits(),
            LimitsConfig {
                max_arguments: Some(20),
                max_field_bytes: Some(100),
            }
        );
        assert_eq!(config.max_arguments(), 20);
        assert_eq!(config.max_field_bytes(), 100);
    }

    #[test]
    fn test_default_config_limits() {
        let config = Config::default();
        assert_eq!(config.max_arguments(), DEFAULT_MAX_ARGUMENTS);
        assert_eq!(config.max_field_bytes(), DEFAULT_MAX_FIELD_BYTES);
        assert!(!config.is_project());
    }
}
