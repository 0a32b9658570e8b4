//! Bridge configuration types and loading.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Measurement name used when none is configured.
pub const DEFAULT_MEASUREMENT: &str = "tasks";

/// Connection settings for the time-series endpoint.
///
/// Owned by the dispatcher once loaded; replaced wholesale on save-config,
/// never mutated field-by-field. Persistence is delegated to the host port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Write endpoint URL
    #[serde(rename = "endpoint-url")]
    pub endpoint_url: String,

    /// API token sent in the Authorization header
    #[serde(rename = "auth-token")]
    pub auth_token: String,

    /// Measurement name for exported task points
    pub measurement: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            endpoint_url: String::new(),
            auth_token: String::new(),
            measurement: DEFAULT_MEASUREMENT.to_string(),
        }
    }
}

impl BridgeConfig {
    /// Check whether both connection fields are present.
    ///
    /// Background sends are silently skipped while this is false; interactive
    /// actions surface the absence to the caller instead.
    pub fn is_connectable(&self) -> bool {
        !self.endpoint_url.is_empty() && !self.auth_token.is_empty()
    }

    /// Effective measurement name, falling back to [`DEFAULT_MEASUREMENT`].
    pub fn measurement(&self) -> &str {
        if self.measurement.is_empty() { DEFAULT_MEASUREMENT } else { &self.measurement }
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .fluxbridge.yml
        let local_config = PathBuf::from(".fluxbridge.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/fluxbridge/fluxbridge.yml
        let user_config = Self::default_path();
        if user_config.exists() {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// User-level config location: ~/.config/fluxbridge/fluxbridge.yml
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fluxbridge")
            .join("fluxbridge.yml")
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Serialize to YAML at the given path, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        fs::write(path, content).context(format!("Failed to write config to {}", path.display()))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();

        assert_eq!(config.endpoint_url, "");
        assert_eq!(config.auth_token, "");
        assert_eq!(config.measurement, "tasks");
        assert!(!config.is_connectable());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
endpoint-url: https://db.example/api/v2/write?bucket=tasks
auth-token: secret-token
measurement: work
"#;

        let config: BridgeConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.endpoint_url, "https://db.example/api/v2/write?bucket=tasks");
        assert_eq!(config.auth_token, "secret-token");
        assert_eq!(config.measurement(), "work");
        assert!(config.is_connectable());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
endpoint-url: https://db.example/write
"#;

        let config: BridgeConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.endpoint_url, "https://db.example/write");
        assert_eq!(config.auth_token, "");
        assert_eq!(config.measurement(), "tasks");
        assert!(!config.is_connectable());
    }

    #[test]
    fn test_empty_measurement_falls_back() {
        let config = BridgeConfig {
            measurement: String::new(),
            ..Default::default()
        };
        assert_eq!(config.measurement(), "tasks");
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("fluxbridge.yml");

        let config = BridgeConfig {
            endpoint_url: "https://db.example/write".to_string(),
            auth_token: "tok".to_string(),
            measurement: "tasks".to_string(),
        };
        config.save(&path).unwrap();

        let loaded = BridgeConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_explicit_path_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.yml");
        assert!(BridgeConfig::load(Some(&path)).is_err());
    }
}
