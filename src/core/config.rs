use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

use super::currency::is_supported;
use super::orchestrator::InteractionState;
use crate::providers::exchangerate_api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DefaultsConfig {
    pub amount: String,
    pub from: String,
    pub to: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            amount: "1".to_string(),
            from: "USD".to_string(),
            to: "EUR".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in defaults
    /// when it does not exist.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "fxconv", "fxconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.validate()?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for code in [&self.defaults.from, &self.defaults.to] {
            if !is_supported(code) {
                bail!("Unsupported default currency in config: {code}");
            }
        }
        if self.provider.timeout_secs == 0 {
            bail!("provider.timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn initial_state(&self) -> InteractionState {
        InteractionState::new(
            &self.defaults.amount,
            &self.defaults.from,
            &self.defaults.to,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
provider:
  base_url: "http://example.com/rates"
  timeout_secs: 3
defaults:
  amount: "250"
  from: "gbp"
  to: "JPY"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, "http://example.com/rates");
        assert_eq!(config.provider.timeout(), Duration::from_secs(3));
        assert!(config.validate().is_ok());

        let state = config.initial_state();
        assert_eq!(state.amount, "250");
        assert_eq!(state.source, "GBP");
        assert_eq!(state.target, "JPY");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml_str = r#"
provider:
  base_url: "http://localhost:8080"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, "http://localhost:8080");
        assert_eq!(config.provider.timeout_secs, 10);
        assert_eq!(config.defaults, DefaultsConfig::default());

        let empty: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(empty, AppConfig::default());
        assert_eq!(empty.provider.base_url, "https://api.exchangerate-api.com");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");

        fs::write(&path, "defaults:\n  from: \"INR\"\n").unwrap();
        let err = AppConfig::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported default currency"));

        fs::write(&path, "provider:\n  timeout_secs: 0\n").unwrap();
        assert!(AppConfig::load_from_path(&path).is_err());

        fs::write(&path, "provider: [not, a, map]\n").unwrap();
        let err = AppConfig::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
