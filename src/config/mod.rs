//! Configuration management for passctl

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Production backend
pub const DEFAULT_API_HOST: &str = "https://backend.passculture.app";

/// Name of the credentials file stored next to the config
const CREDENTIALS_FILE: &str = "credentials.yaml";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend host (scheme + authority, no trailing path)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    /// Stable per-install identifier sent as `device-id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    /// Override for the `app-version` header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_host: None,
            device_id: None,
            app_version: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".passctl").join("config.yaml"))
    }

    /// Resolve an explicit path or fall back to the default location
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Path of the credentials file that backs the token store
    pub fn credentials_path(config_path: &Path) -> PathBuf {
        config_path
            .parent()
            .map(|dir| dir.join(CREDENTIALS_FILE))
            .unwrap_or_else(|| PathBuf::from(CREDENTIALS_FILE))
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Load the config at `path`, creating it on first run.
    ///
    /// A device id is minted and persisted when missing so that it stays
    /// stable across invocations.
    pub fn load_or_init_at(path: Option<&str>) -> Result<Self> {
        let path = Self::resolve_path(path)?;

        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            log::info!("No configuration at {}, creating one", path.display());
            Config::default()
        };

        if config.device_id.is_none() {
            config.device_id = Some(uuid::Uuid::new_v4().simple().to_string());
            config.save_to(&path)?;
        }

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, contents)?;
        restrict_permissions(path)?;

        Ok(())
    }

    /// Effective API host: runtime override, then config, then production
    pub fn api_host(&self, override_host: Option<&str>) -> String {
        override_host
            .or(self.api_host.as_deref())
            .unwrap_or(DEFAULT_API_HOST)
            .trim_end_matches('/')
            .to_string()
    }

    /// Effective `app-version` header value
    pub fn app_version(&self) -> String {
        self.app_version
            .clone()
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
    }

    /// Device id, or an error if the config was never initialized
    pub fn require_device_id(&self) -> Result<&str> {
        self.device_id
            .as_deref()
            .ok_or_else(|| ConfigError::Invalid("device_id is not set".to_string()).into())
    }
}

/// Set file permissions to 600 on Unix systems
pub fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms)?;
    }
    #[cfg(not(unix))]
    let _ = path;

    Ok(())
}
