//! Terraform CLI configuration (credentials and host service overrides)
//!
//! Only the JSON syntax of the CLI config is understood. Anything that cannot
//! be read or parsed is logged and ignored: the CLI config is optional.

use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{api, cli_config, credentials, env};
use crate::error::{Result, TfeError};
use crate::hcp::credentials::{normalize_hostname, CredentialsSource};

/// Raw CLI config file structure
#[derive(Deserialize, Debug, Default)]
struct RawCliConfig {
    #[serde(default)]
    credentials: HashMap<String, CredentialBlock>,
    #[serde(default)]
    host: HashMap<String, HostBlock>,
}

/// Static credentials for one host
#[derive(Deserialize, Debug)]
struct CredentialBlock {
    token: String,
}

/// Service discovery override for one host
#[derive(Deserialize, Debug, Default)]
struct HostBlock {
    #[serde(default)]
    services: HashMap<String, String>,
}

/// Parsed CLI configuration, keyed by normalized hostname
#[derive(Debug, Default, Clone)]
pub struct CliConfig {
    credentials: HashMap<String, String>,
    services: HashMap<String, HashMap<String, String>>,
}

impl CliConfig {
    /// Load from the default locations, ignoring anything unreadable
    ///
    /// Entries from the CLI config file win over `credentials.tfrc.json`.
    pub fn load() -> Self {
        let mut config = CliConfig::default();

        if let Some(path) = Self::credentials_file_path() {
            config.merge_file(&path);
        }
        if let Some(path) = Self::cli_config_path(env::process_vars()) {
            config.merge_file(&path);
        }

        config
    }

    /// Parse one file, failing on unreadable or non-JSON content
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TfeError::Credentials(format!(
                "Could not read CLI config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content).map_err(|e| {
            TfeError::Credentials(format!(
                "Could not parse CLI config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse JSON CLI config content
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: RawCliConfig = serde_json::from_str(content)?;
        let mut config = CliConfig::default();

        for (host, block) in raw.credentials {
            match normalize_hostname(&host) {
                Ok(normalized) => {
                    config.credentials.insert(normalized, block.token);
                }
                Err(e) => warn!("Ignoring credentials for invalid hostname '{}': {}", host, e),
            }
        }
        for (host, block) in raw.host {
            match normalize_hostname(&host) {
                Ok(normalized) => {
                    config.services.insert(normalized, block.services);
                }
                Err(e) => warn!("Ignoring host block for invalid hostname '{}': {}", host, e),
            }
        }

        Ok(config)
    }

    /// Merge a file into this config; later files win per host
    fn merge_file(&mut self, path: &Path) {
        if !path.exists() {
            debug!("CLI config file {} not present", path.display());
            return;
        }
        match Self::from_file(path) {
            Ok(other) => {
                debug!("Loaded CLI config from {}", path.display());
                self.credentials.extend(other.credentials);
                self.services.extend(other.services);
            }
            Err(e) => warn!("{}; ignoring it", e),
        }
    }

    /// The `tfe.v2` service URL override for a host, if any
    pub fn tfe_service_override(&self, hostname: &str) -> Option<&str> {
        let normalized = normalize_hostname(hostname).ok()?;
        self.services
            .get(&normalized)
            .and_then(|services| services.get(api::SERVICE_ID))
            .map(String::as_str)
    }

    /// Explicit CLI config path from the given variables, else the default file
    fn cli_config_path<I>(vars: I) -> Option<PathBuf>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars.into_iter().collect();
        for name in cli_config::PATH_ENV_VARS {
            if let Some(path) = vars.get(*name).filter(|p| !p.is_empty()) {
                debug!("Using CLI config file from {}: {}", name, path);
                return Some(PathBuf::from(path));
            }
        }

        #[cfg(windows)]
        {
            dirs::config_dir().map(|p| p.join(cli_config::FILE_NAME_WINDOWS))
        }

        #[cfg(not(windows))]
        {
            dirs::home_dir().map(|p| p.join(cli_config::FILE_PATH_UNIX))
        }
    }

    /// Get the path to Terraform credentials file (platform-specific)
    /// - Windows: %APPDATA%\terraform.d\credentials.tfrc.json
    /// - Linux/macOS: ~/.terraform.d/credentials.tfrc.json
    fn credentials_file_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            dirs::config_dir().map(|p| p.join(credentials::FILE_NAME))
        }

        #[cfg(not(windows))]
        {
            dirs::home_dir().map(|p| p.join(credentials::FILE_PATH_UNIX))
        }
    }
}

impl CredentialsSource for CliConfig {
    fn token_for(&self, hostname: &str) -> Result<Option<String>> {
        let normalized = normalize_hostname(hostname)?;
        Ok(self.credentials.get(&normalized).cloned())
    }
}
