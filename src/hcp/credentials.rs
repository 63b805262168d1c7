//! API token resolution from multiple sources
//!
//! Priority, highest first:
//! 1. host-specific `TF_TOKEN_<escaped host>` variable
//! 2. host-agnostic `TFE_TOKEN` variable
//! 3. a CLI-config credential source
//!
//! An explicit provider `token` attribute is handled by the caller and beats all three.

use log::{debug, warn};
use std::collections::HashMap;

use crate::config::{credentials, env};
use crate::error::{Result, TfeError};
use crate::hcp::cli_config::CliConfig;

/// Source of static per-host credentials (the CLI config, or a test double)
pub trait CredentialsSource: Send + Sync {
    /// Token for `hostname`, `Ok(None)` when the source has none
    fn token_for(&self, hostname: &str) -> Result<Option<String>>;
}

/// Normalize a hostname to its comparison form
///
/// Accepts punycode or Unicode input, lower-cases it, and keeps a `:port`
/// suffix unless it is the default HTTPS port.
pub fn normalize_hostname(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let (host, port) = match raw.rsplit_once(':') {
        Some((h, p)) if !h.contains(':') => (h, Some(p)),
        _ => (raw, None),
    };

    let parsed = url::Host::parse(host)
        .map_err(|e| TfeError::Validation(format!("invalid hostname '{}': {}", raw, e)))?;
    let mut normalized = match parsed {
        url::Host::Domain(d) => d.trim_end_matches('.').to_string(),
        other => other.to_string(),
    };

    if let Some(port) = port {
        let port: u16 = port
            .parse()
            .map_err(|_| TfeError::Validation(format!("invalid port in hostname '{}'", raw)))?;
        if port != 443 {
            normalized.push_str(&format!(":{}", port));
        }
    }

    Ok(normalized)
}

/// Hostname encoded in a `TF_TOKEN_` variable name suffix
///
/// `__` encodes `-`, a remaining single `_` encodes `.`.
fn hostname_from_env_suffix(suffix: &str) -> String {
    suffix.replace("__", "-").replace('_', ".")
}

/// Build the normalized-host -> token map from `TF_TOKEN_*` variables
///
/// Variables whose names do not decode to a valid hostname are skipped.
pub fn collect_host_tokens<I>(vars: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut tokens = HashMap::new();

    for (name, value) in vars {
        let Some(suffix) = name.strip_prefix(credentials::HOST_TOKEN_ENV_PREFIX) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }

        let candidate = hostname_from_env_suffix(suffix);
        match normalize_hostname(&candidate) {
            Ok(host) => {
                tokens.insert(host, value);
            }
            Err(e) => debug!("Skipping {}: {}", name, e),
        }
    }

    tokens
}

/// Token resolution with fallback logic
pub struct TokenResolver {
    host: String,
    cli_credentials: Option<Box<dyn CredentialsSource>>,
}

impl TokenResolver {
    /// Create a resolver for `host` with no CLI credential source
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            cli_credentials: None,
        }
    }

    /// Create a resolver backed by the CLI config files on disk
    pub fn with_cli_config(host: &str, cli_config: CliConfig) -> Self {
        Self::new(host).with_credentials_source(Box::new(cli_config))
    }

    /// Attach a CLI credential source
    pub fn with_credentials_source(mut self, source: Box<dyn CredentialsSource>) -> Self {
        self.cli_credentials = Some(source);
        self
    }

    /// Resolve against the current process environment
    pub fn resolve(&self) -> Option<String> {
        self.resolve_from(env::process_vars())
    }

    /// Resolve against an explicit set of environment variables
    pub fn resolve_from<I>(&self, vars: I) -> Option<String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();

        // 1. Host-specific variable
        let target = match normalize_hostname(&self.host) {
            Ok(host) => Some(host),
            Err(e) => {
                warn!("Cannot normalize hostname '{}': {}", self.host, e);
                None
            }
        };
        if let Some(ref target) = target {
            let host_tokens = collect_host_tokens(vars.iter().cloned());
            if let Some(token) = host_tokens.get(target) {
                debug!(
                    "Using token from {} variable for host: {}",
                    credentials::HOST_TOKEN_ENV_PREFIX,
                    target
                );
                return Some(token.clone());
            }
        }

        // 2. Global fallback variable
        if let Some((_, token)) = vars
            .iter()
            .find(|(k, v)| k == credentials::GLOBAL_TOKEN_ENV && !v.is_empty())
        {
            debug!(
                "Using token from {} environment variable",
                credentials::GLOBAL_TOKEN_ENV
            );
            return Some(token.clone());
        }

        // 3. CLI config credentials
        if let Some(ref source) = self.cli_credentials {
            match source.token_for(&self.host) {
                Ok(Some(token)) => {
                    debug!("Using token from CLI config for host: {}", self.host);
                    return Some(token);
                }
                Ok(None) => {}
                Err(e) => warn!(
                    "Failed to read CLI config credentials for {}: {}",
                    self.host, e
                ),
            }
        }

        None
    }

    /// Generate helpful error message when token is not found
    pub fn token_not_found_message(&self) -> String {
        format!(
            "Required token could not be found for host '{}'. Please provide a token using one of:\n\
             \n\
             1. Provider attribute: token = \"<TOKEN>\"\n\
             2. Environment var:    export {}{}=<TOKEN>\n\
             3. Environment var:    export {}=<TOKEN>\n\
             4. Terraform login:    terraform login {}",
            self.host,
            credentials::HOST_TOKEN_ENV_PREFIX,
            self.host.replace('-', "__").replace('.', "_"),
            credentials::GLOBAL_TOKEN_ENV,
            self.host
        )
    }
}
