/// Configuration constants for TFE API
pub mod api {
    /// Base path for TFE API v2
    pub const BASE_PATH: &str = "/api/v2";

    /// Service identifier for the TFE API in remote service discovery
    pub const SERVICE_ID: &str = "tfe.v2";

    /// Remote service discovery document
    pub const DISCOVERY_PATH: &str = "/.well-known/terraform.json";

    /// Organizations endpoint
    pub const ORGANIZATIONS: &str = "organizations";

    /// Workspaces endpoint
    pub const WORKSPACES: &str = "workspaces";

    /// Projects endpoint
    pub const PROJECTS: &str = "projects";

    /// Teams endpoint
    pub const TEAMS: &str = "teams";

    /// Agent pools endpoint
    pub const AGENT_POOLS: &str = "agent-pools";

    /// Default page size for API requests
    pub const DEFAULT_PAGE_SIZE: u32 = 100;

    /// JSON:API media type
    pub const CONTENT_TYPE: &str = "application/vnd.api+json";
}

/// Configuration constants for credentials
pub mod credentials {
    /// Credentials file name
    pub const FILE_NAME: &str = "terraform.d/credentials.tfrc.json";

    /// Path to Terraform credentials file on Unix (relative to HOME)
    pub const FILE_PATH_UNIX: &str = ".terraform.d/credentials.tfrc.json";

    /// Prefix of host-specific token variables (`TF_TOKEN_app_terraform_io`)
    pub const HOST_TOKEN_ENV_PREFIX: &str = "TF_TOKEN_";

    /// Host-agnostic fallback token variable
    pub const GLOBAL_TOKEN_ENV: &str = "TFE_TOKEN";
}

/// CLI configuration file locations
pub mod cli_config {
    /// Explicit CLI config file path variables (checked in order)
    pub const PATH_ENV_VARS: &[&str] = &["TF_CLI_CONFIG_FILE", "TERRAFORM_CONFIG"];

    /// Default CLI config file on Unix (relative to HOME)
    pub const FILE_PATH_UNIX: &str = ".terraformrc";

    /// Default CLI config file on Windows (relative to APPDATA)
    pub const FILE_NAME_WINDOWS: &str = "terraform.rc";
}

/// Provider-level environment variables
pub mod env {
    use std::ffi::OsString;

    /// Hostname override
    pub const HOSTNAME: &str = "TFE_HOSTNAME";

    /// Disable TLS certificate verification
    pub const SSL_SKIP_VERIFY: &str = "TFE_SSL_SKIP_VERIFY";

    /// Default organization
    pub const ORGANIZATION: &str = "TFE_ORGANIZATION";

    /// Log filter variables (checked in order)
    pub const LOG_ENV_VARS: &[&str] = &["TF_LOG_PROVIDER_TFE", "TF_LOG_PROVIDER"];

    /// Keep the entries whose name and value are both valid UTF-8
    pub fn utf8_vars<I>(vars: I) -> Vec<(String, String)>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        vars.into_iter()
            .filter_map(|(name, value)| match (name.into_string(), value.into_string()) {
                (Ok(name), Ok(value)) => Some((name, value)),
                (Ok(name), Err(_)) => {
                    log::debug!("Skipping environment variable {}: value is not UTF-8", name);
                    None
                }
                (Err(name), _) => {
                    log::debug!("Skipping environment variable {:?}: name is not UTF-8", name);
                    None
                }
            })
            .collect()
    }

    /// Snapshot of the process environment
    ///
    /// Unlike `std::env::vars`, entries that are not valid UTF-8 are skipped
    /// instead of panicking.
    pub fn process_vars() -> Vec<(String, String)> {
        utf8_vars(std::env::vars_os())
    }
}

/// Default values for the provider
pub mod defaults {
    /// Default TFE host
    pub const HOST: &str = "app.terraform.io";

    /// Default log level
    pub const LOG_LEVEL: &str = "warn";
}
