//! Provider block configuration and client construction

use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::config::{api, defaults, env};
use crate::error::{Result, TfeError};
use crate::hcp::discovery::discover_tfe_base_url;
use crate::hcp::{
    build_http_client, default_base_url, normalize_hostname, CliConfig, ClientOptions, TfeClient,
    TokenResolver,
};
use crate::provider::ids;
use crate::provider::state::{get_bool, get_str};
use crate::provider::types::{has_errors, Attribute, AttributeKind, Schema};

/// Settled provider configuration (attributes merged with environment)
#[derive(Clone, PartialEq)]
pub struct ProviderConfig {
    /// Normalized hostname
    pub hostname: String,
    /// Explicit token from the provider block
    pub token: Option<String>,
    pub ssl_skip_verify: bool,
    /// Default organization for resources that omit one
    pub organization: Option<String>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("hostname", &self.hostname)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("ssl_skip_verify", &self.ssl_skip_verify)
            .field("organization", &self.organization)
            .finish()
    }
}

impl ProviderConfig {
    /// Provider block schema
    pub fn schema() -> Schema {
        Schema::new(0)
            .attr(
                Attribute::optional("hostname", AttributeKind::String)
                    .describe("The Terraform Enterprise hostname to connect to."),
            )
            .attr(
                Attribute::optional("token", AttributeKind::String)
                    .sensitive()
                    .describe("The token used to authenticate with Terraform Enterprise."),
            )
            .attr(
                Attribute::optional("ssl_skip_verify", AttributeKind::Bool)
                    .describe("Whether or not to skip certificate verifications."),
            )
            .attr(
                Attribute::optional("organization", AttributeKind::String)
                    .describe("The organization to apply to a resource if one is not defined."),
            )
    }

    /// Build from a provider block, falling back to the process environment
    pub fn from_value(config: &Value) -> Result<Self> {
        Self::from_value_with_vars(config, env::process_vars())
    }

    /// Build from a provider block and an explicit set of environment variables
    pub fn from_value_with_vars<I>(config: &Value, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let diags = Self::schema().validate(config);
        if has_errors(&diags) {
            let detail: Vec<String> = diags.iter().map(|d| d.detail.clone()).collect();
            return Err(TfeError::Config(detail.join("; ")));
        }

        let vars: HashMap<String, String> = vars
            .into_iter()
            .filter(|(_, v)| !v.is_empty())
            .collect();
        let from_env = |name: &str| vars.get(name).cloned();

        let hostname = get_str(config, "hostname")
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .or_else(|| from_env(env::HOSTNAME))
            .unwrap_or_else(|| defaults::HOST.to_string());
        let hostname = normalize_hostname(&hostname)?;

        let ssl_skip_verify = match get_bool(config, "ssl_skip_verify") {
            Some(skip) => skip,
            None => match from_env(env::SSL_SKIP_VERIFY) {
                Some(raw) => parse_bool(env::SSL_SKIP_VERIFY, &raw)?,
                None => false,
            },
        };

        let organization = get_str(config, "organization")
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .or_else(|| from_env(env::ORGANIZATION));
        if let Some(ref org) = organization {
            ids::validate_segment(org)?;
        }

        let token = get_str(config, "token")
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Ok(Self {
            hostname,
            token,
            ssl_skip_verify,
            organization,
        })
    }

    /// Explicit token, else the resolver chain, else `TokenNotFound`
    pub fn resolve_token<I>(&self, cli_config: &CliConfig, vars: I) -> Result<String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        if let Some(ref token) = self.token {
            debug!("Using token from provider configuration");
            return Ok(token.clone());
        }

        let resolver = TokenResolver::with_cli_config(&self.hostname, cli_config.clone());
        resolver
            .resolve_from(vars)
            .ok_or_else(|| TfeError::TokenNotFound(resolver.token_not_found_message()))
    }

    /// Resolve token and base URL and build the API client
    pub async fn connect<I>(&self, cli_config: &CliConfig, vars: I) -> Result<TfeClient>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let token = self.resolve_token(cli_config, vars)?;
        let http = build_http_client(self.ssl_skip_verify)?;
        let origin = format!("https://{}", self.hostname);
        let base_url = resolve_base_url(&http, &self.hostname, &origin, cli_config).await;
        debug!("Using API base URL: {}", base_url);

        TfeClient::with_options(ClientOptions {
            token,
            host: self.hostname.clone(),
            base_url: Some(base_url),
            ssl_skip_verify: self.ssl_skip_verify,
        })
    }
}

/// CLI-config override, then service discovery against `origin`, then the default path
pub async fn resolve_base_url(
    http: &Client,
    hostname: &str,
    origin: &str,
    cli_config: &CliConfig,
) -> String {
    if let Some(url) = cli_config.tfe_service_override(hostname) {
        debug!("Using {} override from CLI config: {}", api::SERVICE_ID, url);
        return url.to_string();
    }

    match discover_tfe_base_url(http, origin).await {
        Ok(Some(url)) => url,
        Ok(None) => default_base_url(hostname),
        Err(e) => {
            warn!(
                "Service discovery for {} failed, using default API path: {}",
                hostname, e
            );
            default_base_url(hostname)
        }
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Ok(true),
        "0" | "f" | "false" => Ok(false),
        _ => Err(TfeError::Config(format!(
            "{} must be a boolean, got '{}'",
            name, raw
        ))),
    }
}
