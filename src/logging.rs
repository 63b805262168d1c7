//! Logger initialisation for the provider process
//!
//! Terraform reads the plugin handshake from stdout, so all log output goes
//! to stderr.

use crate::config::{defaults, env};

/// Map a Terraform log level name to an `env_logger` filter
fn filter_for_level(level: &str) -> String {
    match level.trim().to_ascii_lowercase().as_str() {
        "" => defaults::LOG_LEVEL.to_string(),
        "json" => "trace".to_string(),
        other => other.to_string(),
    }
}

/// Pick the log filter from the first set variable in `vars`
fn filter_from_vars<I>(vars: I) -> String
where
    I: IntoIterator<Item = (String, String)>,
{
    let vars: Vec<(String, String)> = vars.into_iter().collect();
    env::LOG_ENV_VARS
        .iter()
        .find_map(|name| {
            vars.iter()
                .find(|(k, v)| k == name && !v.trim().is_empty())
                .map(|(_, v)| filter_for_level(v))
        })
        .unwrap_or_else(|| defaults::LOG_LEVEL.to_string())
}

/// Initialise logging from `TF_LOG_PROVIDER_TFE` / `TF_LOG_PROVIDER`
///
/// Safe to call more than once; only the first call installs the logger.
pub fn init_logging() {
    let filter = filter_from_vars(env::process_vars());
    let _ = env_logger::Builder::new()
        .parse_filters(&filter)
        .target(env_logger::Target::Stderr)
        .try_init();
}
