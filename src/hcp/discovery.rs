//! Remote service discovery (`/.well-known/terraform.json`)

use log::debug;
use reqwest::Client;
use std::collections::HashMap;

use crate::config::api;
use crate::error::{Result, TfeError};

/// Look up the `tfe.v2` API base URL advertised by a host
///
/// `origin` is the scheme and authority (`https://app.terraform.io`). A
/// relative service path is resolved against it. Returns `None` when the
/// host does not advertise the service.
pub async fn discover_tfe_base_url(client: &Client, origin: &str) -> Result<Option<String>> {
    let origin = origin.trim_end_matches('/');
    let url = format!("{}{}", origin, api::DISCOVERY_PATH);
    debug!("Discovering services from: {}", url);

    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        return Err(TfeError::Api {
            status: response.status().as_u16(),
            message: format!("Failed to discover services at {}", url),
        });
    }

    let services: HashMap<String, serde_json::Value> = response.json().await?;
    let Some(service) = services.get(api::SERVICE_ID).and_then(|v| v.as_str()) else {
        debug!("Host {} does not advertise {}", origin, api::SERVICE_ID);
        return Ok(None);
    };

    let base = url::Url::parse(&format!("{}/", origin))
        .and_then(|base| base.join(service))
        .map_err(|e| {
            TfeError::Config(format!(
                "invalid {} service URL '{}': {}",
                api::SERVICE_ID,
                service,
                e
            ))
        })?;

    Ok(Some(base.to_string()))
}
