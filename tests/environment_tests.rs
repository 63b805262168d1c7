//! Process environment handling with entries that are not valid UTF-8
//!
//! Kept in its own test binary because it mutates the process environment.

#![cfg(unix)]

use serde_json::json;
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;

use tfe_provider::config::env;
use tfe_provider::{ProviderConfig, TokenResolver};

const BROKEN_VAR: &str = "TFE_PROVIDER_TEST_BROKEN_BYTES";

fn set_broken_var() {
    std::env::set_var(BROKEN_VAR, OsStr::from_bytes(&[0x66, 0xff, 0x6f]));
}

#[test]
fn test_non_utf8_variable_is_skipped_everywhere() {
    set_broken_var();

    let vars = env::process_vars();
    assert!(vars.iter().all(|(name, _)| name != BROKEN_VAR));

    let resolved = std::panic::catch_unwind(|| {
        TokenResolver::new("tfe-provider-test.invalid").resolve()
    });
    assert!(resolved.is_ok());

    let config = ProviderConfig::from_value(&json!({
        "hostname": "tfe.example.com",
        "organization": "my-org"
    }))
    .unwrap();
    assert_eq!(config.hostname, "tfe.example.com");
    assert_eq!(config.organization.as_deref(), Some("my-org"));

    let _ = tfe_provider::CliConfig::load();
    tfe_provider::init_logging();
}
