//! Attribute accessors over configuration / state objects

use serde_json::Value;

use crate::error::{Result, TfeError};
use crate::provider::ids;
use crate::provider::router::CallContext;
use crate::provider::types::Diagnostic;

/// String attribute, `None` when absent or null
pub fn get_str<'a>(state: &'a Value, key: &str) -> Option<&'a str> {
    state.get(key).and_then(Value::as_str)
}

/// Non-empty string attribute or a validation error naming it
pub fn required_str<'a>(state: &'a Value, key: &str) -> Result<&'a str> {
    get_str(state, key)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| TfeError::Validation(format!("missing required attribute '{}'", key)))
}

pub fn get_bool(state: &Value, key: &str) -> Option<bool> {
    state.get(key).and_then(Value::as_bool)
}

pub fn get_u32(state: &Value, key: &str) -> Option<u32> {
    state
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

/// List-of-strings attribute; non-string elements are skipped
pub fn get_string_list(state: &Value, key: &str) -> Option<Vec<String>> {
    state.get(key).and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    })
}

/// `organization` attribute, falling back to the provider default
pub fn organization_or_default(state: &Value, ctx: &CallContext<'_>) -> Result<String> {
    get_str(state, "organization")
        .filter(|s| !s.is_empty())
        .or_else(|| ctx.default_organization())
        .map(str::to_string)
        .ok_or_else(|| {
            TfeError::Config(
                "no organization was specified on the resource or provider".to_string(),
            )
        })
}

/// Write the provider default organization into an unset `organization`
pub fn fill_default_organization(state: &mut Value, ctx: &CallContext<'_>) {
    let Some(default) = ctx.default_organization() else {
        return;
    };
    if let Some(object) = state.as_object_mut() {
        let unset = object.get("organization").map_or(true, Value::is_null);
        if unset {
            object.insert("organization".to_string(), Value::String(default.to_string()));
        }
    }
}

/// Diagnostics for name-like attributes that must stay ID-safe
pub fn validate_segments(config: &Value, keys: &[&str]) -> Vec<Diagnostic> {
    keys.iter()
        .filter_map(|key| {
            let value = get_str(config, key)?;
            ids::validate_segment(value)
                .err()
                .map(|e| Diagnostic::error("Invalid name", &e.to_string()).at(key))
        })
        .collect()
}
