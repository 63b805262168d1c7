//! Composite `<organization>/<name>` identifiers
//!
//! The legacy `<name>|<organization>` form is still accepted on read.
//! Both forms split on the first delimiter only, so name-like attributes are
//! checked with [`validate_segment`] before they can end up in an ID.

use crate::error::{Result, TfeError};

/// Canonical delimiter
pub const SEPARATOR: char = '/';

/// Delimiter of the legacy reversed form
pub const LEGACY_SEPARATOR: char = '|';

/// Build `<organization>/<name>`
pub fn pack(organization: &str, name: &str) -> Result<String> {
    if organization.is_empty() {
        return Err(TfeError::InvalidId(format!("{}{}", SEPARATOR, name)));
    }
    Ok(format!("{}{}{}", organization, SEPARATOR, name))
}

/// Split an identifier into `(organization, name)`
///
/// A pipe selects the legacy `<name>|<organization>` form; otherwise the
/// canonical slash form is expected.
pub fn unpack(id: &str) -> Result<(String, String)> {
    let (organization, name) = if let Some((name, organization)) = id.split_once(LEGACY_SEPARATOR)
    {
        (organization, name)
    } else if let Some((organization, name)) = id.split_once(SEPARATOR) {
        (organization, name)
    } else {
        return Err(TfeError::InvalidId(id.to_string()));
    };

    if organization.is_empty() || name.is_empty() {
        return Err(TfeError::InvalidId(id.to_string()));
    }
    Ok((organization.to_string(), name.to_string()))
}

/// Reject values that would make a composite identifier ambiguous
pub fn validate_segment(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(TfeError::Validation("name must not be empty".to_string()));
    }
    if value.contains(SEPARATOR) || value.contains(LEGACY_SEPARATOR) {
        return Err(TfeError::Validation(format!(
            "'{}' must not contain '{}' or '{}'",
            value, SEPARATOR, LEGACY_SEPARATOR
        )));
    }
    Ok(())
}
