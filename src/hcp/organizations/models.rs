//! Organization data models

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::hcp::traits::TfeResource;

/// Organization data from TFE API
///
/// The API uses the organization name as `id`; the stable opaque ID is
/// `external-id`.
#[derive(Deserialize, Debug, Clone)]
pub struct Organization {
    pub id: String,
    #[serde(rename = "type")]
    pub org_type: Option<String>,
    pub attributes: Option<OrganizationAttributes>,
}

/// Organization attributes from TFE API
#[derive(Deserialize, Debug, Clone, Default)]
pub struct OrganizationAttributes {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "external-id")]
    pub external_id: Option<String>,
    #[serde(rename = "session-timeout")]
    pub session_timeout: Option<u32>,
    #[serde(rename = "session-remember")]
    pub session_remember: Option<u32>,
    #[serde(rename = "collaborator-auth-policy")]
    pub collaborator_auth_policy: Option<String>,
    #[serde(rename = "cost-estimation-enabled")]
    pub cost_estimation_enabled: Option<bool>,
}

/// Writable organization attributes for create / update bodies
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct OrganizationWriteAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "session-timeout", skip_serializing_if = "Option::is_none")]
    pub session_timeout: Option<u32>,
    #[serde(rename = "session-remember", skip_serializing_if = "Option::is_none")]
    pub session_remember: Option<u32>,
    #[serde(
        rename = "collaborator-auth-policy",
        skip_serializing_if = "Option::is_none"
    )]
    pub collaborator_auth_policy: Option<String>,
    #[serde(
        rename = "cost-estimation-enabled",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost_estimation_enabled: Option<bool>,
}

impl Organization {
    fn attrs(&self) -> Option<&OrganizationAttributes> {
        self.attributes.as_ref()
    }

    /// Get email from attributes
    pub fn email(&self) -> &str {
        self.attrs().and_then(|a| a.email.as_deref()).unwrap_or("")
    }

    /// Get external ID from attributes
    pub fn external_id(&self) -> &str {
        self.attrs()
            .and_then(|a| a.external_id.as_deref())
            .unwrap_or("")
    }

    /// Terraform state object for this organization
    pub fn to_state(&self) -> Value {
        let a = self.attrs();
        json!({
            "id": self.id,
            "name": self.name(),
            "email": self.email(),
            "external_id": self.external_id(),
            "session_timeout_minutes": a.and_then(|a| a.session_timeout),
            "session_remember_minutes": a.and_then(|a| a.session_remember),
            "collaborator_auth_policy": a.and_then(|a| a.collaborator_auth_policy.clone()),
            "cost_estimation_enabled": a.and_then(|a| a.cost_estimation_enabled),
        })
    }
}

impl TfeResource for Organization {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        self.attrs()
            .and_then(|a| a.name.as_deref())
            .unwrap_or(&self.id)
    }

    /// Also match the `external-id`, so imports accept either form
    fn matches(&self, input: &str) -> bool {
        self.id() == input || self.name() == input || self.external_id() == input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_org() -> Organization {
        serde_json::from_value(json!({
            "id": "my-org",
            "type": "organizations",
            "attributes": {
                "name": "my-org",
                "email": "admin@example.com",
                "external-id": "org-ABC123",
                "session-timeout": 20160,
                "session-remember": 20160,
                "collaborator-auth-policy": "password",
                "cost-estimation-enabled": true
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_organization_matches_by_external_id() {
        let org = create_test_org();
        assert!(org.matches("my-org"));
        assert!(org.matches("org-ABC123"));
        assert!(!org.matches("org-999"));
    }

    #[test]
    fn test_organization_to_state() {
        let state = create_test_org().to_state();
        assert_eq!(state["id"], "my-org");
        assert_eq!(state["name"], "my-org");
        assert_eq!(state["external_id"], "org-ABC123");
        assert_eq!(state["session_timeout_minutes"], 20160);
        assert_eq!(state["collaborator_auth_policy"], "password");
        assert_eq!(state["cost_estimation_enabled"], true);
    }

    #[test]
    fn test_organization_deserialization_minimal() {
        let org: Organization = serde_json::from_str(r#"{"id": "minimal-org"}"#).unwrap();
        assert_eq!(org.name(), "minimal-org");
        assert_eq!(org.email(), "");
        let state = org.to_state();
        assert_eq!(state["session_timeout_minutes"], Value::Null);
    }

    #[test]
    fn test_write_attributes_skip_unset() {
        let attrs = OrganizationWriteAttributes {
            name: Some("my-org".to_string()),
            session_timeout: Some(60),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&attrs).unwrap(),
            json!({"name": "my-org", "session-timeout": 60})
        );
    }
}
