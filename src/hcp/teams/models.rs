//! Team data models

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::hcp::traits::TfeResource;

/// Team data from TFE API
#[derive(Deserialize, Debug, Clone)]
pub struct Team {
    pub id: String,
    #[serde(rename = "type")]
    pub team_type: Option<String>,
    pub attributes: Option<TeamAttributes>,
}

/// Team attributes from TFE API
#[derive(Deserialize, Debug, Clone)]
pub struct TeamAttributes {
    pub name: Option<String>,
    #[serde(rename = "sso-team-id")]
    pub sso_team_id: Option<String>,
    #[serde(rename = "users-count")]
    pub users_count: Option<u32>,
    pub visibility: Option<String>,
    #[serde(rename = "allow-member-token-management")]
    pub allow_member_token_management: Option<bool>,
}

/// Writable team attributes
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct TeamWriteAttributes {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(rename = "sso-team-id", skip_serializing_if = "Option::is_none")]
    pub sso_team_id: Option<String>,
    #[serde(
        rename = "allow-member-token-management",
        skip_serializing_if = "Option::is_none"
    )]
    pub allow_member_token_management: Option<bool>,
}

impl TfeResource for Team {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        self.attributes
            .as_ref()
            .and_then(|a| a.name.as_deref())
            .unwrap_or("")
    }
}

impl Team {
    /// Get users count from attributes
    pub fn users_count(&self) -> u32 {
        self.attributes
            .as_ref()
            .and_then(|a| a.users_count)
            .unwrap_or(0)
    }

    /// Get visibility from attributes
    pub fn visibility(&self) -> &str {
        self.attributes
            .as_ref()
            .and_then(|a| a.visibility.as_deref())
            .unwrap_or("secret")
    }

    /// Get SSO team ID from attributes
    pub fn sso_team_id(&self) -> Option<&str> {
        self.attributes
            .as_ref()
            .and_then(|a| a.sso_team_id.as_deref())
    }

    pub fn allow_member_token_management(&self) -> bool {
        self.attributes
            .as_ref()
            .and_then(|a| a.allow_member_token_management)
            .unwrap_or(true)
    }

    /// Resource state; teams carry no organization relationship, so the caller supplies it
    pub fn to_state(&self, organization: &str) -> Value {
        json!({
            "id": self.id,
            "name": self.name(),
            "organization": organization,
            "visibility": self.visibility(),
            "sso_team_id": self.sso_team_id(),
            "allow_member_token_management": self.allow_member_token_management(),
        })
    }
}
