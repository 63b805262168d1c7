//! Agent pool data models

use serde::Deserialize;
use serde_json::{json, Value};

use crate::hcp::traits::TfeResource;

/// Agent pool data from TFE API
#[derive(Deserialize, Debug, Clone)]
pub struct AgentPool {
    pub id: String,
    pub attributes: AgentPoolAttributes,
}

/// Agent pool attributes from TFE API
#[derive(Deserialize, Debug, Clone)]
pub struct AgentPoolAttributes {
    pub name: String,
    #[serde(rename = "organization-scoped")]
    pub organization_scoped: Option<bool>,
    #[serde(rename = "agent-count")]
    pub agent_count: Option<u32>,
}

impl TfeResource for AgentPool {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.attributes.name
    }
}

impl AgentPool {
    pub fn to_state(&self, organization: &str) -> Value {
        json!({
            "id": self.id,
            "name": self.attributes.name,
            "organization": organization,
            "organization_scoped": self.attributes.organization_scoped.unwrap_or(true),
            "agent_count": self.attributes.agent_count.unwrap_or(0),
        })
    }
}
