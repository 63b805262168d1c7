//! Project data models

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::hcp::traits::TfeResource;

/// Project data from TFE API
#[derive(Deserialize, Debug, Clone)]
pub struct Project {
    pub id: String,
    #[serde(rename = "type")]
    pub project_type: Option<String>,
    pub attributes: ProjectAttributes,
    pub relationships: Option<ProjectRelationships>,
}

/// Project attributes from TFE API
#[derive(Deserialize, Debug, Clone)]
pub struct ProjectAttributes {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ProjectRelationships {
    pub organization: Option<OrganizationRelationship>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct OrganizationRelationship {
    pub data: Option<OrganizationRef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct OrganizationRef {
    pub id: String,
}

/// Writable project attributes
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ProjectWriteAttributes {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TfeResource for Project {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.attributes.name
    }
}

impl Project {
    /// Get the project description
    pub fn description(&self) -> &str {
        self.attributes.description.as_deref().unwrap_or("")
    }

    pub fn organization_name(&self) -> Option<&str> {
        self.relationships
            .as_ref()
            .and_then(|r| r.organization.as_ref())
            .and_then(|o| o.data.as_ref())
            .map(|d| d.id.as_str())
    }

    /// State object; `organization` is used when the response omits the relationship
    pub fn to_state(&self, organization: &str) -> Value {
        json!({
            "id": self.id,
            "name": self.name(),
            "organization": self.organization_name().unwrap_or(organization),
            "description": self.description(),
        })
    }
}
