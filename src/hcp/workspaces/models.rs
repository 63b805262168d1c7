//! Workspace data models

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::hcp::traits::{RelationshipRef, TfeResource};

/// Workspace data from TFE API
#[derive(Deserialize, Debug, Clone)]
pub struct Workspace {
    pub id: String,
    pub attributes: WorkspaceAttributes,
    pub relationships: Option<WorkspaceRelationships>,
}

/// Workspace relationships from TFE API
#[derive(Deserialize, Debug, Clone)]
pub struct WorkspaceRelationships {
    pub project: Option<RelationshipData>,
    pub organization: Option<RelationshipData>,
}

/// Generic relationship data
#[derive(Deserialize, Debug, Clone)]
pub struct RelationshipData {
    pub data: Option<RelationshipId>,
}

/// Relationship ID reference
#[derive(Deserialize, Debug, Clone)]
pub struct RelationshipId {
    pub id: String,
    #[serde(rename = "type")]
    pub rel_type: Option<String>,
}

/// Workspace attributes from TFE API
#[derive(Deserialize, Debug, Clone)]
pub struct WorkspaceAttributes {
    pub name: String,

    pub description: Option<String>,

    #[serde(rename = "execution-mode")]
    pub execution_mode: Option<String>,

    #[serde(rename = "auto-apply")]
    pub auto_apply: Option<bool>,

    #[serde(rename = "terraform-version")]
    pub terraform_version: Option<String>,

    #[serde(rename = "working-directory")]
    pub working_directory: Option<String>,

    #[serde(rename = "allow-destroy-plan")]
    pub allow_destroy_plan: Option<bool>,

    #[serde(rename = "queue-all-runs")]
    pub queue_all_runs: Option<bool>,

    #[serde(rename = "speculative-enabled")]
    pub speculative_enabled: Option<bool>,

    #[serde(rename = "tag-names", default)]
    pub tag_names: Vec<String>,

    #[serde(rename = "resource-count")]
    pub resource_count: Option<u32>,
}

impl TfeResource for Workspace {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.attributes.name
    }
}

impl Workspace {
    /// Get resource count, defaulting to 0 if not available
    pub fn resource_count(&self) -> u32 {
        self.attributes.resource_count.unwrap_or(0)
    }

    /// Get project ID if available
    pub fn project_id(&self) -> Option<&str> {
        self.relationships
            .as_ref()
            .and_then(|r| r.project.as_ref())
            .and_then(|p| p.data.as_ref())
            .map(|d| d.id.as_str())
    }

    /// Get organization name if available (from relationships)
    pub fn organization_name(&self) -> Option<&str> {
        self.relationships
            .as_ref()
            .and_then(|r| r.organization.as_ref())
            .and_then(|o| o.data.as_ref())
            .map(|d| d.id.as_str())
    }

    /// Resource state; `organization` is used when the response omits the relationship
    pub fn to_state(&self, organization: &str) -> Value {
        let a = &self.attributes;
        json!({
            "id": self.id,
            "name": a.name,
            "organization": self.organization_name().unwrap_or(organization),
            "description": a.description.clone().unwrap_or_default(),
            "project_id": self.project_id(),
            "execution_mode": a.execution_mode,
            "auto_apply": a.auto_apply.unwrap_or(false),
            "terraform_version": a.terraform_version,
            "working_directory": a.working_directory.clone().unwrap_or_default(),
            "allow_destroy_plan": a.allow_destroy_plan.unwrap_or(true),
            "queue_all_runs": a.queue_all_runs.unwrap_or(true),
            "speculative_enabled": a.speculative_enabled.unwrap_or(true),
            "tag_names": a.tag_names,
            "resource_count": self.resource_count(),
        })
    }
}

/// Writable workspace attributes for create / update bodies
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct WorkspaceWriteAttributes {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "execution-mode", skip_serializing_if = "Option::is_none")]
    pub execution_mode: Option<String>,
    #[serde(rename = "auto-apply", skip_serializing_if = "Option::is_none")]
    pub auto_apply: Option<bool>,
    #[serde(rename = "terraform-version", skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,
    #[serde(rename = "working-directory", skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
    #[serde(rename = "allow-destroy-plan", skip_serializing_if = "Option::is_none")]
    pub allow_destroy_plan: Option<bool>,
    #[serde(rename = "queue-all-runs", skip_serializing_if = "Option::is_none")]
    pub queue_all_runs: Option<bool>,
    #[serde(rename = "speculative-enabled", skip_serializing_if = "Option::is_none")]
    pub speculative_enabled: Option<bool>,
    #[serde(rename = "tag-names", skip_serializing_if = "Option::is_none")]
    pub tag_names: Option<Vec<String>>,
}

/// Relationships member of a workspace write body
#[derive(Serialize, Debug, Clone)]
pub struct WorkspaceWriteRelationships {
    pub project: RelationshipRef,
}

/// How a workspace is addressed by an import ID or lookup
#[derive(Debug, Clone, PartialEq)]
pub enum WorkspaceTarget {
    /// Workspace ID (ws-xxx)
    Id(String),
    /// Organization and workspace name
    Name { organization: String, name: String },
}
