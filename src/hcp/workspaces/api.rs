//! Workspace API operations

use log::debug;
use reqwest::Method;

use crate::config::api;
use crate::error::Result;
use crate::hcp::traits::{ApiDocument, RelationshipRef, ResourceObject};
use crate::hcp::TfeClient;

use super::models::{
    Workspace, WorkspaceTarget, WorkspaceWriteAttributes, WorkspaceWriteRelationships,
};

/// Query options for listing workspaces
#[derive(Default)]
pub struct WorkspaceQuery<'a> {
    /// Filter by workspace name (fuzzy server-side search)
    pub search: Option<&'a str>,
    /// Filter by project ID
    pub project_id: Option<&'a str>,
}

fn org_workspaces_path(org: &str) -> String {
    format!(
        "/{}/{}/{}",
        api::ORGANIZATIONS,
        urlencoding::encode(org),
        api::WORKSPACES
    )
}

fn workspace_path(workspace_id: &str) -> String {
    format!("/{}/{}", api::WORKSPACES, urlencoding::encode(workspace_id))
}

/// Build the API path for workspaces with optional query params
fn build_workspaces_path(org: &str, query: &WorkspaceQuery<'_>) -> String {
    let mut path = org_workspaces_path(org);

    let mut query_parts = Vec::new();
    if let Some(s) = query.search {
        query_parts.push(format!("search[name]={}", urlencoding::encode(s)));
    }
    if let Some(prj) = query.project_id {
        query_parts.push(format!("filter[project][id]={}", urlencoding::encode(prj)));
    }

    if !query_parts.is_empty() {
        path.push('?');
        path.push_str(&query_parts.join("&"));
    }

    path
}

fn write_body(
    attributes: WorkspaceWriteAttributes,
    project_id: Option<&str>,
) -> ApiDocument<ResourceObject<WorkspaceWriteAttributes, WorkspaceWriteRelationships>> {
    let relationships = project_id.map(|id| WorkspaceWriteRelationships {
        project: RelationshipRef::new(api::PROJECTS, id),
    });
    ApiDocument::new(
        ResourceObject::new(api::WORKSPACES, attributes).with_relationships(relationships),
    )
}

impl TfeClient {
    /// Get every workspace of an organization matching the query
    pub async fn get_workspaces(
        &self,
        org: &str,
        query: WorkspaceQuery<'_>,
    ) -> Result<Vec<Workspace>> {
        let path = build_workspaces_path(org, &query);

        let error_context = format!(
            "workspaces for organization '{}' (search: {:?}, project: {:?})",
            org, query.search, query.project_id
        );

        self.list_all(&path, &error_context).await
    }

    /// Get a single workspace by ID (direct API call, no org needed)
    pub async fn get_workspace_by_id(&self, workspace_id: &str) -> Result<Option<Workspace>> {
        self.fetch_resource_by_path(
            &workspace_path(workspace_id),
            &format!("workspace '{}'", workspace_id),
        )
        .await
    }

    /// Get a single workspace by name (requires org)
    pub async fn get_workspace_by_name(&self, org: &str, name: &str) -> Result<Option<Workspace>> {
        let path = format!(
            "{}/{}",
            org_workspaces_path(org),
            urlencoding::encode(name)
        );
        self.fetch_resource_by_path(&path, &format!("workspace '{}/{}'", org, name))
            .await
    }

    /// Look up a workspace by ID or by organization and name
    pub async fn resolve_workspace(&self, target: &WorkspaceTarget) -> Result<Option<Workspace>> {
        match target {
            WorkspaceTarget::Id(id) => self.get_workspace_by_id(id).await,
            WorkspaceTarget::Name { organization, name } => {
                self.get_workspace_by_name(organization, name).await
            }
        }
    }

    pub async fn create_workspace(
        &self,
        org: &str,
        attributes: WorkspaceWriteAttributes,
        project_id: Option<&str>,
    ) -> Result<Workspace> {
        let label = format!("workspace '{}/{}'", org, attributes.name);
        debug!("Creating {}", label);
        let body = write_body(attributes, project_id);
        self.send_document(Method::POST, &org_workspaces_path(org), &body, &label)
            .await
    }

    pub async fn update_workspace(
        &self,
        workspace_id: &str,
        attributes: WorkspaceWriteAttributes,
        project_id: Option<&str>,
    ) -> Result<Workspace> {
        let label = format!("workspace '{}'", workspace_id);
        let body = write_body(attributes, project_id);
        self.send_document(Method::PATCH, &workspace_path(workspace_id), &body, &label)
            .await
    }

    pub async fn delete_workspace(&self, workspace_id: &str) -> Result<()> {
        self.delete_resource(
            &workspace_path(workspace_id),
            &format!("workspace '{}'", workspace_id),
        )
        .await
    }
}
