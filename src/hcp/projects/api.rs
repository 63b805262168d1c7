//! Project API operations

use log::debug;
use reqwest::Method;

use crate::config::api;
use crate::error::Result;
use crate::hcp::traits::{ApiDocument, ResourceObject, TfeResource};
use crate::hcp::TfeClient;

use super::models::{Project, ProjectWriteAttributes};

fn org_projects_path(org: &str) -> String {
    format!(
        "/{}/{}/{}",
        api::ORGANIZATIONS,
        urlencoding::encode(org),
        api::PROJECTS
    )
}

fn project_path(project_id: &str) -> String {
    format!("/{}/{}", api::PROJECTS, urlencoding::encode(project_id))
}

impl TfeClient {
    /// Get a single project by ID (direct API call, no org needed)
    pub async fn get_project_by_id(&self, project_id: &str) -> Result<Option<Project>> {
        self.fetch_resource_by_path(
            &project_path(project_id),
            &format!("project '{}'", project_id),
        )
        .await
    }

    /// Find a project by exact name, walking the organization's project pages
    ///
    /// `filter[names]` narrows the listing; the name is still compared
    /// locally since the server filter is not guaranteed to be exact.
    pub async fn find_project_by_name(&self, org: &str, name: &str) -> Result<Project> {
        debug!("Fetching project by name '{}' in org '{}'", name, org);
        let path = format!(
            "{}?filter[names]={}",
            org_projects_path(org),
            urlencoding::encode(name)
        );
        self.find_in_list(
            &path,
            |p: &Project| p.name() == name,
            "project",
            &format!("{}/{}", org, name),
        )
        .await
    }

    pub async fn create_project(
        &self,
        org: &str,
        attributes: ProjectWriteAttributes,
    ) -> Result<Project> {
        let label = format!("project '{}/{}'", org, attributes.name);
        let body = ApiDocument::new(ResourceObject::new(api::PROJECTS, attributes));
        self.send_document(Method::POST, &org_projects_path(org), &body, &label)
            .await
    }

    pub async fn update_project(
        &self,
        project_id: &str,
        attributes: ProjectWriteAttributes,
    ) -> Result<Project> {
        let body = ApiDocument::new(ResourceObject::new(api::PROJECTS, attributes));
        self.send_document(
            Method::PATCH,
            &project_path(project_id),
            &body,
            &format!("project '{}'", project_id),
        )
        .await
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<()> {
        self.delete_resource(
            &project_path(project_id),
            &format!("project '{}'", project_id),
        )
        .await
    }
}
