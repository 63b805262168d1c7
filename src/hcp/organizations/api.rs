//! Organization API operations

use reqwest::Method;

use crate::config::api;
use crate::error::Result;
use crate::hcp::traits::{ApiDocument, ResourceObject};
use crate::hcp::TfeClient;

use super::models::{Organization, OrganizationWriteAttributes};

fn organization_path(name: &str) -> String {
    format!("/{}/{}", api::ORGANIZATIONS, urlencoding::encode(name))
}

impl TfeClient {
    /// Get a single organization by name, `None` if it does not exist
    pub async fn get_organization(&self, name: &str) -> Result<Option<Organization>> {
        self.fetch_resource_by_path(
            &organization_path(name),
            &format!("organization '{}'", name),
        )
        .await
    }

    /// Create an organization
    pub async fn create_organization(
        &self,
        attributes: OrganizationWriteAttributes,
    ) -> Result<Organization> {
        let label = format!(
            "organization '{}'",
            attributes.name.as_deref().unwrap_or_default()
        );
        let body = ApiDocument::new(ResourceObject::new(api::ORGANIZATIONS, attributes));
        self.send_document(
            Method::POST,
            &format!("/{}", api::ORGANIZATIONS),
            &body,
            &label,
        )
        .await
    }

    /// Update the organization currently named `name` (renames included)
    pub async fn update_organization(
        &self,
        name: &str,
        attributes: OrganizationWriteAttributes,
    ) -> Result<Organization> {
        let body = ApiDocument::new(ResourceObject::new(api::ORGANIZATIONS, attributes));
        self.send_document(
            Method::PATCH,
            &organization_path(name),
            &body,
            &format!("organization '{}'", name),
        )
        .await
    }

    pub async fn delete_organization(&self, name: &str) -> Result<()> {
        self.delete_resource(
            &organization_path(name),
            &format!("organization '{}'", name),
        )
        .await
    }
}
