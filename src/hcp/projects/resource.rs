//! `tfe_project` resource and data source

use async_trait::async_trait;
use log::debug;
use serde_json::Value;

use crate::error::{Result, TfeError};
use crate::provider::ids;
use crate::provider::router::{CallContext, DataSourceHandler, ResourceHandler};
use crate::provider::state::{
    fill_default_organization, get_str, organization_or_default, required_str, validate_segments,
};
use crate::provider::types::{
    plan_from_schema, ApplyRequest, Attribute, AttributeKind, Diagnostic, ImportRequest,
    PlanRequest, PlanResponse, ReadRequest, Schema,
};

use super::models::ProjectWriteAttributes;

const PROJECT_ID_PREFIX: &str = "prj-";

fn write_attributes(config: &Value) -> Result<ProjectWriteAttributes> {
    Ok(ProjectWriteAttributes {
        name: required_str(config, "name")?.to_string(),
        description: get_str(config, "description").map(str::to_string),
    })
}

pub struct ProjectResource;

#[async_trait]
impl ResourceHandler for ProjectResource {
    fn schema(&self) -> Schema {
        Schema::new(0)
            .attr(Attribute::computed("id", AttributeKind::String))
            .attr(Attribute::required("name", AttributeKind::String))
            .attr(Attribute::optional_computed("organization", AttributeKind::String).force_new())
            .attr(Attribute::optional("description", AttributeKind::String))
    }

    async fn validate_config(
        &self,
        _ctx: &CallContext<'_>,
        config: &Value,
    ) -> Result<Vec<Diagnostic>> {
        let mut diags = self.schema().validate(config);
        diags.extend(validate_segments(config, &["name", "organization"]));
        Ok(diags)
    }

    async fn read(&self, ctx: &CallContext<'_>, request: ReadRequest) -> Result<Option<Value>> {
        let client = ctx.client()?;
        let id = required_str(&request.current_state, "id")?;

        match client.get_project_by_id(id).await? {
            Some(project) => {
                let org = organization_or_default(&request.current_state, ctx).unwrap_or_default();
                Ok(Some(project.to_state(&org)))
            }
            None => {
                debug!("Project {} no longer exists, removing from state", id);
                Ok(None)
            }
        }
    }

    async fn plan(&self, ctx: &CallContext<'_>, mut request: PlanRequest) -> Result<PlanResponse> {
        if let Some(ref mut proposed) = request.proposed_state {
            fill_default_organization(proposed, ctx);
        }
        plan_from_schema(&self.schema(), request)
    }

    async fn apply(&self, ctx: &CallContext<'_>, request: ApplyRequest) -> Result<Option<Value>> {
        let client = ctx.client()?;

        match (request.prior_state, request.planned_state) {
            (None, None) => Ok(None),
            (Some(prior), None) => {
                client.delete_project(required_str(&prior, "id")?).await?;
                Ok(None)
            }
            (None, Some(planned)) => {
                let org = organization_or_default(&planned, ctx)?;
                let project = client
                    .create_project(&org, write_attributes(&planned)?)
                    .await?;
                Ok(Some(project.to_state(&org)))
            }
            (Some(prior), Some(planned)) => {
                let org = organization_or_default(&prior, ctx)?;
                let project = client
                    .update_project(required_str(&prior, "id")?, write_attributes(&planned)?)
                    .await?;
                Ok(Some(project.to_state(&org)))
            }
        }
    }

    /// Import by `prj-` ID or `<org>/<name>`
    async fn import(&self, ctx: &CallContext<'_>, request: ImportRequest) -> Result<Vec<Value>> {
        let client = ctx.client()?;

        let (project, org) = if request.id.starts_with(PROJECT_ID_PREFIX) {
            let project = client
                .get_project_by_id(&request.id)
                .await?
                .ok_or_else(|| TfeError::not_found("project", &request.id))?;
            let org = ctx.default_organization().unwrap_or_default().to_string();
            (project, org)
        } else {
            let (org, name) = ids::unpack(&request.id)?;
            (client.find_project_by_name(&org, &name).await?, org)
        };
        Ok(vec![project.to_state(&org)])
    }
}

/// Project lookup by name within an organization
pub struct ProjectDataSource;

#[async_trait]
impl DataSourceHandler for ProjectDataSource {
    fn schema(&self) -> Schema {
        Schema::new(0)
            .attr(Attribute::computed("id", AttributeKind::String))
            .attr(Attribute::required("name", AttributeKind::String))
            .attr(Attribute::optional_computed("organization", AttributeKind::String))
            .attr(Attribute::computed("description", AttributeKind::String))
    }

    async fn read(&self, ctx: &CallContext<'_>, config: Value) -> Result<Value> {
        let client = ctx.client()?;
        let org = organization_or_default(&config, ctx)?;
        let name = required_str(&config, "name")?;

        let project = client.find_project_by_name(&org, name).await?;
        Ok(project.to_state(&org))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hcp::TfeClient;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn project_doc(id: &str, name: &str) -> Value {
        json!({"id": id, "type": "projects", "attributes": {"name": name, "description": "d"}})
    }

    #[tokio::test]
    async fn test_project_lifecycle() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());
        let ctx = CallContext::new(&client).with_default_organization(Some("my-org"));

        Mock::given(method("POST"))
            .and(path("/organizations/my-org/projects"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"data": project_doc("prj-1", "core")})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("PATCH"))
            .and(path("/projects/prj-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": project_doc("prj-1", "core-2")})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/projects/prj-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let created = ProjectResource
            .apply(
                &ctx,
                ApplyRequest {
                    prior_state: None,
                    planned_state: Some(json!({"name": "core"})),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created["id"], "prj-1");
        assert_eq!(created["organization"], "my-org");

        let updated = ProjectResource
            .apply(
                &ctx,
                ApplyRequest {
                    prior_state: Some(created.clone()),
                    planned_state: Some(json!({"name": "core-2"})),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["name"], "core-2");

        let deleted = ProjectResource
            .apply(
                &ctx,
                ApplyRequest {
                    prior_state: Some(updated),
                    planned_state: None,
                },
            )
            .await
            .unwrap();
        assert!(deleted.is_none());
    }

    #[tokio::test]
    async fn test_import_by_id_and_name() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());
        let ctx = CallContext::new(&client);

        Mock::given(method("GET"))
            .and(path("/projects/prj-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": project_doc("prj-1", "core")})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/organizations/my-org/projects"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": [project_doc("prj-1", "core")]})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let by_id = ProjectResource
            .import(&ctx, ImportRequest { id: "prj-1".to_string() })
            .await
            .unwrap();
        assert_eq!(by_id[0]["name"], "core");

        let by_name = ProjectResource
            .import(&ctx, ImportRequest { id: "my-org/core".to_string() })
            .await
            .unwrap();
        assert_eq!(by_name[0]["id"], "prj-1");
        assert_eq!(by_name[0]["organization"], "my-org");
    }

    #[tokio::test]
    async fn test_read_removed_project() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/projects/prj-gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let state = ProjectResource
            .read(
                &CallContext::new(&client),
                ReadRequest {
                    current_state: json!({"id": "prj-gone"}),
                },
            )
            .await
            .unwrap();
        assert!(state.is_none());
    }

    #[tokio::test]
    async fn test_data_source_not_found() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/organizations/my-org/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&mock_server)
            .await;

        let err = ProjectDataSource
            .read(
                &CallContext::new(&client),
                json!({"name": "ghost", "organization": "my-org"}),
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
