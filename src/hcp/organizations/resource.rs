//! `tfe_organization` resource and data source

use async_trait::async_trait;
use log::debug;
use serde_json::Value;

use crate::error::{Result, TfeError};
use crate::provider::router::{CallContext, DataSourceHandler, ResourceHandler};
use crate::provider::state::{
    get_bool, get_str, get_u32, organization_or_default, required_str, validate_segments,
};
use crate::provider::types::{
    ApplyRequest, Attribute, AttributeKind, Diagnostic, ImportRequest, ReadRequest, Schema,
};

use super::models::OrganizationWriteAttributes;

fn write_attributes(config: &Value) -> Result<OrganizationWriteAttributes> {
    Ok(OrganizationWriteAttributes {
        name: Some(required_str(config, "name")?.to_string()),
        email: get_str(config, "email").map(str::to_string),
        session_timeout: get_u32(config, "session_timeout_minutes"),
        session_remember: get_u32(config, "session_remember_minutes"),
        collaborator_auth_policy: get_str(config, "collaborator_auth_policy").map(str::to_string),
        cost_estimation_enabled: get_bool(config, "cost_estimation_enabled"),
    })
}

/// Managed organization; its ID is the organization name
pub struct OrganizationResource;

#[async_trait]
impl ResourceHandler for OrganizationResource {
    fn schema(&self) -> Schema {
        Schema::new(0)
            .attr(Attribute::computed("id", AttributeKind::String))
            .attr(Attribute::required("name", AttributeKind::String))
            .attr(Attribute::required("email", AttributeKind::String))
            .attr(Attribute::optional_computed(
                "session_timeout_minutes",
                AttributeKind::Number,
            ))
            .attr(Attribute::optional_computed(
                "session_remember_minutes",
                AttributeKind::Number,
            ))
            .attr(Attribute::optional_computed(
                "collaborator_auth_policy",
                AttributeKind::String,
            ))
            .attr(Attribute::optional_computed(
                "cost_estimation_enabled",
                AttributeKind::Bool,
            ))
            .attr(Attribute::computed("external_id", AttributeKind::String))
    }

    async fn validate_config(
        &self,
        _ctx: &CallContext<'_>,
        config: &Value,
    ) -> Result<Vec<Diagnostic>> {
        let mut diags = self.schema().validate(config);
        diags.extend(validate_segments(config, &["name"]));
        Ok(diags)
    }

    async fn read(&self, ctx: &CallContext<'_>, request: ReadRequest) -> Result<Option<Value>> {
        let client = ctx.client()?;
        let name = get_str(&request.current_state, "id")
            .or_else(|| get_str(&request.current_state, "name"))
            .ok_or_else(|| TfeError::Validation("organization state has no id".to_string()))?;

        match client.get_organization(name).await? {
            Some(org) => Ok(Some(org.to_state())),
            None => {
                debug!("Organization {} no longer exists, removing from state", name);
                Ok(None)
            }
        }
    }

    async fn apply(&self, ctx: &CallContext<'_>, request: ApplyRequest) -> Result<Option<Value>> {
        let client = ctx.client()?;

        match (request.prior_state, request.planned_state) {
            (None, None) => Ok(None),
            (Some(prior), None) => {
                let name = required_str(&prior, "id")?;
                debug!("Delete organization: {}", name);
                client.delete_organization(name).await?;
                Ok(None)
            }
            (None, Some(planned)) => {
                let attributes = write_attributes(&planned)?;
                debug!("Create organization: {:?}", attributes.name);
                let org = client.create_organization(attributes).await?;
                Ok(Some(org.to_state()))
            }
            (Some(prior), Some(planned)) => {
                let current = required_str(&prior, "id")?;
                let attributes = write_attributes(&planned)?;
                debug!("Update organization: {}", current);
                let org = client.update_organization(current, attributes).await?;
                Ok(Some(org.to_state()))
            }
        }
    }

    async fn import(&self, ctx: &CallContext<'_>, request: ImportRequest) -> Result<Vec<Value>> {
        let client = ctx.client()?;
        let org = client
            .get_organization(&request.id)
            .await?
            .ok_or_else(|| TfeError::not_found("organization", &request.id))?;
        Ok(vec![org.to_state()])
    }
}

/// Organization lookup by name (defaults to the provider organization)
pub struct OrganizationDataSource;

#[async_trait]
impl DataSourceHandler for OrganizationDataSource {
    fn schema(&self) -> Schema {
        Schema::new(0)
            .attr(Attribute::computed("id", AttributeKind::String))
            .attr(Attribute::optional_computed("name", AttributeKind::String))
            .attr(Attribute::computed("email", AttributeKind::String))
            .attr(Attribute::computed("external_id", AttributeKind::String))
            .attr(Attribute::computed("session_timeout_minutes", AttributeKind::Number))
            .attr(Attribute::computed("session_remember_minutes", AttributeKind::Number))
            .attr(Attribute::computed("collaborator_auth_policy", AttributeKind::String))
            .attr(Attribute::computed("cost_estimation_enabled", AttributeKind::Bool))
    }

    async fn read(&self, ctx: &CallContext<'_>, config: Value) -> Result<Value> {
        let client = ctx.client()?;
        let name = match get_str(&config, "name").filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => organization_or_default(&Value::Null, ctx)?,
        };

        let org = client
            .get_organization(&name)
            .await?
            .ok_or_else(|| TfeError::not_found("organization", &name))?;
        Ok(org.to_state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hcp::TfeClient;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn org_doc(name: &str) -> Value {
        json!({
            "data": {
                "id": name,
                "type": "organizations",
                "attributes": {
                    "name": name,
                    "email": "ops@example.com",
                    "external-id": "org-XYZ",
                    "session-timeout": 20160,
                    "session-remember": 20160,
                    "collaborator-auth-policy": "password",
                    "cost-estimation-enabled": false
                }
            }
        })
    }

    #[tokio::test]
    async fn test_create_then_rename() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());
        let ctx = CallContext::new(&client);

        Mock::given(method("POST"))
            .and(path("/organizations"))
            .and(body_partial_json(json!({
                "data": {"attributes": {"name": "acme", "session-timeout": 60}}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(org_doc("acme")))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("PATCH"))
            .and(path("/organizations/acme"))
            .and(body_partial_json(json!({"data": {"attributes": {"name": "acme-2"}}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(org_doc("acme-2")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let created = OrganizationResource
            .apply(
                &ctx,
                ApplyRequest {
                    prior_state: None,
                    planned_state: Some(json!({
                        "name": "acme",
                        "email": "ops@example.com",
                        "session_timeout_minutes": 60
                    })),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created["id"], "acme");
        assert_eq!(created["external_id"], "org-XYZ");

        let renamed = OrganizationResource
            .apply(
                &ctx,
                ApplyRequest {
                    prior_state: Some(created),
                    planned_state: Some(json!({"name": "acme-2", "email": "ops@example.com"})),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed["id"], "acme-2");
    }

    #[tokio::test]
    async fn test_read_removed_organization() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/organizations/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let state = OrganizationResource
            .read(
                &CallContext::new(&client),
                ReadRequest {
                    current_state: json!({"id": "gone", "name": "gone"}),
                },
            )
            .await
            .unwrap();
        assert!(state.is_none());
    }

    #[tokio::test]
    async fn test_delete_and_import() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());
        let ctx = CallContext::new(&client);

        Mock::given(method("DELETE"))
            .and(path("/organizations/acme"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/organizations/acme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(org_doc("acme")))
            .mount(&mock_server)
            .await;

        let deleted = OrganizationResource
            .apply(
                &ctx,
                ApplyRequest {
                    prior_state: Some(json!({"id": "acme"})),
                    planned_state: None,
                },
            )
            .await
            .unwrap();
        assert!(deleted.is_none());

        let imported = OrganizationResource
            .import(&ctx, ImportRequest { id: "acme".to_string() })
            .await
            .unwrap();
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0]["email"], "ops@example.com");
    }

    #[tokio::test]
    async fn test_validate_rejects_delimiters_in_name() {
        let diags = OrganizationResource
            .validate_config(
                &CallContext::unconfigured(),
                &json!({"name": "a/b", "email": "x@y.z"}),
            )
            .await
            .unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].attribute.as_deref(), Some("name"));
    }

    #[tokio::test]
    async fn test_data_source_uses_provider_organization() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());
        let ctx = CallContext::new(&client).with_default_organization(Some("acme"));

        Mock::given(method("GET"))
            .and(path("/organizations/acme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(org_doc("acme")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let state = OrganizationDataSource.read(&ctx, json!({})).await.unwrap();
        assert_eq!(state["name"], "acme");
        assert_eq!(state["collaborator_auth_policy"], "password");
    }

    #[tokio::test]
    async fn test_data_source_missing_is_not_found() {
        let mock_server = MockServer::start().await;
        let client = TfeClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/organizations/ghost"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let err = OrganizationDataSource
            .read(&CallContext::new(&client), json!({"name": "ghost"}))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "organization 'ghost' not found");
    }

    #[tokio::test]
    async fn test_remote_calls_need_configuration() {
        let err = OrganizationResource
            .read(
                &CallContext::unconfigured(),
                ReadRequest {
                    current_state: json!({"id": "acme"}),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TfeError::Config(_)));
    }
}
