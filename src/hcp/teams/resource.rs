//! `tfe_team` resource and data source

use async_trait::async_trait;
use log::debug;
use serde_json::{json, Value};

use crate::error::Result;
use crate::provider::ids;
use crate::provider::router::{CallContext, DataSourceHandler, ResourceHandler};
use crate::provider::state::{
    fill_default_organization, get_bool, get_str, organization_or_default, required_str,
    validate_segments,
};
use crate::provider::types::{
    plan_from_schema, ApplyRequest, Attribute, AttributeKind, Diagnostic, ImportRequest,
    PlanRequest, PlanResponse, ReadRequest, Schema,
};

use super::models::TeamWriteAttributes;

pub const VISIBILITIES: &[&str] = &["secret", "organization"];

const TEAM_ID_PREFIX: &str = "team-";

fn write_attributes(config: &Value) -> Result<TeamWriteAttributes> {
    Ok(TeamWriteAttributes {
        name: required_str(config, "name")?.to_string(),
        visibility: get_str(config, "visibility").map(str::to_string),
        sso_team_id: get_str(config, "sso_team_id").map(str::to_string),
        allow_member_token_management: get_bool(config, "allow_member_token_management"),
    })
}

pub struct TeamResource;

#[async_trait]
impl ResourceHandler for TeamResource {
    fn schema(&self) -> Schema {
        Schema::new(0)
            .attr(Attribute::computed("id", AttributeKind::String))
            .attr(Attribute::required("name", AttributeKind::String))
            .attr(Attribute::optional_computed("organization", AttributeKind::String).force_new())
            .attr(
                Attribute::optional("visibility", AttributeKind::String)
                    .with_default(json!("secret")),
            )
            .attr(Attribute::optional("sso_team_id", AttributeKind::String))
            .attr(
                Attribute::optional("allow_member_token_management", AttributeKind::Bool)
                    .with_default(json!(true)),
            )
    }

    async fn validate_config(
        &self,
        _ctx: &CallContext<'_>,
        config: &Value,
    ) -> Result<Vec<Diagnostic>> {
        let mut diags = self.schema().validate(config);
        diags.extend(validate_segments(config, &["name", "organization"]));

        if let Some(visibility) = get_str(config, "visibility") {
            if !VISIBILITIES.contains(&visibility) {
                diags.push(
                    Diagnostic::error(
                        "Invalid visibility",
                        &format!(
                            "visibility must be one of {}, got \"{}\"",
                            VISIBILITIES.join(", "),
                            visibility
                        ),
                    )
                    .at("visibility"),
                );
            }
        }
        Ok(diags)
    }

    async fn read(&self, ctx: &CallContext<'_>, request: ReadRequest) -> Result<Option<Value>> {
        let client = ctx.client()?;
        let id = required_str(&request.current_state, "id")?;

        match client.get_team(id).await? {
            Some(team) => {
                let org = organization_or_default(&request.current_state, ctx)?;
                Ok(Some(team.to_state(&org)))
            }
            None => {
                debug!("Team {} no longer exists, removing from state", id);
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
                client.delete_team(required_str(&prior, "id")?).await?;
                Ok(None)
            }
            (None, Some(planned)) => {
                let org = organization_or_default(&planned, ctx)?;
                let team = client.create_team(&org, write_attributes(&planned)?).await?;
                Ok(Some(team.to_state(&org)))
            }
            (Some(prior), Some(planned)) => {
                let org = organization_or_default(&prior, ctx)?;
                let team = client
                    .update_team(required_str(&prior, "id")?, write_attributes(&planned)?)
                    .await?;
                Ok(Some(team.to_state(&org)))
            }
        }
    }

    /// Import by `<org>/<team-id>` or `<org>/<team name>`
    ///
    /// Names may also start with `team-`, so a failed ID lookup falls back to
    /// a name lookup.
    async fn import(&self, ctx: &CallContext<'_>, request: ImportRequest) -> Result<Vec<Value>> {
        let client = ctx.client()?;
        let (org, key) = ids::unpack(&request.id)?;

        let by_id = if key.starts_with(TEAM_ID_PREFIX) {
            client.get_team(&key).await?
        } else {
            None
        };
        let team = match by_id {
            Some(team) => team,
            None => client.find_team_by_name(&org, &key).await?,
        };
        Ok(vec![team.to_state(&org)])
    }
}

/// Team lookup by name within an organization
pub struct TeamDataSource;

#[async_trait]
impl DataSourceHandler for TeamDataSource {
    fn schema(&self) -> Schema {
        Schema::new(0)
            .attr(Attribute::computed("id", AttributeKind::String))
            .attr(Attribute::required("name", AttributeKind::String))
            .attr(Attribute::optional_computed("organization", AttributeKind::String))
            .attr(Attribute::computed("visibility", AttributeKind::String))
            .attr(Attribute::computed("sso_team_id", AttributeKind::String))
            .attr(Attribute::computed("allow_member_token_management", AttributeKind::Bool))
    }

    async fn read(&self, ctx: &CallContext<'_>, config: Value) -> Result<Value> {
        let client = ctx.client()?;
        let org = organization_or_default(&config, ctx)?;
        let name = required_str(&config, "name")?;

        let team = client.find_team_by_name(&org, name).await?;
        Ok(team.to_state(&org))
    }
}
