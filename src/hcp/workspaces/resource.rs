//! `tfe_workspace` resource

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::{json, Value};

use crate::error::{Result, TfeError};
use crate::hcp::TfeClient;
use crate::provider::ids;
use crate::provider::router::{CallContext, ResourceHandler};
use crate::provider::state::{
    fill_default_organization, get_bool, get_str, get_string_list, organization_or_default,
    required_str, validate_segments,
};
use crate::provider::types::{
    plan_from_schema, upgrade_state_default, ApplyRequest, Attribute, AttributeKind, Diagnostic,
    ImportRequest, PlanRequest, PlanResponse, ReadRequest, Schema, UpgradeStateRequest,
};

use super::models::{Workspace, WorkspaceTarget, WorkspaceWriteAttributes};

/// Accepted `execution_mode` values
pub const EXECUTION_MODES: &[&str] = &["remote", "local", "agent"];

/// Workspace ID prefix used by the API
const WORKSPACE_ID_PREFIX: &str = "ws-";

impl WorkspaceTarget {
    /// Parse `ws-<id>`, `<org>/<name>` or the legacy `<name>|<org>`
    pub fn parse(id: &str) -> Result<Self> {
        if id.starts_with(WORKSPACE_ID_PREFIX) {
            return Ok(WorkspaceTarget::Id(id.to_string()));
        }
        let (organization, name) = ids::unpack(id)?;
        Ok(WorkspaceTarget::Name { organization, name })
    }
}

fn write_attributes(config: &Value) -> Result<WorkspaceWriteAttributes> {
    let owned = |key: &str| get_str(config, key).map(str::to_string);
    Ok(WorkspaceWriteAttributes {
        name: required_str(config, "name")?.to_string(),
        description: owned("description"),
        execution_mode: owned("execution_mode"),
        auto_apply: get_bool(config, "auto_apply"),
        terraform_version: owned("terraform_version"),
        working_directory: owned("working_directory"),
        allow_destroy_plan: get_bool(config, "allow_destroy_plan"),
        queue_all_runs: get_bool(config, "queue_all_runs"),
        speculative_enabled: get_bool(config, "speculative_enabled"),
        tag_names: get_string_list(config, "tag_names"),
    })
}

/// Resolve the remote workspace a state's `id` refers to
async fn workspace_for_state(
    client: &TfeClient,
    state: &Value,
) -> Result<Option<(Workspace, WorkspaceTarget)>> {
    let id = required_str(state, "id")?;
    let target = WorkspaceTarget::parse(id)?;
    let workspace = client.resolve_workspace(&target).await?;
    Ok(workspace.map(|ws| (ws, target)))
}

fn state_organization(state: &Value, target: &WorkspaceTarget, ctx: &CallContext<'_>) -> String {
    if let WorkspaceTarget::Name { organization, .. } = target {
        return organization.clone();
    }
    organization_or_default(state, ctx).unwrap_or_default()
}

/// Managed workspace
///
/// Schema version 1. Version 0 stored `<org>/<name>` in `id`; current state
/// always carries the `ws-` workspace ID.
pub struct WorkspaceResource;

impl WorkspaceResource {
    const SCHEMA_VERSION: i64 = 1;

    /// Rewrite a version-0 composite `id` into the workspace ID
    async fn upgrade_v0(&self, ctx: &CallContext<'_>, mut state: Value) -> Result<Value> {
        let Some(id) = get_str(&state, "id").map(str::to_string) else {
            return Ok(state);
        };
        let WorkspaceTarget::Name { organization, name } = WorkspaceTarget::parse(&id)? else {
            return Ok(state);
        };

        if let Some(object) = state.as_object_mut() {
            object.insert("organization".to_string(), json!(organization));
        }

        let Ok(client) = ctx.client() else {
            debug!("Keeping composite workspace ID {} until the next read", id);
            return Ok(state);
        };
        match client.get_workspace_by_name(&organization, &name).await? {
            Some(ws) => {
                debug!("Upgraded workspace ID {} to {}", id, ws.id);
                if let Some(object) = state.as_object_mut() {
                    object.insert("id".to_string(), json!(ws.id));
                }
            }
            None => warn!("Workspace {} not found during state upgrade", id),
        }
        Ok(state)
    }
}

#[async_trait]
impl ResourceHandler for WorkspaceResource {
    fn schema(&self) -> Schema {
        Schema::new(Self::SCHEMA_VERSION)
            .attr(Attribute::computed("id", AttributeKind::String))
            .attr(
                Attribute::required("name", AttributeKind::String)
                    .describe("Name of the workspace."),
            )
            .attr(
                Attribute::optional_computed("organization", AttributeKind::String)
                    .force_new()
                    .describe("Name of the organization; defaults to the provider organization."),
            )
            .attr(Attribute::optional("description", AttributeKind::String))
            .attr(Attribute::optional_computed("project_id", AttributeKind::String))
            .attr(
                Attribute::optional("execution_mode", AttributeKind::String)
                    .with_default(json!("remote")),
            )
            .attr(Attribute::optional("auto_apply", AttributeKind::Bool).with_default(json!(false)))
            .attr(Attribute::optional_computed("terraform_version", AttributeKind::String))
            .attr(Attribute::optional("working_directory", AttributeKind::String))
            .attr(
                Attribute::optional("allow_destroy_plan", AttributeKind::Bool)
                    .with_default(json!(true)),
            )
            .attr(
                Attribute::optional("queue_all_runs", AttributeKind::Bool)
                    .with_default(json!(true)),
            )
            .attr(
                Attribute::optional("speculative_enabled", AttributeKind::Bool)
                    .with_default(json!(true)),
            )
            .attr(Attribute::optional("tag_names", AttributeKind::List))
            .attr(Attribute::computed("resource_count", AttributeKind::Number))
    }

    async fn validate_config(
        &self,
        _ctx: &CallContext<'_>,
        config: &Value,
    ) -> Result<Vec<Diagnostic>> {
        let mut diags = self.schema().validate(config);
        diags.extend(validate_segments(config, &["name", "organization"]));

        if let Some(mode) = get_str(config, "execution_mode") {
            if !EXECUTION_MODES.contains(&mode) {
                diags.push(
                    Diagnostic::error(
                        "Invalid execution mode",
                        &format!(
                            "execution_mode must be one of {}, got \"{}\"",
                            EXECUTION_MODES.join(", "),
                            mode
                        ),
                    )
                    .at("execution_mode"),
                );
            }
        }
        Ok(diags)
    }

    async fn upgrade_state(
        &self,
        ctx: &CallContext<'_>,
        request: UpgradeStateRequest,
    ) -> Result<Value> {
        match request.version {
            0 => self.upgrade_v0(ctx, request.raw_state).await,
            _ => upgrade_state_default(&self.schema(), request),
        }
    }

    async fn read(&self, ctx: &CallContext<'_>, request: ReadRequest) -> Result<Option<Value>> {
        let client = ctx.client()?;
        match workspace_for_state(client, &request.current_state).await? {
            Some((ws, target)) => {
                let org = state_organization(&request.current_state, &target, ctx);
                Ok(Some(ws.to_state(&org)))
            }
            None => {
                debug!("Workspace no longer exists, removing from state");
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
                let Some((ws, _)) = workspace_for_state(client, &prior).await? else {
                    debug!("Workspace already deleted");
                    return Ok(None);
                };
                debug!("Delete workspace: {}", ws.id);
                client.delete_workspace(&ws.id).await?;
                Ok(None)
            }
            (None, Some(planned)) => {
                let org = organization_or_default(&planned, ctx)?;
                let attributes = write_attributes(&planned)?;
                let ws = client
                    .create_workspace(&org, attributes, get_str(&planned, "project_id"))
                    .await?;
                Ok(Some(ws.to_state(&org)))
            }
            (Some(prior), Some(planned)) => {
                let (current, target) = workspace_for_state(client, &prior)
                    .await?
                    .ok_or_else(|| {
                        TfeError::not_found(
                            "workspace",
                            get_str(&prior, "id").unwrap_or_default(),
                        )
                    })?;
                let org = state_organization(&prior, &target, ctx);
                let attributes = write_attributes(&planned)?;
                debug!("Update workspace: {}", current.id);
                let ws = client
                    .update_workspace(&current.id, attributes, get_str(&planned, "project_id"))
                    .await?;
                Ok(Some(ws.to_state(&org)))
            }
        }
    }

    async fn import(&self, ctx: &CallContext<'_>, request: ImportRequest) -> Result<Vec<Value>> {
        let client = ctx.client()?;
        let target = WorkspaceTarget::parse(&request.id)?;
        let ws = client
            .resolve_workspace(&target)
            .await?
            .ok_or_else(|| TfeError::not_found("workspace", &request.id))?;

        let org = match target {
            WorkspaceTarget::Name { organization, .. } => organization,
            WorkspaceTarget::Id(_) => ctx.default_organization().unwrap_or_default().to_string(),
        };
        Ok(vec![ws.to_state(&org)])
    }
}
