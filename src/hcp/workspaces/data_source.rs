//! `tfe_workspace` and `tfe_workspace_ids` data sources

use async_trait::async_trait;
use log::debug;
use serde_json::{json, Map, Value};

use crate::error::{Result, TfeError};
use crate::provider::ids;
use crate::provider::router::{CallContext, DataSourceHandler};
use crate::provider::state::{get_str, get_string_list, organization_or_default, required_str};
use crate::provider::types::{Attribute, AttributeKind, Diagnostic, Schema};

use super::api::WorkspaceQuery;

/// Name match with `*` as a wildcard for any run of characters
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    let [first, middle @ .., last] = parts.as_slice() else {
        return pattern == name;
    };
    if name.len() < first.len() + last.len() || !name.starts_with(first) || !name.ends_with(last)
    {
        return false;
    }

    let mut rest = &name[first.len()..name.len() - last.len()];
    for part in middle {
        match rest.find(part) {
            Some(i) => rest = &rest[i + part.len()..],
            None => return false,
        }
    }
    true
}

/// Single workspace lookup; `id` is the composite `<org>/<name>`
pub struct WorkspaceDataSource;

#[async_trait]
impl DataSourceHandler for WorkspaceDataSource {
    fn schema(&self) -> Schema {
        Schema::new(0)
            .attr(Attribute::computed("id", AttributeKind::String))
            .attr(Attribute::required("name", AttributeKind::String))
            .attr(Attribute::optional_computed("organization", AttributeKind::String))
            .attr(Attribute::computed("external_id", AttributeKind::String))
            .attr(Attribute::computed("description", AttributeKind::String))
            .attr(Attribute::computed("project_id", AttributeKind::String))
            .attr(Attribute::computed("execution_mode", AttributeKind::String))
            .attr(Attribute::computed("auto_apply", AttributeKind::Bool))
            .attr(Attribute::computed("terraform_version", AttributeKind::String))
            .attr(Attribute::computed("working_directory", AttributeKind::String))
            .attr(Attribute::computed("allow_destroy_plan", AttributeKind::Bool))
            .attr(Attribute::computed("queue_all_runs", AttributeKind::Bool))
            .attr(Attribute::computed("speculative_enabled", AttributeKind::Bool))
            .attr(Attribute::computed("tag_names", AttributeKind::List))
            .attr(Attribute::computed("resource_count", AttributeKind::Number))
    }

    async fn read(&self, ctx: &CallContext<'_>, config: Value) -> Result<Value> {
        let client = ctx.client()?;
        let name = required_str(&config, "name")?;
        let org = organization_or_default(&config, ctx)?;

        let ws = client
            .get_workspace_by_name(&org, name)
            .await?
            .ok_or_else(|| TfeError::not_found("workspace", &format!("{}/{}", org, name)))?;

        let mut state = ws.to_state(&org);
        if let Some(object) = state.as_object_mut() {
            object.insert("external_id".to_string(), json!(ws.id));
            object.insert("id".to_string(), json!(ids::pack(&org, name)?));
        }
        Ok(state)
    }
}

/// Workspace IDs by name pattern
///
/// `names` entries may use `*` wildcards; `["*"]` selects every workspace.
pub struct WorkspaceIdsDataSource;

#[async_trait]
impl DataSourceHandler for WorkspaceIdsDataSource {
    fn schema(&self) -> Schema {
        Schema::new(0)
            .attr(Attribute::computed("id", AttributeKind::String))
            .attr(Attribute::required("names", AttributeKind::List))
            .attr(Attribute::optional_computed("organization", AttributeKind::String))
            .attr(Attribute::optional("project_id", AttributeKind::String))
            .attr(Attribute::computed("ids", AttributeKind::Map))
            .attr(Attribute::computed("full_names", AttributeKind::Map))
    }

    async fn validate_config(
        &self,
        _ctx: &CallContext<'_>,
        config: &Value,
    ) -> Result<Vec<Diagnostic>> {
        let mut diags = self.schema().validate(config);
        if get_string_list(config, "names").is_some_and(|names| names.is_empty()) {
            diags.push(
                Diagnostic::warning(
                    "Empty names list",
                    "names is empty, so no workspace will match; use [\"*\"] to select all",
                )
                .at("names"),
            );
        }
        Ok(diags)
    }

    async fn read(&self, ctx: &CallContext<'_>, config: Value) -> Result<Value> {
        let client = ctx.client()?;
        let org = organization_or_default(&config, ctx)?;
        let patterns = get_string_list(&config, "names").unwrap_or_default();
        let project_id = get_str(&config, "project_id").filter(|p| !p.is_empty());

        // A single plain name narrows the listing server-side
        let search = match patterns.as_slice() {
            [only] if !only.contains('*') => Some(only.as_str()),
            _ => None,
        };
        let workspaces = client
            .get_workspaces(
                &org,
                WorkspaceQuery { search, project_id },
            )
            .await?;

        let mut id_map = Map::new();
        let mut full_names = Map::new();
        for ws in &workspaces {
            let name = &ws.attributes.name;
            if patterns.iter().any(|p| wildcard_match(p, name)) {
                id_map.insert(name.clone(), json!(ws.id));
                full_names.insert(name.clone(), json!(ids::pack(&org, name)?));
            }
        }
        debug!(
            "Matched {} of {} workspaces in {}",
            id_map.len(),
            workspaces.len(),
            org
        );

        Ok(json!({
            "id": org,
            "organization": org,
            "names": patterns,
            "project_id": project_id,
            "ids": id_map,
            "full_names": full_names,
        }))
    }
}
