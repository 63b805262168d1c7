//! `tfe_agent_pool` data source

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::provider::router::{CallContext, DataSourceHandler};
use crate::provider::state::{organization_or_default, required_str};
use crate::provider::types::{Attribute, AttributeKind, Schema};

pub struct AgentPoolDataSource;

#[async_trait]
impl DataSourceHandler for AgentPoolDataSource {
    fn schema(&self) -> Schema {
        Schema::new(0)
            .attr(Attribute::computed("id", AttributeKind::String))
            .attr(Attribute::required("name", AttributeKind::String))
            .attr(Attribute::optional_computed("organization", AttributeKind::String))
            .attr(Attribute::computed("organization_scoped", AttributeKind::Bool))
            .attr(Attribute::computed("agent_count", AttributeKind::Number))
    }

    async fn read(&self, ctx: &CallContext<'_>, config: Value) -> Result<Value> {
        let client = ctx.client()?;
        let org = organization_or_default(&config, ctx)?;
        let name = required_str(&config, "name")?;

        let pool = client.find_agent_pool_by_name(&org, name).await?;
        Ok(pool.to_state(&org))
    }
}
