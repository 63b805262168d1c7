//! Type-name dispatch to resource and data source handlers
//!
//! The handler table is filled once through [`RouterBuilder`] and is
//! read-only afterwards. A lookup miss is a typed error carrying the name.

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::time::Duration;

use crate::error::{Result, TfeError};
use crate::hcp::TfeClient;
use crate::provider::types::{
    plan_from_schema, upgrade_state_default, ApplyRequest, Diagnostic, ImportRequest,
    PlanRequest, PlanResponse, ReadRequest, Schema, UpgradeStateRequest,
};

/// Per-call context: configured client, default organization, deadline
#[derive(Clone, Copy, Default)]
pub struct CallContext<'a> {
    client: Option<&'a TfeClient>,
    organization: Option<&'a str>,
    timeout: Option<Duration>,
}

impl<'a> CallContext<'a> {
    /// Context for a configured provider
    pub fn new(client: &'a TfeClient) -> Self {
        Self {
            client: Some(client),
            ..Default::default()
        }
    }

    /// Context before the provider is configured (validate / plan only)
    pub fn unconfigured() -> Self {
        Self::default()
    }

    pub fn with_default_organization(mut self, organization: Option<&'a str>) -> Self {
        self.organization = organization;
        self
    }

    /// Bound the whole handler call, including every API request it makes
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The API client, or a configuration error if the provider is unconfigured
    pub fn client(&self) -> Result<&'a TfeClient> {
        self.client.ok_or_else(|| {
            TfeError::Config(
                "provider is not configured; configure must run before remote operations"
                    .to_string(),
            )
        })
    }

    pub fn default_organization(&self) -> Option<&'a str> {
        self.organization
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Lifecycle operations of one managed resource type
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    fn schema(&self) -> Schema;

    async fn validate_config(
        &self,
        _ctx: &CallContext<'_>,
        config: &Value,
    ) -> Result<Vec<Diagnostic>> {
        Ok(self.schema().validate(config))
    }

    async fn upgrade_state(
        &self,
        _ctx: &CallContext<'_>,
        request: UpgradeStateRequest,
    ) -> Result<Value> {
        upgrade_state_default(&self.schema(), request)
    }

    /// `None` when the remote entity no longer exists
    async fn read(&self, ctx: &CallContext<'_>, request: ReadRequest) -> Result<Option<Value>>;

    async fn plan(&self, _ctx: &CallContext<'_>, request: PlanRequest) -> Result<PlanResponse> {
        plan_from_schema(&self.schema(), request)
    }

    /// Create, update or delete; `None` after a delete
    async fn apply(&self, ctx: &CallContext<'_>, request: ApplyRequest) -> Result<Option<Value>>;

    async fn import(&self, ctx: &CallContext<'_>, request: ImportRequest) -> Result<Vec<Value>>;
}

/// Operations of one data source type
#[async_trait]
pub trait DataSourceHandler: Send + Sync {
    fn schema(&self) -> Schema;

    async fn validate_config(
        &self,
        _ctx: &CallContext<'_>,
        config: &Value,
    ) -> Result<Vec<Diagnostic>> {
        Ok(self.schema().validate(config))
    }

    async fn read(&self, ctx: &CallContext<'_>, config: Value) -> Result<Value>;
}

/// A resource operation and its payload
#[derive(Debug, Clone)]
pub enum ResourceRequest {
    ValidateConfig(Value),
    UpgradeState(UpgradeStateRequest),
    Read(ReadRequest),
    Plan(PlanRequest),
    Apply(ApplyRequest),
    Import(ImportRequest),
}

impl ResourceRequest {
    pub fn operation(&self) -> &'static str {
        match self {
            ResourceRequest::ValidateConfig(_) => "validate",
            ResourceRequest::UpgradeState(_) => "upgrade-state",
            ResourceRequest::Read(_) => "read",
            ResourceRequest::Plan(_) => "plan",
            ResourceRequest::Apply(_) => "apply",
            ResourceRequest::Import(_) => "import",
        }
    }

    /// True for operations that never touch the remote API
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ResourceRequest::ValidateConfig(_)
                | ResourceRequest::UpgradeState(_)
                | ResourceRequest::Plan(_)
        )
    }
}

/// Result of a resource operation, matching the request variant
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceResponse {
    ValidateConfig(Vec<Diagnostic>),
    UpgradeState(Value),
    Read(Option<Value>),
    Plan(PlanResponse),
    Apply(Option<Value>),
    Import(Vec<Value>),
}

/// A data source operation and its payload
#[derive(Debug, Clone)]
pub enum DataSourceRequest {
    ValidateConfig(Value),
    Read(Value),
}

impl DataSourceRequest {
    pub fn operation(&self) -> &'static str {
        match self {
            DataSourceRequest::ValidateConfig(_) => "validate",
            DataSourceRequest::Read(_) => "read",
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, DataSourceRequest::ValidateConfig(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataSourceResponse {
    ValidateConfig(Vec<Diagnostic>),
    Read(Value),
}

/// Builder for the immutable handler table
#[derive(Default)]
pub struct RouterBuilder {
    resources: HashMap<String, Box<dyn ResourceHandler>>,
    data_sources: HashMap<String, Box<dyn DataSourceHandler>>,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource handler; a later registration for the same name wins
    pub fn resource<H>(mut self, type_name: &str, handler: H) -> Self
    where
        H: ResourceHandler + 'static,
    {
        self.resources
            .insert(type_name.to_string(), Box::new(handler));
        self
    }

    pub fn boxed_resource(mut self, type_name: &str, handler: Box<dyn ResourceHandler>) -> Self {
        self.resources.insert(type_name.to_string(), handler);
        self
    }

    pub fn data_source<H>(mut self, type_name: &str, handler: H) -> Self
    where
        H: DataSourceHandler + 'static,
    {
        self.data_sources
            .insert(type_name.to_string(), Box::new(handler));
        self
    }

    pub fn boxed_data_source(
        mut self,
        type_name: &str,
        handler: Box<dyn DataSourceHandler>,
    ) -> Self {
        self.data_sources.insert(type_name.to_string(), handler);
        self
    }

    pub fn build(self) -> Router {
        Router {
            resources: self.resources,
            data_sources: self.data_sources,
        }
    }
}

/// Dispatches operations by resource / data source type name
pub struct Router {
    resources: HashMap<String, Box<dyn ResourceHandler>>,
    data_sources: HashMap<String, Box<dyn DataSourceHandler>>,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Registered resource type names, sorted
    pub fn resource_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.resources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered data source type names, sorted
    pub fn data_source_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.data_sources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn resource_schemas(&self) -> BTreeMap<String, Schema> {
        self.resources
            .iter()
            .map(|(name, handler)| (name.clone(), handler.schema()))
            .collect()
    }

    pub fn data_source_schemas(&self) -> BTreeMap<String, Schema> {
        self.data_sources
            .iter()
            .map(|(name, handler)| (name.clone(), handler.schema()))
            .collect()
    }

    fn resource(&self, type_name: &str) -> Result<&dyn ResourceHandler> {
        self.resources
            .get(type_name)
            .map(|h| h.as_ref())
            .ok_or_else(|| TfeError::UnsupportedResourceType(type_name.to_string()))
    }

    fn data_source(&self, type_name: &str) -> Result<&dyn DataSourceHandler> {
        self.data_sources
            .get(type_name)
            .map(|h| h.as_ref())
            .ok_or_else(|| TfeError::UnsupportedDataSourceType(type_name.to_string()))
    }

    /// Run one resource operation on the handler registered for `type_name`
    pub async fn dispatch_resource(
        &self,
        ctx: &CallContext<'_>,
        type_name: &str,
        request: ResourceRequest,
    ) -> Result<ResourceResponse> {
        let handler = self.resource(type_name)?;
        let operation = request.operation();
        debug!("Dispatching {} to resource {}", operation, type_name);

        let call = async {
            let response = match request {
                ResourceRequest::ValidateConfig(config) => {
                    ResourceResponse::ValidateConfig(handler.validate_config(ctx, &config).await?)
                }
                ResourceRequest::UpgradeState(req) => {
                    ResourceResponse::UpgradeState(handler.upgrade_state(ctx, req).await?)
                }
                ResourceRequest::Read(req) => ResourceResponse::Read(handler.read(ctx, req).await?),
                ResourceRequest::Plan(req) => ResourceResponse::Plan(handler.plan(ctx, req).await?),
                ResourceRequest::Apply(req) => {
                    ResourceResponse::Apply(handler.apply(ctx, req).await?)
                }
                ResourceRequest::Import(req) => {
                    ResourceResponse::Import(handler.import(ctx, req).await?)
                }
            };
            Ok(response)
        };

        with_deadline(ctx.timeout(), type_name, operation, call).await
    }

    /// Run one data source operation on the handler registered for `type_name`
    pub async fn dispatch_data_source(
        &self,
        ctx: &CallContext<'_>,
        type_name: &str,
        request: DataSourceRequest,
    ) -> Result<DataSourceResponse> {
        let handler = self.data_source(type_name)?;
        let operation = request.operation();
        debug!("Dispatching {} to data source {}", operation, type_name);

        let call = async {
            let response = match request {
                DataSourceRequest::ValidateConfig(config) => DataSourceResponse::ValidateConfig(
                    handler.validate_config(ctx, &config).await?,
                ),
                DataSourceRequest::Read(config) => {
                    DataSourceResponse::Read(handler.read(ctx, config).await?)
                }
            };
            Ok(response)
        };

        with_deadline(ctx.timeout(), type_name, operation, call).await
    }
}

/// Await `call`, failing with `Timeout` once the caller's deadline passes
async fn with_deadline<T, F>(
    timeout: Option<Duration>,
    type_name: &str,
    operation: &str,
    call: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
            TfeError::Timeout(format!("{} {} after {:?}", operation, type_name, limit))
        })?,
        None => call.await,
    }
}
