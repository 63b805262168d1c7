//! Provider core: configuration, dispatch and the built-in handler set

pub mod config;
pub mod ids;
pub mod router;
pub mod state;
pub mod types;

use log::{debug, info};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;

use crate::config::env;
use crate::error::{Result, TfeError};
use crate::hcp::agent_pools::AgentPoolDataSource;
use crate::hcp::organizations::{OrganizationDataSource, OrganizationResource};
use crate::hcp::projects::{ProjectDataSource, ProjectResource};
use crate::hcp::teams::{TeamDataSource, TeamResource};
use crate::hcp::workspaces::{WorkspaceDataSource, WorkspaceIdsDataSource, WorkspaceResource};
use crate::hcp::{CliConfig, TfeClient};

pub use config::ProviderConfig;
pub use router::{
    CallContext, DataSourceHandler, DataSourceRequest, DataSourceResponse, ResourceHandler,
    ResourceRequest, ResourceResponse, Router, RouterBuilder,
};
pub use types::{
    ApplyRequest, Attribute, AttributeKind, AttributeMode, Diagnostic, ImportRequest, PlanRequest,
    PlanResponse, ReadRequest, Schema, Severity, UpgradeStateRequest,
};

/// Built-in managed resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Organization,
    Workspace,
    Project,
    Team,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Organization,
        ResourceType::Workspace,
        ResourceType::Project,
        ResourceType::Team,
    ];

    /// Terraform type name
    pub fn type_name(self) -> &'static str {
        match self {
            ResourceType::Organization => "tfe_organization",
            ResourceType::Workspace => "tfe_workspace",
            ResourceType::Project => "tfe_project",
            ResourceType::Team => "tfe_team",
        }
    }

    pub fn handler(self) -> Box<dyn ResourceHandler> {
        match self {
            ResourceType::Organization => Box::new(OrganizationResource),
            ResourceType::Workspace => Box::new(WorkspaceResource),
            ResourceType::Project => Box::new(ProjectResource),
            ResourceType::Team => Box::new(TeamResource),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for ResourceType {
    type Err = TfeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.type_name() == s)
            .ok_or_else(|| TfeError::UnsupportedResourceType(s.to_string()))
    }
}

/// Built-in data source kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSourceType {
    Organization,
    Workspace,
    WorkspaceIds,
    Project,
    Team,
    AgentPool,
}

impl DataSourceType {
    pub const ALL: [DataSourceType; 6] = [
        DataSourceType::Organization,
        DataSourceType::Workspace,
        DataSourceType::WorkspaceIds,
        DataSourceType::Project,
        DataSourceType::Team,
        DataSourceType::AgentPool,
    ];

    pub fn type_name(self) -> &'static str {
        match self {
            DataSourceType::Organization => "tfe_organization",
            DataSourceType::Workspace => "tfe_workspace",
            DataSourceType::WorkspaceIds => "tfe_workspace_ids",
            DataSourceType::Project => "tfe_project",
            DataSourceType::Team => "tfe_team",
            DataSourceType::AgentPool => "tfe_agent_pool",
        }
    }

    pub fn handler(self) -> Box<dyn DataSourceHandler> {
        match self {
            DataSourceType::Organization => Box::new(OrganizationDataSource),
            DataSourceType::Workspace => Box::new(WorkspaceDataSource),
            DataSourceType::WorkspaceIds => Box::new(WorkspaceIdsDataSource),
            DataSourceType::Project => Box::new(ProjectDataSource),
            DataSourceType::Team => Box::new(TeamDataSource),
            DataSourceType::AgentPool => Box::new(AgentPoolDataSource),
        }
    }
}

impl fmt::Display for DataSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for DataSourceType {
    type Err = TfeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.type_name() == s)
            .ok_or_else(|| TfeError::UnsupportedDataSourceType(s.to_string()))
    }
}

/// Router with every built-in resource and data source registered
pub fn builtin_router() -> Router {
    let builder = ResourceType::ALL
        .into_iter()
        .fold(Router::builder(), |b, t| b.boxed_resource(t.type_name(), t.handler()));
    DataSourceType::ALL
        .into_iter()
        .fold(builder, |b, t| b.boxed_data_source(t.type_name(), t.handler()))
        .build()
}

/// State shared by every call once the provider is configured
struct ProviderMeta {
    client: TfeClient,
    organization: Option<String>,
}

/// The provider: a frozen router plus the client installed by `configure`
pub struct Provider {
    router: Router,
    meta: OnceLock<ProviderMeta>,
}

impl Default for Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider {
    /// Provider with the built-in handler set
    pub fn new() -> Self {
        Self::with_router(builtin_router())
    }

    /// Provider over a custom router
    pub fn with_router(router: Router) -> Self {
        Self {
            router,
            meta: OnceLock::new(),
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Provider block schema
    pub fn schema(&self) -> Schema {
        ProviderConfig::schema()
    }

    pub fn is_configured(&self) -> bool {
        self.meta.get().is_some()
    }

    /// Configure from a provider block, the environment and the CLI config files
    pub async fn configure(&self, config: &Value) -> Result<()> {
        if self.is_configured() {
            return Err(TfeError::AlreadyConfigured);
        }

        let settings = ProviderConfig::from_value(config)?;
        let client = settings
            .connect(&CliConfig::load(), env::process_vars())
            .await?;
        info!(
            "Configured provider for {} ({})",
            settings.hostname,
            client.base_url()
        );
        self.install(client, settings.organization)
    }

    /// Install a prebuilt client (tests, embedding hosts)
    pub fn configure_with_client(
        &self,
        client: TfeClient,
        organization: Option<String>,
    ) -> Result<()> {
        self.install(client, organization)
    }

    fn install(&self, client: TfeClient, organization: Option<String>) -> Result<()> {
        self.meta
            .set(ProviderMeta {
                client,
                organization,
            })
            .map_err(|_| TfeError::AlreadyConfigured)
    }

    fn context(&self, timeout: Option<Duration>) -> CallContext<'_> {
        let ctx = match self.meta.get() {
            Some(meta) => CallContext::new(&meta.client)
                .with_default_organization(meta.organization.as_deref()),
            None => CallContext::unconfigured(),
        };
        ctx.with_timeout(timeout)
    }

    /// Run a resource operation; remote operations require `configure` first
    pub async fn dispatch_resource(
        &self,
        type_name: &str,
        request: ResourceRequest,
        timeout: Option<Duration>,
    ) -> Result<ResourceResponse> {
        debug!("Resource {} {}", type_name, request.operation());
        self.router
            .dispatch_resource(&self.context(timeout), type_name, request)
            .await
    }

    /// Run a data source operation; reads require `configure` first
    pub async fn dispatch_data_source(
        &self,
        type_name: &str,
        request: DataSourceRequest,
        timeout: Option<Duration>,
    ) -> Result<DataSourceResponse> {
        debug!("Data source {} {}", type_name, request.operation());
        self.router
            .dispatch_data_source(&self.context(timeout), type_name, request)
            .await
    }
}
