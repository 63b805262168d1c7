//! terraform-provider-tfe - Terraform provider core for HCP Terraform and Terraform Enterprise
//!
//! Manages organizations, workspaces, projects and teams through the TFE
//! JSON:API and exposes matching data sources.
//!
//! # Features
//!
//! - Provider configuration from the provider block, environment and CLI config
//! - Token resolution from credentials files and `TF_TOKEN_*` variables
//! - Remote service discovery with a default API base URL fallback
//! - Automatic pagination handling
//! - Type-name dispatch with per-call deadlines
//!
//! # Example
//!
//! ```no_run
//! use serde_json::json;
//! use tfe_provider::{Provider, ResourceRequest, ReadRequest};
//!
//! # async fn demo() -> tfe_provider::Result<()> {
//! let provider = Provider::new();
//! provider
//!     .configure(&json!({"hostname": "app.terraform.io", "organization": "my-org"}))
//!     .await?;
//!
//! let response = provider
//!     .dispatch_resource(
//!         "tfe_workspace",
//!         ResourceRequest::Read(ReadRequest {
//!             current_state: json!({"id": "ws-abc123"}),
//!         }),
//!         None,
//!     )
//!     .await?;
//! println!("{:?}", response);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod hcp;
pub mod logging;
pub mod provider;

pub use error::{Result, TfeError};
pub use hcp::{
    AgentPool, CliConfig, Organization, Project, Team, TfeClient, TfeResource, TokenResolver,
    Workspace,
};
pub use logging::init_logging;
pub use provider::{
    builtin_router, ApplyRequest, CallContext, DataSourceHandler, DataSourceRequest,
    DataSourceResponse, DataSourceType, Diagnostic, ImportRequest, PlanRequest, PlanResponse,
    Provider, ProviderConfig, ReadRequest, ResourceHandler, ResourceRequest, ResourceResponse,
    ResourceType, Router, Schema, UpgradeStateRequest,
};
