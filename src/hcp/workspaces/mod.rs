//! Workspace module

mod api;
mod data_source;
mod models;
mod resource;

pub use api::WorkspaceQuery;
pub use data_source::{wildcard_match, WorkspaceDataSource, WorkspaceIdsDataSource};
pub use models::{Workspace, WorkspaceAttributes, WorkspaceTarget, WorkspaceWriteAttributes};
pub use resource::{WorkspaceResource, EXECUTION_MODES};
