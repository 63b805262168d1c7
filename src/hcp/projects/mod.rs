//! Project module

mod api;
mod models;
mod resource;

pub use models::{Project, ProjectAttributes, ProjectWriteAttributes};
pub use resource::{ProjectDataSource, ProjectResource};
