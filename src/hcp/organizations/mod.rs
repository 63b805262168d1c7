//! Organization module

mod api;
mod models;
mod resource;

pub use models::{Organization, OrganizationAttributes, OrganizationWriteAttributes};
pub use resource::{OrganizationDataSource, OrganizationResource};
