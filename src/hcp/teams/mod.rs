//! Team module

mod api;
mod models;
mod resource;

pub use models::{Team, TeamAttributes, TeamWriteAttributes};
pub use resource::{TeamDataSource, TeamResource, VISIBILITIES};
