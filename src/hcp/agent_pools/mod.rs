//! Agent pool module (read-only)

mod api;
mod models;
mod data_source;

pub use data_source::AgentPoolDataSource;
pub use models::{AgentPool, AgentPoolAttributes};
