//! TFE API client module
//!
//! HTTP client, pagination, credentials and one sub-module per remote entity.

pub mod agent_pools;
pub mod cli_config;
mod client;
pub mod credentials;
pub mod discovery;
pub mod organizations;
pub mod pagination;
pub mod projects;
pub mod teams;
pub mod traits;
pub mod workspaces;

use serde::Deserialize;

pub use agent_pools::AgentPool;
pub use cli_config::CliConfig;
pub use client::{default_base_url, ClientOptions, TfeClient};
pub(crate) use client::build_http_client;
pub use credentials::{normalize_hostname, CredentialsSource, TokenResolver};
pub use organizations::Organization;
pub use pagination::{collect_pages, find_in_pages, Page};
pub use projects::Project;
pub use teams::Team;
pub use traits::{PaginatedResponse, TfeResource};
pub use workspaces::Workspace;

/// Pagination metadata from TFE API (shared across resources)
#[derive(Deserialize, Debug, Default, Clone)]
pub struct PaginationMeta {
    pub pagination: Option<Pagination>,
}

/// Pagination details
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Pagination {
    #[serde(rename = "current-page")]
    pub current_page: u32,
    #[serde(rename = "total-pages")]
    pub total_pages: u32,
    #[serde(rename = "next-page", default)]
    pub next_page: Option<u32>,
    #[serde(rename = "prev-page", default)]
    pub prev_page: Option<u32>,
    #[serde(rename = "total-count", default)]
    pub total_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_deserialization() {
        let json = r#"{
            "pagination": {
                "current-page": 2,
                "total-pages": 3,
                "next-page": 3,
                "prev-page": 1,
                "total-count": 250
            }
        }"#;
        let meta: PaginationMeta = serde_json::from_str(json).unwrap();
        let p = meta.pagination.unwrap();
        assert_eq!(p.current_page, 2);
        assert_eq!(p.next_page, Some(3));
        assert_eq!(p.prev_page, Some(1));
        assert_eq!(p.total_count, 250);
    }

    #[test]
    fn test_pagination_null_cursors() {
        let json = r#"{"current-page": 1, "total-pages": 1, "next-page": null, "prev-page": null}"#;
        let p: Pagination = serde_json::from_str(json).unwrap();
        assert_eq!(p.next_page, None);
        assert_eq!(p.total_count, 0);
    }
}
