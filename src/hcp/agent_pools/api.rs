//! Agent pool API operations

use crate::config::api;
use crate::error::Result;
use crate::hcp::traits::TfeResource;
use crate::hcp::TfeClient;

use super::models::AgentPool;

impl TfeClient {
    /// Find an agent pool by exact name, walking the organization's pool pages
    pub async fn find_agent_pool_by_name(&self, org: &str, name: &str) -> Result<AgentPool> {
        let path = format!(
            "/{}/{}/{}?q={}",
            api::ORGANIZATIONS,
            urlencoding::encode(org),
            api::AGENT_POOLS,
            urlencoding::encode(name)
        );
        self.find_in_list(
            &path,
            |p: &AgentPool| p.name() == name,
            "agent pool",
            &format!("{}/{}", org, name),
        )
        .await
    }
}
