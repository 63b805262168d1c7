//! Team API operations

use reqwest::Method;

use crate::config::api;
use crate::error::Result;
use crate::hcp::traits::{ApiDocument, ResourceObject, TfeResource};
use crate::hcp::TfeClient;

use super::models::{Team, TeamWriteAttributes};

fn org_teams_path(org: &str) -> String {
    format!(
        "/{}/{}/{}",
        api::ORGANIZATIONS,
        urlencoding::encode(org),
        api::TEAMS
    )
}

fn team_path(team_id: &str) -> String {
    format!("/{}/{}", api::TEAMS, urlencoding::encode(team_id))
}

impl TfeClient {
    /// Get a single team by ID
    pub async fn get_team(&self, team_id: &str) -> Result<Option<Team>> {
        self.fetch_resource_by_path(&team_path(team_id), &format!("team '{}'", team_id))
            .await
    }

    /// Find a team by exact name, walking the organization's team pages
    pub async fn find_team_by_name(&self, org: &str, name: &str) -> Result<Team> {
        let path = format!(
            "{}?filter[names]={}",
            org_teams_path(org),
            urlencoding::encode(name)
        );
        self.find_in_list(
            &path,
            |t: &Team| t.name() == name,
            "team",
            &format!("{}/{}", org, name),
        )
        .await
    }

    pub async fn create_team(&self, org: &str, attributes: TeamWriteAttributes) -> Result<Team> {
        let label = format!("team '{}/{}'", org, attributes.name);
        let body = ApiDocument::new(ResourceObject::new(api::TEAMS, attributes));
        self.send_document(Method::POST, &org_teams_path(org), &body, &label)
            .await
    }

    pub async fn update_team(
        &self,
        team_id: &str,
        attributes: TeamWriteAttributes,
    ) -> Result<Team> {
        let body = ApiDocument::new(ResourceObject::new(api::TEAMS, attributes));
        self.send_document(
            Method::PATCH,
            &team_path(team_id),
            &body,
            &format!("team '{}'", team_id),
        )
        .await
    }

    pub async fn delete_team(&self, team_id: &str) -> Result<()> {
        self.delete_resource(&team_path(team_id), &format!("team '{}'", team_id))
            .await
    }
}
