use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ApiError, ConfigApi};
use crate::model::integration::{GlobalIntegrations, TeamIntegrations};

pub struct ServerClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl ServerClient {
    pub fn new(url: String, token: String) -> Self {
        Self {
            base_url: url.trim_end_matches('/').to_string(),
            token,
            client: reqwest::Client::new(),
        }
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().await.unwrap_or_default();
        Err(ApiError {
            status: status.as_u16(),
            message,
        }
        .into())
    }
}

// The config payload is a large object; we only read and write its
// integrations member.
#[derive(Deserialize)]
struct ConfigResponse {
    #[serde(default)]
    integrations: GlobalIntegrations,
}

#[derive(Serialize)]
struct ConfigPatch<'a> {
    integrations: &'a GlobalIntegrations,
}

#[derive(Deserialize)]
struct TeamResponse {
    #[serde(default)]
    integrations: TeamIntegrations,
}

#[derive(Serialize)]
struct TeamPatch<'a> {
    integrations: &'a TeamIntegrations,
}

#[async_trait]
impl ConfigApi for ServerClient {
    async fn fetch_global(&self) -> Result<GlobalIntegrations> {
        let url = format!("{}/api/v1/config", self.base_url);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Config request failed")?;
        let config: ConfigResponse = Self::check(resp)
            .await?
            .json()
            .await
            .context("Failed to parse config response")?;
        Ok(config.integrations)
    }

    async fn apply_global(&self, integrations: &GlobalIntegrations) -> Result<()> {
        let url = format!("{}/api/v1/config", self.base_url);
        let resp = self
            .client
            .patch(&url)
            .bearer_auth(&self.token)
            .json(&ConfigPatch { integrations })
            .send()
            .await
            .context("Config update failed")?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn fetch_team(&self, team_id: u64) -> Result<TeamIntegrations> {
        let url = format!("{}/api/v1/teams/{team_id}/integrations", self.base_url);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Team integrations request failed")?;
        let team: TeamResponse = Self::check(resp)
            .await?
            .json()
            .await
            .context("Failed to parse team integrations response")?;
        Ok(team.integrations)
    }

    async fn apply_team(&self, team_id: u64, integrations: &TeamIntegrations) -> Result<()> {
        let url = format!("{}/api/v1/teams/{team_id}/integrations", self.base_url);
        let resp = self
            .client
            .patch(&url)
            .bearer_auth(&self.token)
            .json(&TeamPatch { integrations })
            .send()
            .await
            .context("Team integrations update failed")?;
        Self::check(resp).await?;
        Ok(())
    }
}
