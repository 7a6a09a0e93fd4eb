pub mod server;
pub mod verify;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::config::ServerConfig;
use crate::model::integration::{GlobalIntegrations, TeamIntegrations};

#[derive(Debug, Error)]
#[error("server returned {status}: {message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

/// The slice of the server API this tool speaks.
#[async_trait]
pub trait ConfigApi: Send + Sync {
    async fn fetch_global(&self) -> Result<GlobalIntegrations>;
    async fn apply_global(&self, integrations: &GlobalIntegrations) -> Result<()>;
    async fn fetch_team(&self, team_id: u64) -> Result<TeamIntegrations>;
    async fn apply_team(&self, team_id: u64, integrations: &TeamIntegrations) -> Result<()>;
}

pub fn create_client(config: &ServerConfig) -> Box<dyn ConfigApi> {
    Box::new(server::ServerClient::new(
        config.url.clone(),
        config.token.clone(),
    ))
}
