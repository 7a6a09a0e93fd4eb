use anyhow::{Context, Result};
use base64::Engine;

use crate::model::integration::{IntegrationEntry, JiraIntegration, ZendeskIntegration};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    Ok,
    // The service answered but rejected us. Carries the HTTP status.
    Rejected(u16),
}

fn basic_auth(user: &str, secret: &str) -> String {
    let creds = format!("{user}:{secret}");
    let encoded = base64::engine::general_purpose::STANDARD.encode(creds);
    format!("Basic {encoded}")
}

// Searches for the project under the entry's own credentials.
pub async fn verify_jira(entry: &JiraIntegration) -> Result<VerifyOutcome> {
    let url = format!(
        "{}/rest/api/3/project/search?query={}",
        entry.url.trim_end_matches('/'),
        urlencoding::encode(&entry.project_key)
    );

    let resp = reqwest::Client::new()
        .get(&url)
        .header("Authorization", basic_auth(&entry.username, &entry.api_token))
        .header("Accept", "application/json")
        .send()
        .await
        .context("Jira verification request failed")?;

    if resp.status().is_success() {
        Ok(VerifyOutcome::Ok)
    } else {
        Ok(VerifyOutcome::Rejected(resp.status().as_u16()))
    }
}

// Zendesk API tokens authenticate as email/token.
pub async fn verify_zendesk(entry: &ZendeskIntegration) -> Result<VerifyOutcome> {
    let url = format!(
        "{}/api/v2/groups/{}.json",
        entry.url.trim_end_matches('/'),
        entry.group_id
    );
    let user = format!("{}/token", entry.email);

    let resp = reqwest::Client::new()
        .get(&url)
        .header("Authorization", basic_auth(&user, &entry.api_token))
        .header("Accept", "application/json")
        .send()
        .await
        .context("Zendesk verification request failed")?;

    if resp.status().is_success() {
        Ok(VerifyOutcome::Ok)
    } else {
        Ok(VerifyOutcome::Rejected(resp.status().as_u16()))
    }
}

pub async fn verify_entry(entry: &IntegrationEntry) -> Result<VerifyOutcome> {
    match entry {
        IntegrationEntry::Jira(j) => verify_jira(j).await,
        IntegrationEntry::Zendesk(z) => verify_zendesk(z).await,
    }
}
