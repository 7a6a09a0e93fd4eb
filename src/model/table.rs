use serde::{Deserialize, Serialize};

use crate::model::integration::{IntegrationKind, Integrations};

/// `kind` plus `original_index` (the entry's position in its source list)
/// is the row's identity; edits and deletes resolve through it, never
/// through the display position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationRow {
    pub original_index: usize,
    #[serde(rename = "type")]
    pub kind: IntegrationKind,
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub api_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_failing_policies: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_software_vulnerabilities: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_index: Option<usize>,
}

impl IntegrationRow {
    // Project key for Jira, group id for Zendesk.
    pub fn destination(&self) -> String {
        match self.kind {
            IntegrationKind::Jira => self.project_key.clone().unwrap_or_default(),
            IntegrationKind::Zendesk => self
                .group_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
        }
    }

    pub fn identity(&self) -> &str {
        match self.kind {
            IntegrationKind::Jira => self.username.as_deref().unwrap_or(""),
            IntegrationKind::Zendesk => self.email.as_deref().unwrap_or(""),
        }
    }
}

/// Display name for a row, matching the convention in the management UI.
fn row_name(url: &str, destination: &str) -> String {
    format!("{url} - {destination}")
}

// Jira entries first, then Zendesk. original_index counts within each
// source list; table_index over the combined display order.
pub fn table_rows(integrations: &Integrations) -> Vec<IntegrationRow> {
    let mut rows = Vec::with_capacity(integrations.len());

    for (i, jira) in integrations.jira.iter().enumerate() {
        rows.push(IntegrationRow {
            original_index: i,
            kind: IntegrationKind::Jira,
            name: row_name(&jira.url, &jira.project_key),
            url: jira.url.clone(),
            username: Some(jira.username.clone()),
            email: None,
            api_token: jira.api_token.clone(),
            project_key: Some(jira.project_key.clone()),
            group_id: None,
            enable_failing_policies: jira.enable_failing_policies,
            enable_software_vulnerabilities: jira.enable_software_vulnerabilities,
            table_index: None,
        });
    }

    for (i, zendesk) in integrations.zendesk.iter().enumerate() {
        rows.push(IntegrationRow {
            original_index: i,
            kind: IntegrationKind::Zendesk,
            name: row_name(&zendesk.url, &zendesk.group_id.to_string()),
            url: zendesk.url.clone(),
            username: None,
            email: Some(zendesk.email.clone()),
            api_token: zendesk.api_token.clone(),
            project_key: None,
            group_id: Some(zendesk.group_id),
            enable_failing_policies: zendesk.enable_failing_policies,
            enable_software_vulnerabilities: zendesk.enable_software_vulnerabilities,
            table_index: None,
        });
    }

    for (i, row) in rows.iter_mut().enumerate() {
        row.table_index = Some(i);
    }

    rows
}

/// Original indices are identities, not positions, so a pure reorder
/// renumbers `table_index` and never touches them.
pub fn move_row(rows: &mut [IntegrationRow], from: usize, to: usize) {
    if from >= rows.len() || to >= rows.len() || from == to {
        return;
    }
    if from < to {
        rows[from..=to].rotate_left(1);
    } else {
        rows[to..=from].rotate_right(1);
    }
    for (i, row) in rows.iter_mut().enumerate() {
        row.table_index = Some(i);
    }
}
