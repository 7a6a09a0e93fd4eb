use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::data_dir;
use crate::model::integration::GlobalIntegrations;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SnapshotData {
    #[serde(default)]
    integrations: GlobalIntegrations,
    #[serde(skip_serializing_if = "Option::is_none")]
    fetched_at: Option<String>,
}

/// Local cache of the server's integration settings. Lets the TUI paint
/// before the first fetch completes and `syncdesk show` work offline.
pub struct SnapshotStore {
    path: PathBuf,
    data: SnapshotData,
}

impl SnapshotStore {
    pub fn new() -> Result<Self> {
        Self::at(data_dir().join("integrations.json"))
    }

    pub fn at(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            SnapshotData::default()
        };
        Ok(Self { path, data })
    }

    pub fn integrations(&self) -> &GlobalIntegrations {
        &self.data.integrations
    }

    pub fn fetched_at(&self) -> Option<&str> {
        self.data.fetched_at.as_deref()
    }

    pub fn update(&mut self, integrations: GlobalIntegrations) -> Result<()> {
        self.data.integrations = integrations;
        self.data.fetched_at = Some(chrono::Utc::now().to_rfc3339());
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
