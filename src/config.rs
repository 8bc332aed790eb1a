use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::fetch::DEFAULT_METADATA_ENDPOINT;

/// Reporter configuration, read once at startup. Only the webhook URL is
/// required; everything else defaults to the conventional relative paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReporterSettings {
    pub webhook_url: String,
    #[serde(default = "default_log_list_path")]
    pub log_list_path: String,
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
    #[serde(default = "default_timeline_path")]
    pub timeline_path: String,
    #[serde(default = "default_metadata_endpoint")]
    pub metadata_endpoint: String,
}

fn default_log_list_path() -> String {
    "logs.txt".to_string()
}

fn default_catalog_path() -> String {
    "encounters.json".to_string()
}

fn default_timeline_path() -> String {
    "timeline.png".to_string()
}

fn default_metadata_endpoint() -> String {
    DEFAULT_METADATA_ENDPOINT.to_string()
}

impl ReporterSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let raw_json = std::fs::read_to_string(path).with_context(|| {
            format!("Failed to read reporter settings '{}'", path.display())
        })?;

        serde_json::from_str(&raw_json).with_context(|| {
            format!("Failed to parse reporter settings '{}'", path.display())
        })
    }
}
