use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_METADATA_ENDPOINT: &str = "https://dps.report/getUploadMetadata";

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Wire mirror of the reporting service's upload metadata payload. Only the
/// fields the aggregation needs are modeled; the rest of the payload is
/// ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMetadata {
    pub encounter_time: i64,
    pub encounter: EncounterMetadata,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterMetadata {
    pub boss_id: u64,
    pub duration: i64,
    pub boss: String,
    pub is_cm: bool,
    pub comp_dps: i64,
    pub success: bool,
}

/// Synchronous client for the reporting service. One GET per permalink, in
/// input order; the underlying connection pool is reused across fetches.
pub struct MetadataClient {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl MetadataClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("Failed to build the reporting service HTTP client")?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn fetch_upload_metadata(&self, permalink: &str) -> Result<UploadMetadata> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("permalink", permalink)])
            .send()
            .with_context(|| format!("Failed to fetch report metadata for '{permalink}'"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("Reporting service returned status {status} for '{permalink}'");
        }

        response
            .json::<UploadMetadata>()
            .with_context(|| format!("Failed to parse report metadata for '{permalink}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::UploadMetadata;

    #[test]
    fn deserializes_the_upload_metadata_payload() {
        let raw_json = r#"{
            "permalink": "https://dps.report/abcd-20260222-203000_vg",
            "encounterTime": 1771790400,
            "encounter": {
                "bossId": 15438,
                "duration": 212,
                "boss": "Vale Guardian",
                "isCm": false,
                "compDps": 178000,
                "success": true,
                "numberOfPlayers": 10
            }
        }"#;

        let metadata: UploadMetadata =
            serde_json::from_str(raw_json).expect("Expected upload metadata to deserialize");

        assert_eq!(metadata.encounter_time, 1771790400);
        assert_eq!(metadata.encounter.boss_id, 15438);
        assert_eq!(metadata.encounter.duration, 212);
        assert_eq!(metadata.encounter.boss, "Vale Guardian");
        assert!(!metadata.encounter.is_cm);
        assert_eq!(metadata.encounter.comp_dps, 178000);
        assert!(metadata.encounter.success);
    }
}
