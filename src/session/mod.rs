mod boss;
mod wing;

pub use boss::{merge_pull, BossRecord};
pub use wing::Wing;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};

use crate::catalog::EncounterCatalog;
use crate::fetch::{MetadataClient, UploadMetadata};

/// The fully aggregated raid session: wings in start-time order, bounded by
/// the first and last recorded attempt.
#[derive(Debug, Clone)]
pub struct Session {
    pub wings: Vec<Wing>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: Duration,
}

impl Session {
    /// Sorts the initial attempt records by start time (stable, so fetch
    /// order breaks ties), partitions them into contiguous same-wing runs,
    /// and aggregates each run into a [`Wing`]. Every attempt ends up in
    /// exactly one wing.
    pub fn from_records(mut records: Vec<BossRecord>) -> Result<Self> {
        if records.is_empty() {
            bail!("Cannot build a session without any encounter attempts");
        }

        records.sort_by_key(|record| record.start_time);

        let mut wings: Vec<Wing> = Vec::new();
        let mut run_start = 0usize;
        for index in 1..records.len() {
            if records[index].wing_label != records[run_start].wing_label {
                wings.push(Wing::from_records(&records[run_start..index])?);
                run_start = index;
            }
        }
        wings.push(Wing::from_records(&records[run_start..])?);

        let start_time = records[0].start_time;
        let end_time = records[records.len() - 1].end_time;

        Ok(Self {
            wings,
            start_time,
            end_time,
            duration: end_time - start_time,
        })
    }
}

/// End-to-end session construction. The catalog and metadata client are
/// owned by the builder so nothing reaches for globals.
pub struct SessionBuilder {
    catalog: EncounterCatalog,
    client: MetadataClient,
}

impl SessionBuilder {
    pub fn new(catalog: EncounterCatalog, client: MetadataClient) -> Self {
        Self { catalog, client }
    }

    /// Fetches metadata for every log permalink in order, classifies each
    /// attempt through the encounter catalog, and aggregates the results.
    /// Any fetch, parse, or classification failure aborts the whole build.
    pub fn build(&self, log_urls: &[String]) -> Result<Session> {
        if log_urls.is_empty() {
            bail!("Cannot build a session from an empty log list");
        }

        let mut records = Vec::with_capacity(log_urls.len());
        for log_url in log_urls {
            let metadata = self.client.fetch_upload_metadata(log_url)?;
            let wing_label = self
                .catalog
                .wing_label_for_trigger(metadata.encounter.boss_id)
                .with_context(|| format!("Failed to classify report '{log_url}'"))?;
            records.push(initial_record(log_url, &metadata, wing_label)?);
            tracing::debug!(
                log_url = %log_url,
                boss = %metadata.encounter.boss,
                success = metadata.encounter.success,
                "Fetched encounter attempt"
            );
        }

        let session = Session::from_records(records)?;
        tracing::info!(
            wing_count = session.wings.len(),
            session_seconds = session.duration.num_seconds(),
            "Aggregated raid session"
        );
        Ok(session)
    }
}

fn initial_record(
    log_url: &str,
    metadata: &UploadMetadata,
    wing_label: String,
) -> Result<BossRecord> {
    let start_time = DateTime::from_timestamp(metadata.encounter_time, 0).with_context(|| {
        format!(
            "Report '{log_url}' carries an invalid encounter timestamp {}",
            metadata.encounter_time
        )
    })?;

    Ok(BossRecord::first_pull(
        log_url.to_string(),
        metadata.encounter.boss.clone(),
        metadata.encounter.is_cm,
        start_time,
        Duration::seconds(metadata.encounter.duration),
        metadata.encounter.success,
        metadata.encounter.comp_dps,
        wing_label,
    ))
}
