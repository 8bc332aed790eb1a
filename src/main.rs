mod catalog;
mod config;
mod fetch;
mod report;
mod session;
mod timeline;
mod webhook;

use anyhow::{bail, Context, Result};
use std::path::Path;

const SETTINGS_PATH: &str = "settings.json";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = config::ReporterSettings::load(Path::new(SETTINGS_PATH))?;
    let encounter_catalog = catalog::EncounterCatalog::load(Path::new(&settings.catalog_path))?;
    let log_urls = read_log_list(Path::new(&settings.log_list_path))?;
    tracing::info!(log_count = log_urls.len(), "Building raid session from report logs");

    let metadata_client = fetch::MetadataClient::new(&settings.metadata_endpoint)?;
    let session_builder = session::SessionBuilder::new(encounter_catalog, metadata_client);
    let session = session_builder.build(&log_urls)?;

    print!("{session}");

    timeline::write_timeline_png(&session, Path::new(&settings.timeline_path))?;
    tracing::info!(timeline_path = %settings.timeline_path, "Wrote session timeline chart");

    let embed = report::session_embed(&session);
    webhook::post_session_embed(&settings.webhook_url, embed)?;
    tracing::info!("Posted session summary to the webhook");

    Ok(())
}

/// Reads the newline-delimited list of report permalinks. Lines are trimmed
/// and blank lines skipped; a list with no usable lines fails fast before
/// any fetch happens.
fn read_log_list(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read log list '{}'", path.display()))?;

    let log_urls: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if log_urls.is_empty() {
        bail!("Log list '{}' contains no report URLs", path.display());
    }

    Ok(log_urls)
}
