use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::time::Duration;

/// Teal accent on the posted embed.
pub const EMBED_ACCENT_COLOR: u32 = 0x008080;
pub const WEBHOOK_USERNAME: &str = "Session Analyzer";

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

// Discord webhook wire format, hence snake_case field names as-is.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookMessage {
    pub username: String,
    pub embeds: Vec<Embed>,
}

/// Posts the session embed to the configured webhook. Fire-and-forget: one
/// POST, no retries; a non-success status fails the run.
pub fn post_session_embed(webhook_url: &str, embed: Embed) -> Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .context("Failed to build the webhook HTTP client")?;

    let message = WebhookMessage {
        username: WEBHOOK_USERNAME.to_string(),
        embeds: vec![embed],
    };

    let response = client
        .post(webhook_url)
        .json(&message)
        .send()
        .context("Failed to post the session summary to the webhook")?;

    let status = response.status();
    if !status.is_success() {
        bail!("Webhook rejected the session summary with status {status}");
    }

    Ok(())
}
