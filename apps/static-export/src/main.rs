//! # Knowledge Hub Static Export
//!
//! Builds the static variant of the site: publishes the seed drafts
//! through the regular write path, then renders the start page, the topic
//! pages, and one detail page per post id.

use std::sync::Arc;

use anyhow::Context;

use hub_core::services::PostReader;
use hub_infra::{InMemoryAuthBackend, InMemoryPostStore};

mod config;
mod export;
mod render;
mod seed;
mod sections;
mod telemetry;

use config::ExportConfig;
use export::SiteExporter;
use render::SiteRenderer;
use telemetry::{TelemetryConfig, init_telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = ExportConfig::from_env();
    tracing::info!(
        out_dir = %config.out_dir.display(),
        seeded = config.seed_file.is_some(),
        "Starting static export"
    );

    let store = Arc::new(InMemoryPostStore::default());
    let auth = Arc::new(InMemoryAuthBackend::default());

    let drafts = match &config.seed_file {
        Some(path) => seed::load_drafts(path).await?,
        None => Vec::new(),
    };
    seed::publish(store.clone(), auth, &config, &drafts).await?;

    let renderer = SiteRenderer::new(config.site_title.clone())
        .context("Failed to compile page templates")?;
    let exporter = SiteExporter::new(PostReader::new(store), renderer, config.out_dir.clone());
    let summary = exporter.run().await?;

    tracing::info!(
        pages = summary.pages,
        topics = summary.topics,
        skipped = summary.skipped,
        "Static export finished"
    );
    Ok(())
}
