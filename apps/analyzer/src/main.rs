mod config;
mod errors;
mod gig_source;
mod layout;
mod models;
mod pipeline;
mod render;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::gig_source::{week_windows, IntervalGate, LmlClient};
use crate::layout::default_panel_config;
use crate::pipeline::run_analysis;
use crate::render::{write_outputs, HtmlRenderer};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so RUST_LOG from .env applies to logging
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let today = Local::now().date_naive();
    let windows = week_windows(today, config.weeks_to_analyze);
    if let (Some(first), Some(last)) = (windows.first(), windows.last()) {
        info!("Analyzing gig layouts from {} to {}", first.start, last.end);
    }

    let source = LmlClient::new(&config).context("Failed to build HTTP client")?;
    let mut gate = IntervalGate::new(config.request_interval);
    let panel = default_panel_config();

    let analysis = run_analysis(
        &source,
        &mut gate,
        today,
        config.weeks_to_analyze,
        config.slide_capacity,
        panel.clone(),
    )
    .await?;

    let renderer = HtmlRenderer::new()?;
    let html = renderer.render(&analysis.outcome, config.slide_capacity, &panel)?;
    let log_text = analysis.outcome.logs.to_log_file();
    write_outputs(&config.output_html, &html, &config.output_log, &log_text).await?;

    info!(
        gigs = analysis.report.gigs,
        slides = analysis.outcome.slides.len(),
        anomalies = analysis.outcome.logs.len(),
        failed_weeks = analysis.report.failed_weeks.len(),
        "Analysis complete!"
    );

    Ok(())
}
