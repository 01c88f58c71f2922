//! Output artifacts: the paginated HTML report and the plain-text anomaly log.
//!
//! The HTML template is compiled into the binary. Its `.html` name turns on
//! minijinja's HTML auto-escaping, so gig text from the API is never
//! interpreted as markup.

use std::path::Path;

use minijinja::{context, Environment};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::layout::{generate_log_id, PackOutcome, PanelConfig, PanelText};

const TEMPLATE_NAME: &str = "analysis.html";
const TEMPLATE_SOURCE: &str = include_str!("../../templates/analysis.html");

#[derive(Debug, Serialize)]
struct SlideView {
    panels: Vec<PanelView>,
}

#[derive(Debug, Serialize)]
struct PanelView {
    text: PanelText,
    /// Present only when the log holds an entry for this gig.
    log_id: Option<String>,
    /// Every message logged under `log_id`, joined.
    log_message: Option<String>,
}

/// CSS lengths for the panel geometry, so the page lays text out the way
/// the packer measured it.
#[derive(Debug, Serialize)]
struct PanelStyle {
    width: String,
    title_font: String,
    title_line: String,
    title_gap: String,
    body_font: String,
    body_line: String,
}

impl PanelStyle {
    fn from_config(panel: &PanelConfig) -> Self {
        Self {
            width: px(panel.content_width_px),
            title_font: px(panel.title_font_px),
            title_line: format!("{}px", panel.title_line_px),
            title_gap: format!("{}px", panel.title_gap_px),
            body_font: px(panel.body_font_px),
            body_line: format!("{}px", panel.body_line_px),
        }
    }
}

fn px(value: f32) -> String {
    format!("{value}px")
}

pub struct HtmlRenderer {
    env: Environment<'static>,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self, AppError> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, TEMPLATE_SOURCE)?;
        Ok(Self { env })
    }

    /// Renders one block per slide and one panel per gig. Panels whose log id
    /// appears in the outcome's log are annotated with it.
    ///
    /// Panel width, font sizes and line heights come from `panel`, the same
    /// geometry the packer measured with.
    pub fn render(
        &self,
        outcome: &PackOutcome,
        capacity: i64,
        panel: &PanelConfig,
    ) -> Result<String, AppError> {
        let slides: Vec<SlideView> = outcome
            .slides
            .iter()
            .map(|slide| SlideView {
                panels: slide
                    .gigs
                    .iter()
                    .map(|gig| {
                        let log_id = generate_log_id(gig, &gig.date);
                        if !outcome.logs.contains(&log_id) {
                            return PanelView {
                                text: PanelText::from_gig(gig),
                                log_id: None,
                                log_message: None,
                            };
                        }
                        let messages: Vec<&str> = outcome
                            .logs
                            .entries_for(&log_id)
                            .map(|e| e.message.as_str())
                            .collect();
                        PanelView {
                            text: PanelText::from_gig(gig),
                            log_message: Some(messages.join("; ")),
                            log_id: Some(log_id),
                        }
                    })
                    .collect(),
            })
            .collect();

        let gig_count: usize = outcome.slides.iter().map(|s| s.gigs.len()).sum();

        let html = self.env.get_template(TEMPLATE_NAME)?.render(context! {
            slides => slides,
            gig_count => gig_count,
            capacity => capacity,
            anomaly_count => outcome.logs.len(),
            style => PanelStyle::from_config(panel),
        })?;
        Ok(html)
    }
}

/// Writes the HTML report and the log file.
pub async fn write_outputs(
    html_path: &Path,
    html: &str,
    log_path: &Path,
    log_text: &str,
) -> Result<(), AppError> {
    write_file(html_path, html).await?;
    info!("HTML file written to {}", html_path.display());
    write_file(log_path, log_text).await?;
    info!("Logs written to {}", log_path.display());
    Ok(())
}

async fn write_file(path: &Path, contents: &str) -> Result<(), AppError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| AppError::Output {
            path: path.display().to_string(),
            source,
        })
}
