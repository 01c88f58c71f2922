//! Panel height estimation.
//!
//! A [`MeasurementContainer`] stands in for the off-screen element a browser
//! would lay a panel out in: it is sized to the panel width once and reused
//! for every gig. It holds no mutable state, so measurements are independent
//! of call order and the container can be shared across threads.

use serde::Serialize;

use crate::layout::font_metrics::{sans_metrics, FontMetricTable, PanelConfig};
use crate::layout::format::PanelText;
use crate::models::Gig;

/// Estimated layout of one gig panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Measurement {
    /// Total panel height in pixels, chrome included.
    pub height: u32,
    pub title_lines: u32,
    pub venue_lines: u32,
    pub detail_lines: u32,
    /// Set when the gig had no name or no venue and was sized from
    /// placeholder minimums.
    pub fallback: bool,
}

/// Anything that can size a gig panel. The packer only sees this trait.
pub trait HeightEstimator {
    fn measure(&self, gig: &Gig) -> Measurement;
}

impl<F> HeightEstimator for F
where
    F: Fn(&Gig) -> Measurement,
{
    fn measure(&self, gig: &Gig) -> Measurement {
        self(gig)
    }
}

/// Reusable, immutable measurement context for one panel geometry.
pub struct MeasurementContainer {
    metrics: &'static FontMetricTable,
    config: PanelConfig,
}

/// Creates a measurement context sized to `config`'s panel width.
pub fn create_measurement_container(config: PanelConfig) -> MeasurementContainer {
    MeasurementContainer {
        metrics: sans_metrics(),
        config,
    }
}

impl MeasurementContainer {
    /// Estimates the rendered height of `gig`'s panel.
    pub fn measure_gig_height(&self, gig: &Gig) -> Measurement {
        let text = PanelText::from_gig(gig);
        let config = &self.config;
        let width = config.content_width_px;

        let title_lines = self
            .metrics
            .wrapped_lines(
                &text.title,
                config.title_font_px * config.title_bold_scale,
                width,
            )
            .max(1);
        let venue_lines = self
            .metrics
            .wrapped_lines(&text.venue_line, config.body_font_px, width)
            .max(1);
        let detail_lines = self
            .metrics
            .wrapped_lines(&text.detail_line, config.body_font_px, width)
            .max(1);

        let height = config.chrome_px
            + title_lines * config.title_line_px
            + config.title_gap_px
            + (venue_lines + detail_lines) * config.body_line_px;

        Measurement {
            height,
            title_lines,
            venue_lines,
            detail_lines,
            fallback: text.title.is_empty() || gig.venue.name.trim().is_empty(),
        }
    }
}

impl HeightEstimator for MeasurementContainer {
    fn measure(&self, gig: &Gig) -> Measurement {
        self.measure_gig_height(gig)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
