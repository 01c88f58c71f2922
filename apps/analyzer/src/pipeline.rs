//! Analysis pipeline: fetch every week, pack once, hand the outcome to the
//! renderer.
//!
//! Weeks are fetched strictly one after another, each gated by the injected
//! [`RateGate`]. A failed week contributes no gigs and is recorded in the
//! [`FetchReport`]; it never aborts the run.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::gig_source::{week_windows, GigSource, RateGate, WeekWindow};
use crate::layout::{build_slides, create_measurement_container, PackOutcome, PanelConfig};
use crate::models::Gig;

/// What happened while fetching.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FetchReport {
    pub weeks: usize,
    pub failed_weeks: Vec<WeekWindow>,
    pub gigs: usize,
}

#[derive(Debug)]
pub struct Analysis {
    pub outcome: PackOutcome,
    pub report: FetchReport,
}

/// Fetches `windows` in order and concatenates their gigs.
pub async fn collect_gigs<S, G>(
    source: &S,
    gate: &mut G,
    windows: &[WeekWindow],
) -> (Vec<Gig>, FetchReport)
where
    S: GigSource + ?Sized,
    G: RateGate + ?Sized,
{
    let mut gigs = Vec::new();
    let mut report = FetchReport {
        weeks: windows.len(),
        ..FetchReport::default()
    };

    for (i, window) in windows.iter().enumerate() {
        info!("Fetching week {}/{} ({window})...", i + 1, windows.len());
        gate.ready().await;

        match source.fetch_week(window).await {
            Ok(week) => gigs.extend(week),
            Err(e) => {
                warn!(week = %window, error = %e, "Failed to fetch gigs; continuing without this week");
                report.failed_weeks.push(*window);
            }
        }
    }

    report.gigs = gigs.len();
    (gigs, report)
}

/// Runs a full analysis over the `weeks` weeks before `today`.
///
/// Packing is CPU-bound and runs inside `spawn_blocking`.
pub async fn run_analysis<S, G>(
    source: &S,
    gate: &mut G,
    today: NaiveDate,
    weeks: u32,
    capacity: i64,
    panel: PanelConfig,
) -> Result<Analysis, AppError>
where
    S: GigSource + ?Sized,
    G: RateGate + ?Sized,
{
    let windows = week_windows(today, weeks);
    let (gigs, report) = collect_gigs(source, gate, &windows).await;

    if !report.failed_weeks.is_empty() {
        warn!(
            failed = report.failed_weeks.len(),
            weeks = report.weeks,
            "Some weeks could not be fetched; results are partial"
        );
    }

    let outcome = tokio::task::spawn_blocking(move || {
        let container = create_measurement_container(panel);
        build_slides(gigs, capacity, &container)
    })
    .await?;

    Ok(Analysis { outcome, report })
}
