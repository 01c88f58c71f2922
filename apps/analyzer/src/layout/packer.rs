//! Slide packing — splits the chronological gig list into height-bounded slides.
//!
//! A single greedy forward pass. Input order is chronology and is never
//! changed; a slide boundary is final once decided. This is deliberately not
//! first-fit-decreasing: better fill would scramble the dates.
//!
//! # Packing rules
//! - A gig joins the current slide when `running + height <= capacity`.
//! - Otherwise the current slide is closed and the gig starts a new one.
//! - A gig taller than the capacity on its own gets a slide to itself
//!   (overflow singleton) and an anomaly entry.
//! - A non-positive capacity makes every gig an overflow singleton.

use serde::Serialize;
use tracing::{debug, info};

use crate::layout::anomaly::{overflows, AnomalyLogger, LogBook};
use crate::layout::measure::HeightEstimator;
use crate::models::Gig;

/// Default slide capacity of the reference deployment, in pixels.
pub const DEFAULT_CAPACITY: i64 = 476;

/// One visual page of gig panels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slide {
    pub gigs: Vec<Gig>,
    /// Sum of the member panels' estimated heights.
    pub height: u64,
}

impl Slide {
    /// True for a slide holding one gig that alone exceeds `capacity`.
    pub fn is_overflow_singleton(&self, capacity: i64) -> bool {
        self.gigs.len() == 1 && (capacity <= 0 || self.height > capacity as u64)
    }
}

/// Result of one packing run. Owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct PackOutcome {
    pub slides: Vec<Slide>,
    pub logs: LogBook,
}

/// Packs `gigs` into slides of at most `capacity` pixels, measuring each gig
/// with `estimator`.
///
/// Concatenating the returned slides yields `gigs` unchanged.
pub fn build_slides<E>(gigs: Vec<Gig>, capacity: i64, estimator: &E) -> PackOutcome
where
    E: HeightEstimator + ?Sized,
{
    let total_gigs = gigs.len();
    let mut logger = AnomalyLogger::new();
    let mut slides: Vec<Slide> = Vec::new();
    let mut current: Vec<Gig> = Vec::new();
    let mut running: u64 = 0;

    for gig in gigs {
        let measurement = estimator.measure(&gig);
        logger.observe(&gig, &measurement, capacity);
        let height = u64::from(measurement.height);

        if overflows(measurement.height, capacity) {
            close_slide(&mut slides, &mut current, &mut running);
            debug!(
                slide = slides.len() + 1,
                height, capacity, "Overflow singleton"
            );
            slides.push(Slide {
                gigs: vec![gig],
                height,
            });
            continue;
        }

        // `overflows` returned false, so capacity is positive here.
        if running + height <= capacity as u64 {
            current.push(gig);
            running += height;
        } else {
            close_slide(&mut slides, &mut current, &mut running);
            current.push(gig);
            running = height;
        }
    }
    close_slide(&mut slides, &mut current, &mut running);

    let logs = logger.finish();
    info!(
        gigs = total_gigs,
        slides = slides.len(),
        anomalies = logs.len(),
        capacity,
        "Packed gigs into slides"
    );

    PackOutcome { slides, logs }
}

fn close_slide(slides: &mut Vec<Slide>, current: &mut Vec<Gig>, running: &mut u64) {
    if current.is_empty() {
        return;
    }
    debug!(
        slide = slides.len() + 1,
        gigs = current.len(),
        height = *running,
        "Closed slide"
    );
    slides.push(Slide {
        gigs: std::mem::take(current),
        height: *running,
    });
    *running = 0;
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
