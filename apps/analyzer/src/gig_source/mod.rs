/// Gig source — fetches one week of gig listings at a time.
///
/// The pipeline only talks to the `GigSource` trait; `LmlClient` is the
/// production implementation against the live listing API. There is no retry
/// here: a failed week is reported and skipped by the caller.
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::models::Gig;

pub mod rate_gate;

pub use rate_gate::{IntervalGate, RateGate};

const DAYS_PER_WINDOW: u64 = 7;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A half-open 7-day query window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl std::fmt::Display for WeekWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Consecutive weekly windows covering the `weeks` weeks before `today`.
pub fn week_windows(today: NaiveDate, weeks: u32) -> Vec<WeekWindow> {
    let span = DAYS_PER_WINDOW * u64::from(weeks);
    let Some(first) = today.checked_sub_days(Days::new(span)) else {
        return Vec::new();
    };

    (0..u64::from(weeks))
        .filter_map(|week| {
            let start = first.checked_add_days(Days::new(week * DAYS_PER_WINDOW))?;
            let end = start.checked_add_days(Days::new(DAYS_PER_WINDOW))?;
            Some(WeekWindow { start, end })
        })
        .collect()
}

#[async_trait]
pub trait GigSource: Send + Sync {
    async fn fetch_week(&self, window: &WeekWindow) -> Result<Vec<Gig>, FetchError>;
}

/// Client for the live gig-listing API.
#[derive(Clone)]
pub struct LmlClient {
    client: Client,
    api_base: String,
    location: String,
}

impl LmlClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        Ok(Self {
            client: Client::builder().timeout(config.request_timeout).build()?,
            api_base: config.api_base.clone(),
            location: config.location.clone(),
        })
    }

    /// `{api_base}?location=…&date_from=YYYY-MM-DD&date_to=YYYY-MM-DD`
    pub fn week_url(&self, window: &WeekWindow) -> Result<Url, FetchError> {
        let date_from = window.start.format("%Y-%m-%d").to_string();
        let date_to = window.end.format("%Y-%m-%d").to_string();
        Ok(Url::parse_with_params(
            &self.api_base,
            &[
                ("location", self.location.as_str()),
                ("date_from", date_from.as_str()),
                ("date_to", date_to.as_str()),
            ],
        )?)
    }
}

#[async_trait]
impl GigSource for LmlClient {
    async fn fetch_week(&self, window: &WeekWindow) -> Result<Vec<Gig>, FetchError> {
        let url = self.week_url(window)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let gigs: Vec<Gig> = serde_json::from_str(&body)?;
        debug!(week = %window, gigs = gigs.len(), "Fetched week");
        Ok(gigs)
    }
}
