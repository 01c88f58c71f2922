use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::layout::DEFAULT_CAPACITY;

const DEFAULT_API_BASE: &str = "https://api.lml.live/gigs/query";

/// Analyzer configuration loaded from environment variables.
/// Every variable is optional; unparseable values fail at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub location: String,
    pub weeks_to_analyze: u32,
    /// Slide height budget in pixels, passed straight to the packer.
    pub slide_capacity: i64,
    /// Minimum spacing between consecutive API requests.
    pub request_interval: Duration,
    pub request_timeout: Duration,
    pub output_html: PathBuf,
    pub output_log: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            api_base: lookup("GIG_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            location: lookup("GIG_LOCATION").unwrap_or_else(|| "melbourne".to_string()),
            weeks_to_analyze: parse_or(&lookup, "WEEKS_TO_ANALYZE", 15)?,
            slide_capacity: parse_or(&lookup, "SLIDE_CAPACITY", DEFAULT_CAPACITY)?,
            request_interval: Duration::from_millis(parse_or(&lookup, "REQUEST_INTERVAL_MS", 1000)?),
            request_timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?),
            output_html: lookup("OUTPUT_HTML")
                .unwrap_or_else(|| "gig_layout_analysis.html".to_string())
                .into(),
            output_log: lookup("OUTPUT_LOG")
                .unwrap_or_else(|| "gig_layout_logs.txt".to_string())
                .into(),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}
