//! Display formatting for gig panels.
//!
//! These functions run before measurement: the estimator sizes exactly the
//! text the renderer prints. All of them are total — malformed or missing
//! input maps to a documented fallback, never an error.

use serde::Serialize;
use serde_json::Value;

use crate::models::Gig;

/// Returned by [`format_price`] when no usable price data exists.
pub const PRICE_FALLBACK: &str = "Check venue";
pub const FREE_LABEL: &str = "Free";

const STATE_TOKENS: [&str; 8] = ["VIC", "NSW", "QLD", "SA", "WA", "TAS", "NT", "ACT"];

/// Shown when a gig has no start time.
pub const DEFAULT_START_TIME: &str = "23:59";

/// The three text blocks of a gig panel, exactly as rendered.
///
/// Measurement and rendering both go through this type so the estimated
/// height always describes the printed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelText {
    pub title: String,
    /// `"{Venue} • {suburb}"`, or whichever part is non-empty.
    pub venue_line: String,
    /// `"{start time} • {price}"`.
    pub detail_line: String,
}

impl PanelText {
    pub fn from_gig(gig: &Gig) -> Self {
        let venue = to_title_case(gig.venue.name.trim());
        let suburb = get_suburb(gig.venue.address.as_deref());
        let venue_line = [venue.as_str(), suburb.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" • ");

        let start_time = gig
            .start_time
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_START_TIME);

        Self {
            title: to_title_case(gig.name.trim()),
            venue_line,
            detail_line: format!("{start_time} • {}", format_price(gig)),
        }
    }
}

/// Upper-cases the first letter of each word and lower-cases the rest.
///
/// Word boundaries are whitespace, `-`, `/`, `(` and `"`. Whitespace is
/// preserved as-is. Idempotent.
pub fn to_title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for c in text.chars() {
        if at_word_start && c.is_alphanumeric() {
            // Multi-char uppercase expansions (e.g. ß → SS) keep only the
            // first char upper so a second pass is a no-op.
            let mut upper = c.to_uppercase();
            if let Some(first) = upper.next() {
                out.push(first);
            }
            out.extend(upper.flat_map(char::to_lowercase));
            at_word_start = false;
        } else if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
            at_word_start = is_word_boundary(c);
        }
    }
    out
}

fn is_word_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, '-' | '/' | '(' | '"')
}

/// Extracts the locality from a free-form street address.
///
/// `"57 Swan St, Richmond VIC 3121"` → `"Richmond"`. The street segment (before
/// the first comma) is never a suburb; trailing state codes, postcodes and
/// `Australia` are stripped. Returns `""` when nothing is left.
pub fn get_suburb(address: Option<&str>) -> String {
    let Some(address) = address else {
        return String::new();
    };

    let segments: Vec<&str> = address
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    segments
        .iter()
        .skip(1)
        .rev()
        .map(|segment| strip_locality_noise(segment))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

fn strip_locality_noise(segment: &str) -> String {
    let mut words: Vec<&str> = segment.split_whitespace().collect();
    while let Some(last) = words.last() {
        if is_locality_noise(last) {
            words.pop();
        } else {
            break;
        }
    }
    words.join(" ")
}

fn is_locality_noise(word: &str) -> bool {
    let is_postcode = word.len() == 4 && word.bytes().all(|b| b.is_ascii_digit());
    is_postcode
        || word.eq_ignore_ascii_case("australia")
        || STATE_TOKENS.iter().any(|s| word.eq_ignore_ascii_case(s))
}

/// Derives the price label for a gig.
///
/// Precedence: numeric price (or range) → currency; free flag or "free" text →
/// [`FREE_LABEL`]; other non-empty text → the text; otherwise
/// [`PRICE_FALLBACK`].
pub fn format_price(gig: &Gig) -> String {
    if let Some((lo, hi)) = gig.price.as_ref().and_then(numeric_price) {
        return if lo == hi {
            if lo == 0 {
                FREE_LABEL.to_string()
            } else {
                format_cents(lo)
            }
        } else {
            format!("{}–{}", format_cents(lo), format_cents(hi))
        };
    }

    let text = match &gig.price {
        Some(Value::String(s)) => s.trim(),
        _ => "",
    };

    if gig.is_free == Some(true) || text.to_lowercase().contains("free") {
        return FREE_LABEL.to_string();
    }
    if !text.is_empty() {
        return text.to_string();
    }
    PRICE_FALLBACK.to_string()
}

/// Returns `(lo, hi)` in whole cents when the price carries a usable amount.
fn numeric_price(value: &Value) -> Option<(u64, u64)> {
    let (lo, hi) = match value {
        Value::Number(n) => {
            let v = n.as_f64()?;
            (v, v)
        }
        Value::String(s) => parse_price_text(s)?,
        Value::Array(items) => {
            let amounts: Vec<f64> = items.iter().filter_map(amount).collect();
            let lo = amounts.iter().copied().reduce(f64::min)?;
            let hi = amounts.iter().copied().reduce(f64::max)?;
            (lo, hi)
        }
        Value::Object(map) => {
            let min = map.get("min").and_then(amount);
            let max = map.get("max").and_then(amount);
            match (min, max) {
                (Some(lo), Some(hi)) => (lo, hi),
                (Some(v), None) | (None, Some(v)) => (v, v),
                (None, None) => return None,
            }
        }
        _ => return None,
    };

    let (lo, hi) = (to_cents(lo)?, to_cents(hi)?);
    Some((lo.min(hi), lo.max(hi)))
}

fn amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_amount(s),
        _ => None,
    }
}

/// Accepts `"25"`, `"$25.50"` and ranges like `"$20-$30"` or `"20–30"`.
fn parse_price_text(text: &str) -> Option<(f64, f64)> {
    if let Some(v) = parse_amount(text) {
        return Some((v, v));
    }
    let (lo, hi) = text.split_once(|c: char| c == '-' || c == '–')?;
    Some((parse_amount(lo)?, parse_amount(hi)?))
}

fn parse_amount(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    trimmed.parse::<f64>().ok()
}

fn to_cents(v: f64) -> Option<u64> {
    if !v.is_finite() || v < 0.0 || v > 1e12 {
        return None;
    }
    Some((v * 100.0).round() as u64)
}

fn format_cents(cents: u64) -> String {
    if cents % 100 == 0 {
        format!("${}", cents / 100)
    } else {
        format!("${}.{:02}", cents / 100, cents % 100)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
