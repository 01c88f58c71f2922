//! Layout anomaly logging.
//!
//! Every gig gets a deterministic log id derived from its identity fields and
//! date, so the renderer can annotate a panel with the same id the packer
//! logged even though they run independently. Ids are name-based UUIDs: no
//! randomness, no dependence on memory layout or process.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layout::measure::Measurement;
use crate::models::Gig;

const LOG_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6a1c_2f0e_58d4_4b7a_9e21_c3f5_0d8b_7e14);
const LOG_ID_PREFIX: &str = "gig-";
const LOG_ID_HEX_LEN: usize = 12;

/// Derives the stable log id for a gig on a given date.
///
/// Value-equal `(gig, date)` pairs always produce the same id. Price fields are
/// not part of the identity.
pub fn generate_log_id(gig: &Gig, date: &str) -> String {
    let key = [
        gig.id.as_str(),
        gig.name.as_str(),
        gig.venue.name.as_str(),
        gig.venue.address.as_deref().unwrap_or_default(),
        gig.start_time.as_deref().unwrap_or_default(),
        date,
    ]
    .join("\u{1f}");

    let hex = Uuid::new_v5(&LOG_ID_NAMESPACE, key.as_bytes())
        .simple()
        .to_string();
    format!("{LOG_ID_PREFIX}{}", &hex[..LOG_ID_HEX_LEN])
}

/// Whether a panel of `height` must be placed alone.
///
/// A non-positive capacity can hold nothing, so every gig overflows.
pub fn overflows(height: u32, capacity: i64) -> bool {
    capacity <= 0 || i64::from(height) > capacity
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Panel taller than the slide capacity; placed on a slide of its own.
    Overflow,
    /// Measured from placeholder text because the name or venue was missing.
    FallbackMeasured,
    /// Same log id as an earlier gig in the run; annotations are ambiguous.
    DuplicateId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub log_id: String,
    pub message: String,
    pub kind: AnomalyKind,
}

impl LogEntry {
    /// One line of the log file.
    pub fn to_line(&self) -> String {
        format!("[{}] {}", self.log_id, self.message)
    }
}

/// Collects anomalies in discovery order during one packing run.
#[derive(Debug, Default)]
pub struct AnomalyLogger {
    entries: Vec<LogEntry>,
    seen_ids: HashSet<String>,
}

impl AnomalyLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records whatever is noteworthy about one measured gig.
    ///
    /// For a single gig, entries are appended in the order overflow, fallback,
    /// duplicate.
    pub fn observe(&mut self, gig: &Gig, measurement: &Measurement, capacity: i64) {
        let log_id = generate_log_id(gig, &gig.date);
        let label = describe(gig);

        if overflows(measurement.height, capacity) {
            let message = if capacity <= 0 {
                format!(
                    "{label} placed alone: slide capacity {capacity}px is not positive (panel is {}px)",
                    measurement.height
                )
            } else {
                format!(
                    "{label} is {}px tall, exceeding the {capacity}px slide capacity; placed alone on its own slide",
                    measurement.height
                )
            };
            self.push(&log_id, message, AnomalyKind::Overflow);
        }

        if measurement.fallback {
            self.push(
                &log_id,
                format!(
                    "{label} measured with fallback text (missing name or venue), estimated {}px",
                    measurement.height
                ),
                AnomalyKind::FallbackMeasured,
            );
        }

        if !self.seen_ids.insert(log_id.clone()) {
            self.push(
                &log_id,
                format!("{label} duplicates an earlier gig with the same log id"),
                AnomalyKind::DuplicateId,
            );
        }
    }

    fn push(&mut self, log_id: &str, message: String, kind: AnomalyKind) {
        self.entries.push(LogEntry {
            log_id: log_id.to_string(),
            message,
            kind,
        });
    }

    pub fn finish(self) -> LogBook {
        LogBook::from_entries(self.entries)
    }
}

fn describe(gig: &Gig) -> String {
    let name = if gig.name.trim().is_empty() {
        "(untitled)"
    } else {
        gig.name.trim()
    };
    let venue = if gig.venue.name.trim().is_empty() {
        "(unknown venue)"
    } else {
        gig.venue.name.trim()
    };
    let date = if gig.date.is_empty() {
        "(no date)"
    } else {
        gig.date.as_str()
    };
    format!("Gig \"{name}\" at {venue} on {date}")
}

/// Ordered anomaly log plus an index from log id to its entries.
///
/// Built once per packing run. [`LogBook::get`] answers panel lookups in
/// constant time instead of scanning the log per panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogBook {
    entries: Vec<LogEntry>,
    index: HashMap<String, Vec<usize>>,
}

impl LogBook {
    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            index.entry(entry.log_id.clone()).or_default().push(i);
        }
        Self { entries, index }
    }

    /// Entries in discovery order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, log_id: &str) -> bool {
        self.index.contains_key(log_id)
    }

    /// The first entry logged under `log_id`.
    pub fn get(&self, log_id: &str) -> Option<&LogEntry> {
        self.index
            .get(log_id)
            .and_then(|positions| positions.first())
            .and_then(|&i| self.entries.get(i))
    }

    /// Every entry logged under `log_id`, in discovery order.
    pub fn entries_for<'a>(&'a self, log_id: &str) -> impl Iterator<Item = &'a LogEntry> + 'a {
        self.index
            .get(log_id)
            .into_iter()
            .flatten()
            .filter_map(|&i| self.entries.get(i))
    }

    /// Contents of the plain-text log file: one `[logId] message` line per
    /// entry, newline-separated.
    pub fn to_log_file(&self) -> String {
        self.entries
            .iter()
            .map(LogEntry::to_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Venue;
    use serde_json::json;

    fn make_gig(id: &str) -> Gig {
        Gig {
            id: id.to_string(),
            name: "the lazy eyes".to_string(),
            venue: Venue {
                name: "corner hotel".to_string(),
                address: Some("57 Swan St, Richmond VIC 3121".to_string()),
            },
            date: "2024-05-01".to_string(),
            start_time: Some("20:00".to_string()),
            price: None,
            is_free: None,
        }
    }

    fn measured(height: u32, fallback: bool) -> Measurement {
        Measurement {
            height,
            title_lines: 1,
            venue_lines: 1,
            detail_lines: 1,
            fallback,
        }
    }

    // ── generate_log_id ─────────────────────────────────────────────────────

    #[test]
    fn test_log_id_shape() {
        let id = generate_log_id(&make_gig("1"), "2024-05-01");
        assert!(id.starts_with("gig-"));
        assert_eq!(id.len(), 4 + 12);
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_log_id_is_stable_for_equal_values() {
        let a = make_gig("1");
        let b = a.clone();
        assert_eq!(generate_log_id(&a, "2024-05-01"), generate_log_id(&b, "2024-05-01"));
    }

    #[test]
    fn test_log_id_is_pinned() {
        // Changing the key layout or namespace breaks correlation with
        // previously written logs.
        let id = generate_log_id(&make_gig("1"), "2024-05-01");
        assert_eq!(id, "gig-afe8b2167aee");
    }

    #[test]
    fn test_log_id_ignores_price() {
        let a = make_gig("1");
        let mut b = a.clone();
        b.price = Some(json!(40));
        b.is_free = Some(true);
        assert_eq!(generate_log_id(&a, &a.date), generate_log_id(&b, &b.date));
    }

    #[test]
    fn test_log_id_differs_per_identity_field() {
        let base = make_gig("1");
        let mut variants = vec![base.clone()];

        let mut v = base.clone();
        v.id = "2".to_string();
        variants.push(v);
        let mut v = base.clone();
        v.name = "the lazy eyes (late show)".to_string();
        variants.push(v);
        let mut v = base.clone();
        v.venue.name = "the tote".to_string();
        variants.push(v);
        let mut v = base.clone();
        v.venue.address = None;
        variants.push(v);
        let mut v = base.clone();
        v.start_time = Some("21:00".to_string());
        variants.push(v);

        let mut ids: Vec<String> = variants
            .iter()
            .map(|g| generate_log_id(g, "2024-05-01"))
            .collect();
        ids.push(generate_log_id(&base, "2024-05-02"));

        let unique: HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len(), "ids collided: {ids:?}");
    }

    #[test]
    fn test_log_id_field_boundaries_are_unambiguous() {
        let mut a = make_gig("12");
        a.name = "3".to_string();
        let mut b = make_gig("1");
        b.name = "23".to_string();
        assert_ne!(generate_log_id(&a, "d"), generate_log_id(&b, "d"));
    }

    // ── overflows ───────────────────────────────────────────────────────────

    #[test]
    fn test_overflow_predicate() {
        assert!(!overflows(476, 476));
        assert!(overflows(477, 476));
        assert!(overflows(0, 0));
        assert!(overflows(10, -5));
    }

    // ── AnomalyLogger ───────────────────────────────────────────────────────

    #[test]
    fn test_no_entries_for_normal_gig() {
        let mut logger = AnomalyLogger::new();
        logger.observe(&make_gig("1"), &measured(95, false), 476);
        assert!(logger.finish().is_empty());
    }

    #[test]
    fn test_overflow_entry() {
        let gig = make_gig("1");
        let mut logger = AnomalyLogger::new();
        logger.observe(&gig, &measured(600, false), 476);
        let book = logger.finish();

        assert_eq!(book.len(), 1);
        let entry = &book.entries()[0];
        assert_eq!(entry.kind, AnomalyKind::Overflow);
        assert_eq!(entry.log_id, generate_log_id(&gig, &gig.date));
        assert!(entry.message.contains("600px"));
        assert!(entry.message.contains("476px"));
    }

    #[test]
    fn test_non_positive_capacity_message() {
        let mut logger = AnomalyLogger::new();
        logger.observe(&make_gig("1"), &measured(95, false), 0);
        let book = logger.finish();
        assert_eq!(book.entries()[0].kind, AnomalyKind::Overflow);
        assert!(book.entries()[0].message.contains("not positive"));
    }

    #[test]
    fn test_entry_order_for_one_gig() {
        let gig = Gig::default();
        let mut logger = AnomalyLogger::new();
        logger.observe(&gig, &measured(95, true), 476);
        logger.observe(&gig, &measured(600, true), 476);
        let kinds: Vec<AnomalyKind> = logger.finish().entries().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AnomalyKind::FallbackMeasured,
                AnomalyKind::Overflow,
                AnomalyKind::FallbackMeasured,
                AnomalyKind::DuplicateId,
            ]
        );
    }

    #[test]
    fn test_fallback_message_names_placeholders() {
        let mut logger = AnomalyLogger::new();
        logger.observe(&Gig::default(), &measured(95, true), 476);
        let book = logger.finish();
        assert!(book.entries()[0].message.contains("(untitled)"));
        assert!(book.entries()[0].message.contains("(unknown venue)"));
    }

    // ── LogBook ─────────────────────────────────────────────────────────────

    #[test]
    fn test_log_book_lookup_and_file() {
        let entries = vec![
            LogEntry {
                log_id: "gig-a".to_string(),
                message: "first".to_string(),
                kind: AnomalyKind::Overflow,
            },
            LogEntry {
                log_id: "gig-b".to_string(),
                message: "second".to_string(),
                kind: AnomalyKind::FallbackMeasured,
            },
            LogEntry {
                log_id: "gig-a".to_string(),
                message: "third".to_string(),
                kind: AnomalyKind::DuplicateId,
            },
        ];
        let book = LogBook::from_entries(entries);

        assert_eq!(book.get("gig-a").map(|e| e.message.as_str()), Some("first"));
        assert_eq!(book.get("gig-b").map(|e| e.message.as_str()), Some("second"));
        assert!(book.get("gig-c").is_none());
        assert!(book.contains("gig-b"));
        assert_eq!(book.entries_for("gig-a").count(), 2);
        assert_eq!(book.entries_for("gig-c").count(), 0);
        assert_eq!(
            book.to_log_file(),
            "[gig-a] first\n[gig-b] second\n[gig-a] third"
        );
    }

    #[test]
    fn test_empty_log_book_file_is_empty() {
        assert_eq!(LogBook::default().to_log_file(), "");
    }
}
