use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single gig as returned by the listing API.
///
/// Every field defaults so a partial record never fails the whole week's
/// response. Formatting and measurement treat empty strings as missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Gig {
    /// Upstream identifier. Some listings send numbers, others strings.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub venue: Venue,
    /// ISO date (`YYYY-MM-DD`) as sent upstream. Kept verbatim so a malformed
    /// date still correlates with its log entry.
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default)]
    pub start_time: Option<String>,
    /// Raw price data: absent, a number, a numeric string, a `[lo, hi]` pair,
    /// a `{min, max}` object or free-form text.
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub is_free: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Venue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}
