//! Helpers for reading loosely-shaped carrier responses.

use crate::error::{CarrierOperation, ProviderError};
use chrono::{DateTime, NaiveDateTime, Utc};
use omniship_shared::ProviderKind;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a carrier timestamp. Accepts RFC 3339, or a naive
/// `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DD HH:MM:SS` taken as UTC.
pub fn parse_carrier_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Timestamp of a tracking event; an unreadable one makes the whole response malformed
pub fn event_timestamp(provider: ProviderKind, raw: Option<&str>) -> Result<DateTime<Utc>, ProviderError> {
    let raw = raw.unwrap_or_default();
    parse_carrier_timestamp(raw).ok_or_else(|| {
        ProviderError::malformed(
            provider,
            CarrierOperation::Track,
            format!("unreadable event timestamp {:?}", raw),
        )
    })
}

/// Carrier ids arrive as strings from some APIs and as numbers from others
pub fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

/// First candidate that is present and non-blank
pub fn first_present<I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}
