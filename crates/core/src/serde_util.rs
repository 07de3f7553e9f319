//! Serde helpers for the remote API's loosely typed wire format.

use serde::{Deserialize, Deserializer};

/// Deserialize a price field defensively.
///
/// The upstream API serves prices as numbers, numeric strings, empty
/// strings, or null depending on the record's age. Anything that does not
/// parse as a number is treated as `0.0` rather than rejected — a missing
/// price must not make the whole configuration unusable.
pub fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}
