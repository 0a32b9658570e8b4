//! Lenient decoding of host task records.
//!
//! Task records arrive as loosely-typed camelCase JSON and any field may be
//! absent or malformed. Decoding is total: a malformed field becomes an
//! absence, never an error, so downstream enrichment can degrade to its
//! documented defaults.

use chrono::DateTime;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Project row fetched from the host for the metadata cache.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectRef {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
}

/// Tag row fetched from the host for the metadata cache.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TagRef {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
}

/// One task as reported by the host. Read-only input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,

    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,

    #[serde(deserialize_with = "lenient_string")]
    pub project_id: Option<String>,

    #[serde(deserialize_with = "lenient_string_list")]
    pub tag_ids: Vec<String>,

    #[serde(deserialize_with = "lenient_bool")]
    pub is_done: bool,

    /// Present only when the host sent an actual number.
    #[serde(deserialize_with = "lenient_number")]
    pub time_spent_ms: Option<f64>,

    #[serde(deserialize_with = "lenient_number")]
    pub time_estimate_ms: Option<f64>,

    /// Epoch milliseconds; absent when unparseable.
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<i64>,

    #[serde(deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<i64>,
}

impl TaskRecord {
    /// Decode from an arbitrary JSON value. Non-object input yields the
    /// all-absent record.
    pub fn from_value(value: &Value) -> TaskRecord {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

/// String or stringified number; empty strings count as absent.
fn string_ish(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// JS-style truthiness.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(string_ish(&value))
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(items) => Ok(items.iter().filter_map(string_ish).collect()),
        _ => Ok(Vec::new()),
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(truthy(&value))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(n) => Ok(n.as_f64()),
        _ => Ok(None),
    }
}

/// Epoch-milliseconds number or RFC3339 string.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(n) => Ok(n.as_f64().map(|v| v as i64)),
        Value::String(s) => Ok(DateTime::parse_from_rfc3339(&s).ok().map(|dt| dt.timestamp_millis())),
        _ => Ok(None),
    }
}
