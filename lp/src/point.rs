//! Structured data points prior to wire encoding.

use serde_json::Value;

/// A value stored in a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Numeric value. Held as f64; integral values render without a decimal
    /// point and no type suffix is emitted.
    Number(f64),
    /// Boolean value, rendered as the literals `true`/`false`.
    Boolean(bool),
    /// UTF-8 string, rendered double-quoted with internal escaping.
    Text(String),
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Number(v as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

/// One measurement event: measurement name, tag set, field set, timestamp.
///
/// Tags and fields keep insertion order and unique keys (setting an existing
/// key replaces its value). A point needs at least one field to be encodable;
/// points are built, encoded and shipped immediately, never retained.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub measurement: String,
    tags: Vec<(String, String)>,
    fields: Vec<(String, FieldValue)>,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
}

impl DataPoint {
    /// Create an empty point for the given measurement and timestamp.
    pub fn new(measurement: impl Into<String>, timestamp_ms: i64) -> Self {
        Self {
            measurement: measurement.into(),
            tags: Vec::new(),
            fields: Vec::new(),
            timestamp_ms,
        }
    }

    /// Set a tag, replacing any previous value for the same key.
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.tags.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.tags.push((key, value));
        }
        self
    }

    /// Set a field, replacing any previous value for the same key.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.fields.push((key, value));
        }
        self
    }

    pub fn tags(&self) -> &[(String, String)] {
        &self.tags
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// Decode a point from a JSON document of the shape
    /// `{"measurement": .., "tags": {..}, "fields": {..}, "timestampMs": ..}`.
    ///
    /// Null tag values and null/unrepresentable field values are skipped.
    /// Returns `None` when the document has no usable measurement.
    pub fn from_json(value: &Value) -> Option<Self> {
        let measurement = value.get("measurement")?.as_str()?;
        if measurement.is_empty() {
            return None;
        }
        let timestamp_ms = value.get("timestampMs").and_then(Value::as_i64).unwrap_or_default();

        let mut point = DataPoint::new(measurement, timestamp_ms);

        if let Some(tags) = value.get("tags").and_then(Value::as_object) {
            for (key, tag) in tags {
                if let Some(text) = json_to_tag_value(tag) {
                    point = point.tag(key, text);
                }
            }
        }

        if let Some(fields) = value.get("fields").and_then(Value::as_object) {
            for (key, field) in fields {
                if let Some(fv) = json_to_field_value(field) {
                    point = point.field(key, fv);
                }
            }
        }

        Some(point)
    }
}

/// Convert a JSON value to a tag value string. Tags are always strings;
/// null, arrays and objects are not representable.
fn json_to_tag_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Convert a JSON value to a field value with type inference.
fn json_to_field_value(value: &Value) -> Option<FieldValue> {
    match value {
        Value::Number(n) => n.as_f64().map(FieldValue::Number),
        Value::Bool(b) => Some(FieldValue::Boolean(*b)),
        Value::String(s) => Some(FieldValue::Text(s.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tag_replaces_existing_key() {
        let point = DataPoint::new("m", 1).tag("a", "1").tag("b", "2").tag("a", "3");
        assert_eq!(point.tags(), &[("a".to_string(), "3".to_string()), ("b".to_string(), "2".to_string())]);
    }

    #[test]
    fn test_field_replaces_existing_key() {
        let point = DataPoint::new("m", 1).field("x", 1.0).field("x", 2.0);
        assert_eq!(point.fields(), &[("x".to_string(), FieldValue::Number(2.0))]);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let point = DataPoint::new("m", 1).tag("z", "1").tag("a", "2");
        let keys: Vec<_> = point.tags().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn test_from_json_full() {
        let doc = json!({
            "measurement": "tasks",
            "tags": {"project": "Alpha", "count": 3},
            "fields": {"duration_ms": 3600000, "ok": true, "title": "Write"},
            "timestampMs": 1700000000000i64,
        });

        let point = DataPoint::from_json(&doc).unwrap();
        assert_eq!(point.measurement, "tasks");
        assert_eq!(point.timestamp_ms, 1700000000000);
        assert_eq!(point.tags().len(), 2);
        assert_eq!(point.fields().len(), 3);
    }

    #[test]
    fn test_from_json_skips_nulls() {
        let doc = json!({
            "measurement": "m",
            "tags": {"good": "x", "bad": null},
            "fields": {"good": 1, "bad": null, "worse": [1, 2]},
        });

        let point = DataPoint::from_json(&doc).unwrap();
        assert_eq!(point.tags().len(), 1);
        assert_eq!(point.fields().len(), 1);
    }

    #[test]
    fn test_from_json_rejects_missing_measurement() {
        assert!(DataPoint::from_json(&json!({"fields": {"x": 1}})).is_none());
        assert!(DataPoint::from_json(&json!({"measurement": "", "fields": {"x": 1}})).is_none());
    }
}
