//! Line protocol encoding.
//!
//! Line shape:
//! ```text
//! measurement,tag1=val1,tag2=val2 field1=val1,field2=val2 timestamp_ms
//! ```
//!
//! Tags keep insertion order. A point whose fields all filter away has no
//! valid wire form; [`encode`] returns `None` for it and the caller must drop
//! the point silently rather than send it.

use crate::point::{DataPoint, FieldValue};

/// Escape spaces, commas and equals signs with a preceding backslash.
///
/// Single left-to-right pass: each occurrence gets exactly one backslash
/// inserted immediately before it.
fn escape_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, ' ' | ',' | '=') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Render a number without a trailing `.0` for integral values.
fn format_number(n: f64) -> String {
    // 2^53: beyond this an f64 no longer holds exact integers
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Format a field value for the wire.
fn format_field_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Number(n) => format_number(*n),
        FieldValue::Boolean(true) => "true".to_string(),
        FieldValue::Boolean(false) => "false".to_string(),
        FieldValue::Text(s) => {
            // Backslashes before quotes; the other order would double-escape
            // the backslashes introduced for the quotes.
            let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{}\"", escaped)
        }
    }
}

/// Encode one point as a line protocol line.
///
/// Tags with empty values are omitted; if none survive, the tag section and
/// its leading comma are omitted too. Returns `None` when no fields survive,
/// the one legitimate no-output case.
pub fn encode(point: &DataPoint) -> Option<String> {
    if point.fields().is_empty() {
        return None;
    }

    let mut line = escape_component(&point.measurement);

    for (key, value) in point.tags() {
        if value.is_empty() {
            continue;
        }
        line.push(',');
        line.push_str(&escape_component(key));
        line.push('=');
        line.push_str(&escape_component(value));
    }

    line.push(' ');
    let fields: Vec<String> = point
        .fields()
        .iter()
        .map(|(key, value)| format!("{}={}", escape_component(key), format_field_value(value)))
        .collect();
    line.push_str(&fields.join(","));

    line.push(' ');
    line.push_str(&point.timestamp_ms.to_string());

    Some(line)
}

/// Encode a batch, dropping unencodable points, joined with newlines.
///
/// An empty result means nothing survived and no request should be made.
pub fn encode_batch(points: &[DataPoint]) -> String {
    points.iter().filter_map(encode).collect::<Vec<_>>().join("\n")
}
