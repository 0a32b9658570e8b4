//! Task → data point enrichment.

use lineproto::DataPoint;

use crate::cache::MetadataCache;
use crate::domain::TaskRecord;

/// Context tag value for tasks with no tags at all.
pub const DEFAULT_CONTEXT: &str = "Default";

/// Current wall clock in epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Build the data point for one task.
///
/// Deterministic and total: every absent or malformed input degrades to a
/// documented default, so the same task and cache state always produce the
/// same point. Only the first tag id is represented as the `context` tag;
/// the remaining tags are not exported (known limitation of the data model).
///
/// The timestamp is the task's update time, falling back to creation time,
/// falling back to `now_ms`.
pub fn enrich(task: &TaskRecord, cache: &MetadataCache, measurement: &str, now_ms: i64) -> DataPoint {
    let spent = task.time_spent_ms;
    let estimate = task.time_estimate_ms;

    // Guarded division: no infinities or NaN can leave this path
    let efficiency = match (spent, estimate) {
        (Some(spent), Some(estimate)) if estimate > 0.0 => spent / estimate,
        _ => 1.0,
    };

    let context = task
        .tag_ids
        .first()
        .map(|id| cache.tag_name(id))
        .unwrap_or_else(|| DEFAULT_CONTEXT.to_string());

    let timestamp_ms = task.updated_at.or(task.created_at).unwrap_or(now_ms);

    DataPoint::new(measurement, timestamp_ms)
        .tag("project", cache.project_name(task.project_id.as_deref()))
        .tag("context", context)
        .tag("task_id", task.id.clone().unwrap_or_else(|| "unknown".to_string()))
        .tag("is_done", if task.is_done { "true" } else { "false" })
        .field("duration_ms", spent.unwrap_or(0.0))
        .field("title", task.title.clone().unwrap_or_else(|| "Untitled".to_string()))
        .field("estimate_ms", estimate.unwrap_or(0.0))
        .field("efficiency_ratio", efficiency)
}
