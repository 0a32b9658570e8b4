//! Inbound event shapes.
//!
//! Lifecycle events come from host hooks; control messages come from the
//! host UI surface as `{ "type": ..., ... }` objects. Unrecognized or
//! malformed messages decode to `None` and are ignored without error.

use serde::Deserialize;
use serde_json::Value;

use crate::config::BridgeConfig;
use crate::domain::TaskRecord;

/// One inbound event from the host.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HostEvent {
    /// A task was marked done.
    TaskCompleted { task: TaskRecord },

    /// The active task changed.
    CurrentTaskChanged { task: TaskRecord },

    /// A task was edited. High-frequency; debounced downstream.
    TaskUpdated { task: TaskRecord },

    /// A task was removed. Acknowledged only; deletions are not represented
    /// in the time-series model.
    TaskDeleted {
        #[serde(default)]
        id: Option<String>,
    },

    /// End-of-day marker from the host.
    DayFinished,

    /// Replace and persist the active configuration.
    SaveConfig { config: BridgeConfig },

    /// Connection test, optionally with an unsaved override configuration.
    TestConnection {
        #[serde(default)]
        config: Option<BridgeConfig>,
    },

    /// Bulk export of archived and active tasks.
    ImportHistory,
}

impl HostEvent {
    /// Decode one inbound message. Anything unrecognized is dropped.
    pub fn decode(value: &Value) -> Option<HostEvent> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Decode one JSONL line.
    pub fn decode_line(line: &str) -> Option<HostEvent> {
        serde_json::from_str::<Value>(line).ok().as_ref().and_then(Self::decode)
    }
}
