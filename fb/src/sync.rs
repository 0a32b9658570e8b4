//! Bulk history import.

use lineproto::{DataPoint, WriteTarget};
use tracing::{debug, info};

use crate::cache::MetadataCache;
use crate::deliver::PointSink;
use crate::enrich::{enrich, now_ms};
use crate::error::BridgeError;
use crate::host::HostPort;

/// Tasks per outbound write during bulk import. Sequential fixed-size
/// batches bound peak payload size.
pub const IMPORT_BATCH_SIZE: usize = 50;

/// Outcome of a completed import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub tasks: usize,
    pub batches: usize,
}

/// Export every archived and active task in fixed-size sequential batches.
///
/// Refreshes the metadata cache first so display names are current. The
/// first failing batch aborts the remainder; the returned error carries no
/// partial counts and there is no resume capability.
pub async fn import_history(
    host: &dyn HostPort,
    cache: &mut MetadataCache,
    sink: &dyn PointSink,
    target: &WriteTarget,
    measurement: &str,
) -> Result<ImportSummary, BridgeError> {
    cache.refresh(host).await;

    let archived = host.archived_tasks().await.map_err(BridgeError::host)?;
    let active = host.active_tasks().await.map_err(BridgeError::host)?;

    let now = now_ms();
    let points: Vec<DataPoint> = archived
        .iter()
        .chain(active.iter())
        .map(|task| enrich(task, cache, measurement, now))
        .collect();

    let mut batches = 0;
    for batch in points.chunks(IMPORT_BATCH_SIZE) {
        sink.deliver(target, batch).await?;
        batches += 1;
        debug!(batch = batches, size = batch.len(), "import batch delivered");
    }

    info!(tasks = points.len(), batches, "history import complete");
    Ok(ImportSummary { tasks: points.len(), batches })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use eyre::Result;
    use lineproto::WriteError;
    use serde_json::json;
    use std::sync::Mutex;

    use crate::config::BridgeConfig;
    use crate::domain::{ProjectRef, TagRef, TaskRecord};
    use crate::host::Severity;

    struct ListHost {
        archived: Vec<TaskRecord>,
        active: Vec<TaskRecord>,
    }

    #[async_trait]
    impl HostPort for ListHost {
        async fn projects(&self) -> Result<Vec<ProjectRef>> {
            Ok(Vec::new())
        }
        async fn tags(&self) -> Result<Vec<TagRef>> {
            Ok(Vec::new())
        }
        async fn active_tasks(&self) -> Result<Vec<TaskRecord>> {
            Ok(self.active.clone())
        }
        async fn archived_tasks(&self) -> Result<Vec<TaskRecord>> {
            Ok(self.archived.clone())
        }
        async fn persist_config(&self, _config: &BridgeConfig) -> Result<()> {
            Ok(())
        }
        async fn load_config(&self) -> Result<Option<BridgeConfig>> {
            Ok(None)
        }
        async fn notify(&self, _message: &str, _severity: Severity) {}
    }

    /// Records batch sizes; fails on a chosen batch index (1-based).
    struct CountingSink {
        sizes: Mutex<Vec<usize>>,
        fail_on: Option<usize>,
    }

    impl CountingSink {
        fn new(fail_on: Option<usize>) -> Self {
            Self { sizes: Mutex::new(Vec::new()), fail_on }
        }
    }

    #[async_trait]
    impl PointSink for CountingSink {
        async fn deliver(&self, _target: &WriteTarget, points: &[DataPoint]) -> Result<(), WriteError> {
            let mut sizes = self.sizes.lock().unwrap();
            sizes.push(points.len());
            if self.fail_on == Some(sizes.len()) {
                return Err(WriteError::Upstream {
                    status: 500,
                    status_text: "Internal Server Error".to_string(),
                    body: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    fn tasks(n: usize) -> Vec<TaskRecord> {
        (0..n)
            .map(|i| TaskRecord::from_value(&json!({"id": format!("t{i}"), "timeSpentMs": 1000})))
            .collect()
    }

    fn target() -> WriteTarget {
        WriteTarget::new("https://db.example/write", "tok")
    }

    #[tokio::test]
    async fn test_import_120_tasks_makes_three_batches() {
        let host = ListHost { archived: tasks(70), active: tasks(50) };
        let sink = CountingSink::new(None);
        let mut cache = MetadataCache::new();

        let summary = import_history(&host, &mut cache, &sink, &target(), "tasks")
            .await
            .unwrap();

        assert_eq!(summary, ImportSummary { tasks: 120, batches: 3 });
        assert_eq!(*sink.sizes.lock().unwrap(), vec![50, 50, 20]);
    }

    #[tokio::test]
    async fn test_import_failure_aborts_remaining_batches() {
        let host = ListHost { archived: tasks(120), active: Vec::new() };
        let sink = CountingSink::new(Some(2));
        let mut cache = MetadataCache::new();

        let result = import_history(&host, &mut cache, &sink, &target(), "tasks").await;

        assert!(matches!(result, Err(BridgeError::Write(_))));
        // Batch 3 never attempted
        assert_eq!(*sink.sizes.lock().unwrap(), vec![50, 50]);
    }

    #[tokio::test]
    async fn test_import_empty_host_is_zero_batches() {
        let host = ListHost { archived: Vec::new(), active: Vec::new() };
        let sink = CountingSink::new(None);
        let mut cache = MetadataCache::new();

        let summary = import_history(&host, &mut cache, &sink, &target(), "tasks")
            .await
            .unwrap();

        assert_eq!(summary, ImportSummary { tasks: 0, batches: 0 });
        assert!(sink.sizes.lock().unwrap().is_empty());
    }
}
