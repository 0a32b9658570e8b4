//! Event dispatcher: routes host events into the export pipeline.
//!
//! A single task owns the active configuration, the metadata cache and the
//! debounce slot; all three are replaced wholesale, never mutated in place.
//! Sends are spawned and may complete out of order; only the debounced
//! update path guarantees one send per quiet window.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use lineproto::{DataPoint, WriteError};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cache::MetadataCache;
use crate::config::BridgeConfig;
use crate::deliver::{HttpSink, PointSink, check_connection, write_target};
use crate::domain::TaskRecord;
use crate::enrich::{enrich, now_ms};
use crate::error::BridgeError;
use crate::events::debounce::Debouncer;
use crate::events::types::HostEvent;
use crate::host::{HostPort, Severity};
use crate::sync::{ImportSummary, import_history};

/// Dispatcher tuning knobs.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Quiet period before a task-updated event is sent.
    pub debounce: Duration,

    /// Inbound event channel capacity.
    pub channel_buffer: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(5000),
            channel_buffer: 256,
        }
    }
}

/// Run a fallible send in the background, absorbing any failure.
///
/// This is the policy for ambient sends: a transient network problem must
/// never interrupt the user's workflow, so failures are logged and dropped.
pub fn best_effort<F>(context: &'static str, work: F)
where
    F: Future<Output = Result<(), WriteError>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(error) = work.await {
            warn!(%error, context, "background send failed");
        }
    });
}

/// The dispatcher routes inbound lifecycle and control events.
pub struct Dispatcher {
    config: BridgeConfig,
    options: DispatcherConfig,
    cache: MetadataCache,
    sink: Arc<dyn PointSink>,
    host: Arc<dyn HostPort>,
    debounce: Debouncer,
    rx: mpsc::Receiver<HostEvent>,
}

impl Dispatcher {
    /// Create a dispatcher delivering over HTTP. Returns the inbound sender;
    /// the dispatcher runs until every sender is dropped.
    pub fn new(
        config: BridgeConfig,
        options: DispatcherConfig,
        host: Arc<dyn HostPort>,
    ) -> (Self, mpsc::Sender<HostEvent>) {
        Self::with_sink(config, options, host, Arc::new(HttpSink::new()))
    }

    /// Create a dispatcher delivering into the given sink.
    pub fn with_sink(
        config: BridgeConfig,
        options: DispatcherConfig,
        host: Arc<dyn HostPort>,
        sink: Arc<dyn PointSink>,
    ) -> (Self, mpsc::Sender<HostEvent>) {
        let (tx, rx) = mpsc::channel(options.channel_buffer);
        let dispatcher = Self {
            config,
            options,
            cache: MetadataCache::new(),
            sink,
            host,
            debounce: Debouncer::new(),
            rx,
        };
        (dispatcher, tx)
    }

    /// Run until the event channel closes.
    pub async fn run(mut self) {
        info!("dispatcher started");
        self.cache.refresh(self.host.as_ref()).await;

        while let Some(event) = self.rx.recv().await {
            self.handle(event).await;
        }

        self.debounce.cancel();
        info!("dispatcher stopped");
    }

    async fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::TaskCompleted { task } => self.send_task(task, "task-completed"),
            HostEvent::CurrentTaskChanged { task } => self.send_task(task, "current-task-changed"),
            HostEvent::TaskUpdated { task } => self.debounce_task(task),
            HostEvent::TaskDeleted { id } => {
                debug!(id = id.as_deref().unwrap_or("unknown"), "task deleted; no outbound write");
            }
            HostEvent::DayFinished => {
                self.host
                    .notify("Day finished. Your dashboard has today's numbers.", Severity::Info)
                    .await;
            }
            HostEvent::SaveConfig { config } => self.save_config(config).await,
            HostEvent::TestConnection { config } => self.test_connection(config).await,
            HostEvent::ImportHistory => self.import().await,
        }
    }

    /// Enrich and hand off to a background send. Silently skipped while the
    /// bridge is unconfigured; ambient triggers never surface errors.
    fn send_task(&self, task: TaskRecord, context: &'static str) {
        let Some(target) = write_target(&self.config) else {
            debug!(context, "send skipped: bridge not configured");
            return;
        };
        let point = self.enrich_now(&task);
        let sink = self.sink.clone();
        best_effort(context, async move { sink.deliver(&target, &[point]).await });
    }

    /// Debounced variant for high-frequency update events: only the last
    /// update in a quiet window is sent, earlier ones are superseded.
    fn debounce_task(&mut self, task: TaskRecord) {
        let Some(target) = write_target(&self.config) else {
            debug!("debounced send skipped: bridge not configured");
            return;
        };
        let point = self.enrich_now(&task);
        let sink = self.sink.clone();
        self.debounce.submit(self.options.debounce, async move {
            if let Err(error) = sink.deliver(&target, &[point]).await {
                warn!(%error, "debounced send failed");
            }
        });
    }

    fn enrich_now(&self, task: &TaskRecord) -> DataPoint {
        enrich(task, &self.cache, self.config.measurement(), now_ms())
    }

    /// Replace the active configuration and delegate persistence to the host.
    async fn save_config(&mut self, config: BridgeConfig) {
        self.config = config;
        match self.host.persist_config(&self.config).await {
            Ok(()) => self.host.notify("Settings saved", Severity::Info).await,
            Err(error) => {
                warn!(%error, "config persistence failed");
                self.host
                    .notify(&format!("Saving settings failed: {error}"), Severity::Error)
                    .await;
            }
        }
    }

    /// Heartbeat send with the override config when supplied, else the
    /// stored one. Interactive: always ends in one notification.
    async fn test_connection(&self, override_config: Option<BridgeConfig>) {
        let config = override_config.as_ref().unwrap_or(&self.config);
        match check_connection(self.sink.as_ref(), config).await {
            Ok(()) => self.host.notify("Connection OK", Severity::Info).await,
            Err(error) => {
                self.host
                    .notify(&format!("Connection test failed: {error}"), Severity::Error)
                    .await;
            }
        }
    }

    /// Bulk import. Interactive: always ends in one aggregate notification.
    async fn import(&mut self) {
        match self.run_import().await {
            Ok(summary) => {
                self.host
                    .notify(
                        &format!("Imported {} tasks in {} batches", summary.tasks, summary.batches),
                        Severity::Info,
                    )
                    .await;
            }
            Err(error) => {
                self.host
                    .notify(&format!("History import failed: {error}"), Severity::Error)
                    .await;
            }
        }
    }

    async fn run_import(&mut self) -> Result<ImportSummary, BridgeError> {
        let Some(target) = write_target(&self.config) else {
            return Err(BridgeError::NotConfigured);
        };
        import_history(
            self.host.as_ref(),
            &mut self.cache,
            self.sink.as_ref(),
            &target,
            self.config.measurement(),
        )
        .await
    }
}
