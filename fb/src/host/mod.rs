//! Host collaborator port.
//!
//! The bridge consumes a narrow set of capabilities from the host
//! productivity application: list fetches for metadata and tasks, config
//! persistence, and user notifications. Only these operations' existence and
//! basic contracts are assumed; none may be assumed to run synchronously.

mod file;

pub use file::FileHost;

use async_trait::async_trait;
use eyre::Result;

use crate::config::BridgeConfig;
use crate::domain::{ProjectRef, TagRef, TaskRecord};

/// Notification severity shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Capabilities consumed from the host application.
#[async_trait]
pub trait HostPort: Send + Sync {
    async fn projects(&self) -> Result<Vec<ProjectRef>>;

    async fn tags(&self) -> Result<Vec<TagRef>>;

    async fn active_tasks(&self) -> Result<Vec<TaskRecord>>;

    async fn archived_tasks(&self) -> Result<Vec<TaskRecord>>;

    /// Persist the configuration durably.
    async fn persist_config(&self, config: &BridgeConfig) -> Result<()>;

    /// Load the persisted configuration, if any.
    async fn load_config(&self) -> Result<Option<BridgeConfig>>;

    /// Show a user-visible notification. Infallible by contract; hosts
    /// degrade to logging when they cannot display.
    async fn notify(&self, message: &str, severity: Severity);
}
