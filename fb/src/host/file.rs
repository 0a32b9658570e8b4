//! File-backed host adapter for running the bridge standalone.
//!
//! Reads one JSON snapshot of the host's projects, tags and task lists, and
//! persists the bridge configuration as YAML. Notifications go to stderr.

use async_trait::async_trait;
use colored::*;
use eyre::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use super::{HostPort, Severity};
use crate::config::BridgeConfig;
use crate::domain::{ProjectRef, TagRef, TaskRecord};

/// Host snapshot document shape (camelCase, like the host's own exports).
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Snapshot {
    projects: Vec<ProjectRef>,
    tags: Vec<TagRef>,
    tasks: Vec<TaskRecord>,
    archived_tasks: Vec<TaskRecord>,
}

/// Host port backed by a snapshot file and a config file.
pub struct FileHost {
    snapshot_path: PathBuf,
    config_path: PathBuf,
}

impl FileHost {
    pub fn new(snapshot_path: impl Into<PathBuf>, config_path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: snapshot_path.into(),
            config_path: config_path.into(),
        }
    }

    async fn snapshot(&self) -> Result<Snapshot> {
        let raw = tokio::fs::read_to_string(&self.snapshot_path)
            .await
            .context(format!("Failed to read host snapshot {}", self.snapshot_path.display()))?;
        serde_json::from_str(&raw).context("Failed to parse host snapshot")
    }
}

#[async_trait]
impl HostPort for FileHost {
    async fn projects(&self) -> Result<Vec<ProjectRef>> {
        Ok(self.snapshot().await?.projects)
    }

    async fn tags(&self) -> Result<Vec<TagRef>> {
        Ok(self.snapshot().await?.tags)
    }

    async fn active_tasks(&self) -> Result<Vec<TaskRecord>> {
        Ok(self.snapshot().await?.tasks)
    }

    async fn archived_tasks(&self) -> Result<Vec<TaskRecord>> {
        Ok(self.snapshot().await?.archived_tasks)
    }

    async fn persist_config(&self, config: &BridgeConfig) -> Result<()> {
        config.save(&self.config_path)
    }

    async fn load_config(&self) -> Result<Option<BridgeConfig>> {
        if !self.config_path.exists() {
            return Ok(None);
        }
        BridgeConfig::load_from_file(&self.config_path).map(Some)
    }

    async fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => eprintln!("{} {}", "✓".green(), message),
            Severity::Warning => eprintln!("{} {}", "!".yellow(), message),
            Severity::Error => eprintln!("{} {}", "✗".red(), message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_snapshot(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_snapshot_lists() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_snapshot(
            &dir,
            r#"{
                "projects": [{"id": "p1", "title": "Alpha"}],
                "tags": [{"id": "g1", "title": "Deep Work"}],
                "tasks": [{"id": "t1", "title": "Write"}],
                "archivedTasks": [{"id": "t0"}, {"id": "t00"}]
            }"#,
        );
        let host = FileHost::new(&snapshot, dir.path().join("config.yml"));

        assert_eq!(host.projects().await.unwrap().len(), 1);
        assert_eq!(host.tags().await.unwrap().len(), 1);
        assert_eq!(host.active_tasks().await.unwrap().len(), 1);
        assert_eq!(host.archived_tasks().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_snapshot_errors() {
        let dir = TempDir::new().unwrap();
        let host = FileHost::new(dir.path().join("absent.json"), dir.path().join("config.yml"));
        assert!(host.projects().await.is_err());
    }

    #[tokio::test]
    async fn test_config_persist_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_snapshot(&dir, "{}");
        let host = FileHost::new(&snapshot, dir.path().join("config.yml"));

        assert!(host.load_config().await.unwrap().is_none());

        let config = BridgeConfig {
            endpoint_url: "https://db.example/write".to_string(),
            auth_token: "tok".to_string(),
            measurement: "tasks".to_string(),
        };
        host.persist_config(&config).await.unwrap();

        assert_eq!(host.load_config().await.unwrap(), Some(config));
    }
}
