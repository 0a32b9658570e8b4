//! Project and tag display-name lookup tables.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{ProjectRef, TagRef};
use crate::host::HostPort;

/// Display name used when a task has no resolvable project.
pub const UNASSIGNED_PROJECT: &str = "Unassigned";

/// id → display name tables for projects and tags.
///
/// Tables are rebuilt wholesale on refresh and go stale between refreshes;
/// display names are low-churn so staleness is acceptable. Lookups are total.
#[derive(Debug, Clone, Default)]
pub struct MetadataCache {
    projects: HashMap<String, String>,
    tags: HashMap<String, String>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache from prepared tables.
    pub fn from_tables(projects: HashMap<String, String>, tags: HashMap<String, String>) -> Self {
        Self { projects, tags }
    }

    /// Rebuild both tables from the host.
    ///
    /// Both fetches must succeed before either table is replaced; on any
    /// failure the refresh is abandoned with a debug log and the previous
    /// tables stay in effect. Never left partially updated.
    pub async fn refresh(&mut self, host: &dyn HostPort) {
        let projects = match host.projects().await {
            Ok(rows) => rows,
            Err(error) => {
                debug!(%error, "metadata refresh abandoned: project fetch failed");
                return;
            }
        };
        let tags = match host.tags().await {
            Ok(rows) => rows,
            Err(error) => {
                debug!(%error, "metadata refresh abandoned: tag fetch failed");
                return;
            }
        };

        self.projects = index_projects(&projects);
        self.tags = index_tags(&tags);
        debug!(projects = self.projects.len(), tags = self.tags.len(), "metadata cache refreshed");
    }

    /// Display name for a project id, defaulting to [`UNASSIGNED_PROJECT`].
    pub fn project_name(&self, id: Option<&str>) -> String {
        id.and_then(|id| self.projects.get(id))
            .cloned()
            .unwrap_or_else(|| UNASSIGNED_PROJECT.to_string())
    }

    /// Display name for a tag id; unknown ids fall back to the raw id.
    pub fn tag_name(&self, id: &str) -> String {
        self.tags.get(id).cloned().unwrap_or_else(|| id.to_string())
    }
}

fn index_projects(rows: &[ProjectRef]) -> HashMap<String, String> {
    rows.iter()
        .filter_map(|row| Some((row.id.clone()?, row.title.clone()?)))
        .collect()
}

fn index_tags(rows: &[TagRef]) -> HashMap<String, String> {
    rows.iter()
        .filter_map(|row| Some((row.id.clone()?, row.title.clone()?)))
        .collect()
}
