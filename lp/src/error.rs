//! Write error taxonomy.

use thiserror::Error;

/// Errors that can occur while delivering a batch of points.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The endpoint answered with a non-success status. The body is capped
    /// upstream so verbose error pages cannot flood logs or notifications.
    #[error("upstream error {status} {status_text}: {body}")]
    Upstream {
        status: u16,
        status_text: String,
        body: String,
    },

    /// Network-level failure: connection refused, timeout, DNS.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl WriteError {
    /// Check if the endpoint was reached and rejected the write.
    pub fn is_upstream(&self) -> bool {
        matches!(self, WriteError::Upstream { .. })
    }

    /// Get the HTTP status code if the endpoint answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            WriteError::Upstream { status, .. } => Some(*status),
            WriteError::Transport(_) => None,
        }
    }
}
