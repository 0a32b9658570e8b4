//! Bridge error taxonomy.

use lineproto::WriteError;
use thiserror::Error;

/// Errors surfaced by interactively-triggered bridge operations.
///
/// Background sync absorbs all of these (log-only); interactive actions end
/// in exactly one user-visible success or failure notification. Nothing here
/// is fatal to the process.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Endpoint URL or auth token missing from the active configuration.
    #[error("endpoint URL and auth token must be configured")]
    NotConfigured,

    /// Delivery failed at or past the wire.
    #[error(transparent)]
    Write(#[from] WriteError),

    /// A host collaborator call failed.
    #[error("host error: {0}")]
    Host(String),
}

impl BridgeError {
    /// Wrap a host collaborator failure.
    pub fn host(error: impl std::fmt::Display) -> Self {
        BridgeError::Host(error.to_string())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, BridgeError::NotConfigured)
    }
}
