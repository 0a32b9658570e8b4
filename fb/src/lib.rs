//! FluxBridge - task lifecycle to time-series bridge
//!
//! FluxBridge listens for task lifecycle events from a host productivity
//! application, enriches each task record with cached project and tag
//! display names, and forwards the result to a time-series endpoint as
//! line protocol.
//!
//! # Core Concepts
//!
//! - **Total enrichment**: malformed task input degrades to documented
//!   defaults, never to an error
//! - **One dispatcher task**: configuration, metadata cache and the debounce
//!   slot are owned by a single task and replaced wholesale
//! - **Quiet background, loud foreground**: ambient sync absorbs failures
//!   into logs; every interactive action ends in exactly one notification
//!
//! # Modules
//!
//! - [`enrich`] - task record to data point mapping
//! - [`cache`] - project/tag display-name tables
//! - [`events`] - dispatcher, debouncer and inbound event shapes
//! - [`deliver`] - point sink seam over the wire client
//! - [`sync`] - bulk history import
//! - [`host`] - host collaborator port and the file-backed adapter
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cache;
pub mod cli;
pub mod config;
pub mod deliver;
pub mod domain;
pub mod enrich;
pub mod error;
pub mod events;
pub mod host;
pub mod sync;

// Re-export commonly used types
pub use cache::MetadataCache;
pub use config::{BridgeConfig, DEFAULT_MEASUREMENT};
pub use deliver::{HttpSink, PointSink, check_connection, heartbeat_point, write_target};
pub use domain::{ProjectRef, TagRef, TaskRecord};
pub use enrich::{enrich, now_ms};
pub use error::BridgeError;
pub use events::{Debouncer, Dispatcher, DispatcherConfig, HostEvent, best_effort};
pub use host::{FileHost, HostPort, Severity};
pub use sync::{IMPORT_BATCH_SIZE, ImportSummary, import_history};
