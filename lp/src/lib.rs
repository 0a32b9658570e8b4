//! LineProto - InfluxDB line protocol encoding and delivery
//!
//! Converts structured data points into the line-oriented text wire format
//! consumed by time-series ingestion endpoints and ships them over HTTP.
//!
//! # Example
//!
//! ```ignore
//! use lineproto::{DataPoint, WriteClient, WriteTarget, encode};
//!
//! let point = DataPoint::new("tasks", 1_700_000_000_000)
//!     .tag("project", "Alpha")
//!     .field("duration_ms", 3_600_000.0);
//!
//! assert!(encode(&point).is_some());
//!
//! let client = WriteClient::new();
//! let target = WriteTarget::new("https://db.example/write", "secret");
//! client.write(&target, &[point]).await?;
//! ```

pub mod cli;
pub mod client;
pub mod encode;
pub mod error;
pub mod point;

pub use client::{WriteClient, WriteOutcome, WriteTarget};
pub use encode::{encode, encode_batch};
pub use error::WriteError;
pub use point::{DataPoint, FieldValue};

/// Maximum number of upstream response characters carried in a write error.
pub const ERROR_BODY_LIMIT: usize = 500;
